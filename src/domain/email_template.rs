//! Global email templates shared by every tenant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    EmailTemplateId, TemplateBody, TemplateCategory, TemplateName, TemplateSubject,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmailTemplate {
    pub id: EmailTemplateId,
    pub name: TemplateName,
    pub category: TemplateCategory,
    pub subject: TemplateSubject,
    pub body: TemplateBody,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEmailTemplate {
    pub name: TemplateName,
    pub category: TemplateCategory,
    pub subject: TemplateSubject,
    pub body: TemplateBody,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateEmailTemplate {
    pub category: TemplateCategory,
    pub subject: TemplateSubject,
    pub body: TemplateBody,
    pub is_active: bool,
}

/// Recipient data exposed to templates as `recipient.*`.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct RecipientContext {
    pub name: String,
    pub first_name: String,
    pub email: Option<String>,
    pub headline: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

impl RecipientContext {
    pub fn new(name: &str) -> Self {
        let first_name = name.split_whitespace().next().unwrap_or(name).to_string();
        Self {
            name: name.to_string(),
            first_name,
            ..Default::default()
        }
    }
}

/// Sender data exposed to templates as `sender.*`.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct SenderContext {
    pub name: String,
    pub email: String,
}

/// Result of rendering a template for one recipient.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EmailDraft {
    pub template_id: EmailTemplateId,
    pub to: Option<String>,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_is_first_word() {
        assert_eq!(RecipientContext::new("Grace Brewster Hopper").first_name, "Grace");
        assert_eq!(RecipientContext::new("Cher").first_name, "Cher");
    }
}
