//! Forms for global email templates and draft generation.

use serde::Deserialize;
use validator::Validate;

use crate::domain::email_template::{NewEmailTemplate, UpdateEmailTemplate};
use crate::domain::types::{
    EmailTemplateId, PersonId, TalentId, TemplateBody, TemplateCategory, TemplateName,
    TemplateSubject,
};
use crate::forms::{FormError, checkbox, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct AddTemplateForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[validate(length(min = 1, max = 256))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
}

impl TryFrom<AddTemplateForm> for NewEmailTemplate {
    type Error = FormError;

    fn try_from(form: AddTemplateForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewEmailTemplate {
            name: TemplateName::new(form.name).map_err(|_| FormError::InvalidName)?,
            category: TemplateCategory::new(form.category).map_err(|_| FormError::InvalidName)?,
            subject: TemplateSubject::new(form.subject)
                .map_err(|e| FormError::InvalidTemplate(e.to_string()))?,
            body: TemplateBody::new(form.body)
                .map_err(|e| FormError::InvalidTemplate(e.to_string()))?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditTemplateForm {
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[validate(length(min = 1, max = 256))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl TryFrom<EditTemplateForm> for UpdateEmailTemplate {
    type Error = FormError;

    fn try_from(form: EditTemplateForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let is_active = checkbox(&form.is_active);
        Ok(UpdateEmailTemplate {
            category: TemplateCategory::new(form.category).map_err(|_| FormError::InvalidName)?,
            subject: TemplateSubject::new(form.subject)
                .map_err(|e| FormError::InvalidTemplate(e.to_string()))?,
            body: TemplateBody::new(form.body)
                .map_err(|e| FormError::InvalidTemplate(e.to_string()))?,
            is_active,
        })
    }
}

/// Request to render a template for one talent or contact person. Used by
/// both the HTML form and the JSON API.
#[derive(Debug, Deserialize)]
pub struct GenerateEmailForm {
    pub template_id: i32,
    /// `talent` or `person`.
    pub recipient_type: String,
    pub recipient_id: i32,
    /// Overrides the company shown to the template.
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Talent(TalentId),
    Person(PersonId),
}

pub struct GenerateEmailPayload {
    pub template_id: EmailTemplateId,
    pub recipient: Recipient,
    pub company: Option<String>,
}

impl TryFrom<GenerateEmailForm> for GenerateEmailPayload {
    type Error = FormError;

    fn try_from(form: GenerateEmailForm) -> Result<Self, Self::Error> {
        let recipient = match form.recipient_type.trim() {
            "talent" => Recipient::Talent(
                TalentId::new(form.recipient_id).map_err(|_| FormError::InvalidId)?,
            ),
            "person" => Recipient::Person(
                PersonId::new(form.recipient_id).map_err(|_| FormError::InvalidId)?,
            ),
            _ => return Err(FormError::InvalidId),
        };
        Ok(Self {
            template_id: EmailTemplateId::new(form.template_id)
                .map_err(|_| FormError::InvalidId)?,
            recipient,
            company: non_blank(form.company).map(|c| ammonia::clean(&c)),
        })
    }
}
