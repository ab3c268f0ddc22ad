use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::email_template::{
    EmailTemplate as DomainEmailTemplate, NewEmailTemplate as DomainNewEmailTemplate,
    UpdateEmailTemplate as DomainUpdateEmailTemplate,
};
use crate::domain::types::{
    EmailTemplateId, TemplateBody, TemplateCategory, TemplateName, TemplateSubject,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::global_email_templates)]
/// Diesel model for [`crate::domain::email_template::EmailTemplate`].
pub struct EmailTemplate {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub subject: String,
    pub body: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::global_email_templates)]
pub struct NewEmailTemplate<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::global_email_templates)]
pub struct UpdateEmailTemplate<'a> {
    pub category: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<EmailTemplate> for DomainEmailTemplate {
    type Error = TypeConstraintError;

    fn try_from(template: EmailTemplate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EmailTemplateId::try_from(template.id)?,
            name: TemplateName::new(template.name)?,
            category: TemplateCategory::new(template.category)?,
            subject: TemplateSubject::new(template.subject)?,
            body: TemplateBody::new(template.body)?,
            is_active: template.is_active,
            created_at: template.created_at,
            updated_at: template.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewEmailTemplate> for NewEmailTemplate<'a> {
    fn from(template: &'a DomainNewEmailTemplate) -> Self {
        Self {
            name: template.name.as_str(),
            category: template.category.as_str(),
            subject: template.subject.as_str(),
            body: template.body.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateEmailTemplate> for UpdateEmailTemplate<'a> {
    fn from(template: &'a DomainUpdateEmailTemplate) -> Self {
        Self {
            category: template.category.as_str(),
            subject: template.subject.as_str(),
            body: template.body.as_str(),
            is_active: template.is_active,
            updated_at: Utc::now().naive_utc(),
        }
    }
}
