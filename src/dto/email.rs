//! DTOs for the email template pages.

use crate::domain::email_template::EmailTemplate;

pub struct TemplatesPageData {
    pub templates: Vec<EmailTemplate>,
    /// Placeholders available to template authors.
    pub placeholders: Vec<&'static str>,
}
