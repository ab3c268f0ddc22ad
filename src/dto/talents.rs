//! DTOs for the talent pages.

use serde::Deserialize;

use crate::domain::email_template::EmailTemplate;
use crate::domain::talent::{Talent, TalentStatus};
use crate::dto::custom_fields::CustomFieldRow;
use crate::pagination::Paginated;

/// Query parameters of the talent list.
#[derive(Debug, Default, Deserialize)]
pub struct TalentsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}

pub struct TalentsPageData {
    pub talents: Paginated<Talent>,
    pub search_query: Option<String>,
    pub status: Option<TalentStatus>,
}

pub struct TalentPageData {
    pub talent: Talent,
    pub fields: Vec<CustomFieldRow>,
    pub templates: Vec<EmailTemplate>,
}

/// Outcome of a CSV upload.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    /// Rows skipped because the email already exists in the tenant.
    pub duplicates: usize,
    /// Rows rejected while parsing.
    pub rejected: usize,
}
