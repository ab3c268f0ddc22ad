//! DTOs for the contacts pages.

use serde::Deserialize;

use crate::domain::contact::{CompanyRelationship, Person};
use crate::domain::email_template::EmailTemplate;
use crate::dto::custom_fields::CustomFieldRow;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct PeopleQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct PeoplePageData {
    pub people: Paginated<Person>,
    pub search_query: Option<String>,
}

pub struct PersonPageData {
    pub person: Person,
    pub relationships: Vec<CompanyRelationship>,
    pub fields: Vec<CustomFieldRow>,
    pub templates: Vec<EmailTemplate>,
}
