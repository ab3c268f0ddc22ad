//! DTOs exposed by the JSON API endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::module::ModuleView;
use crate::domain::password_policy::PasswordViolation;
use crate::domain::talent::Talent;

/// Query parameters accepted by `/api/v1/talents`.
#[derive(Debug, Default, Deserialize)]
pub struct TalentsApiQuery {
    /// Optional free-form search string applied to the talent list.
    pub search: Option<String>,
    /// Optional page number for pagination.
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TalentsResponse {
    /// Total number of talents matching the filter.
    pub total: usize,
    pub talents: Vec<Talent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModulesApiQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModulesResponse {
    pub modules: Vec<ModuleView>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordCheckRequest {
    pub password: String,
    /// When the password was last changed, used for the expiry check.
    #[serde(default)]
    pub changed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub struct PasswordCheckResponse {
    pub valid: bool,
    pub violations: Vec<PasswordViolation>,
    pub messages: Vec<String>,
    pub expired: bool,
}
