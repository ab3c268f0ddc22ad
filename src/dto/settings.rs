//! DTOs for the settings page.

use crate::domain::custom_field::CustomField;
use crate::domain::module::SystemModule;
use crate::domain::password_policy::PasswordPolicy;

pub struct SettingsPageData {
    pub policy: PasswordPolicy,
    /// Whether `policy` was saved by the tenant or is the default.
    pub is_default_policy: bool,
    pub talent_fields: Vec<CustomField>,
    pub person_fields: Vec<CustomField>,
    pub modules: Vec<SystemModule>,
}
