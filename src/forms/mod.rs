//! Form definitions backing the HTML routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::{ContactEmail, PhoneNumber, TypeConstraintError};

pub mod contacts;
pub mod custom_fields;
pub mod email;
pub mod modules;
pub mod settings;
pub mod talents;
pub mod tenants;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid slug")]
    InvalidSlug,

    #[error("invalid progress value")]
    InvalidProgress,

    #[error("invalid status")]
    InvalidStatus,

    #[error("invalid relationship type")]
    InvalidRelationshipType,

    #[error("invalid custom field: {0}")]
    InvalidCustomField(String),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("invalid password policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("invalid identifier")]
    InvalidId,
}

/// Treats blank form inputs as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// HTML checkboxes only submit a value when ticked.
pub(crate) fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "1" | "yes"))
}

pub(crate) fn parse_email(value: Option<String>) -> Result<Option<ContactEmail>, FormError> {
    non_blank(value)
        .map(|email| ContactEmail::new(email).map_err(|_| FormError::InvalidEmail))
        .transpose()
}

pub(crate) fn parse_phone(value: Option<String>) -> Result<Option<PhoneNumber>, FormError> {
    non_blank(value)
        .map(|phone| PhoneNumber::new(phone).map_err(|_| FormError::InvalidPhoneNumber))
        .transpose()
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::InvalidPhone => FormError::InvalidPhoneNumber,
            TypeConstraintError::InvalidSlug => FormError::InvalidSlug,
            TypeConstraintError::NonPositiveId => FormError::InvalidId,
            TypeConstraintError::OutOfRange { .. } => FormError::InvalidProgress,
            TypeConstraintError::EmptyString => FormError::InvalidName,
            other => FormError::InvalidCustomField(other.to_string()),
        }
    }
}
