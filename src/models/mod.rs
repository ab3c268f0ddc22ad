//! Database models shared across the talent CRM repository.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod contact;
pub mod custom_field;
pub mod email_template;
pub mod module;
pub mod password_policy;
pub mod talent;
pub mod tenant;
