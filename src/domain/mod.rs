//! Domain entities and value objects independent of storage and transport.

pub mod consolidation;
pub mod contact;
pub mod custom_field;
pub mod email_template;
pub mod module;
pub mod password_policy;
pub mod talent;
pub mod tenant;
pub mod types;
