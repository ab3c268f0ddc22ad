//! DTO modules that bridge services with templates and APIs.

pub mod analytics;
pub mod api;
pub mod contacts;
pub mod custom_fields;
pub mod email;
pub mod modules;
pub mod settings;
pub mod talents;
pub mod tenants;
