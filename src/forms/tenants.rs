//! Forms for creating and editing tenants.

use serde::Deserialize;
use validator::Validate;

use crate::domain::tenant::{NewTenant, UpdateTenant};
use crate::domain::types::{ModuleId, TenantName, TenantSlug};
use crate::forms::{FormError, checkbox, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct AddTenantForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub slug: String,
    #[serde(default)]
    pub domain: Option<String>,
}

impl TryFrom<AddTenantForm> for NewTenant {
    type Error = FormError;

    fn try_from(form: AddTenantForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let name = TenantName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let slug = TenantSlug::new(form.slug).map_err(|_| FormError::InvalidSlug)?;
        Ok(NewTenant::new(name, slug, non_blank(form.domain)))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditTenantForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl TryFrom<EditTenantForm> for UpdateTenant {
    type Error = FormError;

    fn try_from(form: EditTenantForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let is_active = checkbox(&form.is_active);
        let name = TenantName::new(form.name).map_err(|_| FormError::InvalidName)?;
        Ok(UpdateTenant::new(name, non_blank(form.domain), is_active))
    }
}

/// Switches one module on or off for a tenant.
#[derive(Debug, Deserialize)]
pub struct ToggleModuleForm {
    pub module_id: i32,
    #[serde(default)]
    pub enabled: Option<String>,
}

pub struct ToggleModulePayload {
    pub module_id: ModuleId,
    pub enabled: bool,
}

impl TryFrom<ToggleModuleForm> for ToggleModulePayload {
    type Error = FormError;

    fn try_from(form: ToggleModuleForm) -> Result<Self, Self::Error> {
        Ok(Self {
            module_id: ModuleId::new(form.module_id).map_err(|_| FormError::InvalidId)?,
            enabled: checkbox(&form.enabled),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_form_normalizes_slug_and_domain() {
        let form = AddTenantForm {
            name: "Acme".to_string(),
            slug: "Acme-Hiring".to_string(),
            domain: Some("  ".to_string()),
        };
        let tenant = NewTenant::try_from(form).expect("valid tenant");

        assert_eq!(tenant.slug.as_str(), "acme-hiring");
        assert_eq!(tenant.domain, None);
    }

    #[test]
    fn add_form_rejects_bad_slug() {
        let form = AddTenantForm {
            name: "Acme".to_string(),
            slug: "acme hiring".to_string(),
            domain: None,
        };
        assert!(matches!(
            NewTenant::try_from(form),
            Err(FormError::InvalidSlug)
        ));
    }

    #[test]
    fn unchecked_box_deactivates() {
        let form = EditTenantForm {
            name: "Acme".to_string(),
            domain: Some("acme.test".to_string()),
            is_active: None,
        };
        let update = UpdateTenant::try_from(form).expect("valid update");

        assert!(!update.is_active);
        assert_eq!(update.domain.as_deref(), Some("acme.test"));
    }
}
