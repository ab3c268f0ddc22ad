//! Tenant organizations scoping every other record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TenantId, TenantName, TenantSlug, TypeConstraintError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tenant {
    pub id: TenantId,
    pub name: TenantName,
    pub slug: TenantSlug,
    pub domain: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTenant {
    pub name: TenantName,
    pub slug: TenantSlug,
    pub domain: Option<String>,
}

impl NewTenant {
    #[must_use]
    pub fn new(name: TenantName, slug: TenantSlug, domain: Option<String>) -> Self {
        Self {
            name,
            slug,
            domain: normalize_domain(domain),
        }
    }

    /// Builds a tenant from raw strings, validating every field.
    pub fn try_new(
        name: impl Into<String>,
        slug: impl Into<String>,
        domain: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(
            TenantName::new(name)?,
            TenantSlug::new(slug)?,
            domain,
        ))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateTenant {
    pub name: TenantName,
    pub domain: Option<String>,
    pub is_active: bool,
}

impl UpdateTenant {
    #[must_use]
    pub fn new(name: TenantName, domain: Option<String>, is_active: bool) -> Self {
        Self {
            name,
            domain: normalize_domain(domain),
            is_active,
        }
    }
}

fn normalize_domain(domain: Option<String>) -> Option<String> {
    domain
        .map(|d| d.trim().trim_end_matches('/').to_lowercase())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tenant_normalizes_domain() {
        let tenant = NewTenant::try_new("Acme", "acme", Some(" Jobs.Acme.io/ ".to_string()))
            .expect("valid tenant");
        assert_eq!(tenant.domain.as_deref(), Some("jobs.acme.io"));

        let tenant = NewTenant::try_new("Acme", "acme", Some("  ".to_string()))
            .expect("valid tenant");
        assert_eq!(tenant.domain, None);
    }

    #[test]
    fn new_tenant_rejects_bad_slug() {
        assert_eq!(
            NewTenant::try_new("Acme", "acme inc", None).map(|_| ()),
            Err(TypeConstraintError::InvalidSlug)
        );
    }
}
