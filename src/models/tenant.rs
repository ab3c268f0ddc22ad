//! Diesel models for tenants and their enabled modules.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::tenant::{
    NewTenant as DomainNewTenant, Tenant as DomainTenant, UpdateTenant as DomainUpdateTenant,
};
use crate::domain::types::{TenantId, TenantName, TenantSlug, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tenants)]
/// Diesel model for [`crate::domain::tenant::Tenant`].
pub struct Tenant {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub domain: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tenants)]
pub struct NewTenant<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub domain: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::tenants)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateTenant<'a> {
    pub name: &'a str,
    pub domain: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tenant_modules)]
/// Association row enabling a module for a tenant.
pub struct TenantModule {
    pub tenant_id: i32,
    pub module_id: i32,
}

impl TryFrom<Tenant> for DomainTenant {
    type Error = TypeConstraintError;

    fn try_from(tenant: Tenant) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TenantId::try_from(tenant.id)?,
            name: TenantName::new(tenant.name)?,
            slug: TenantSlug::new(tenant.slug)?,
            domain: tenant.domain,
            is_active: tenant.is_active,
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewTenant> for NewTenant<'a> {
    fn from(tenant: &'a DomainNewTenant) -> Self {
        Self {
            name: tenant.name.as_str(),
            slug: tenant.slug.as_str(),
            domain: tenant.domain.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateTenant> for UpdateTenant<'a> {
    fn from(tenant: &'a DomainUpdateTenant) -> Self {
        Self {
            name: tenant.name.as_str(),
            domain: tenant.domain.as_deref(),
            is_active: tenant.is_active,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_tenant_with_bad_slug_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = Tenant {
            id: 1,
            name: "Acme".to_string(),
            slug: "Not A Slug".to_string(),
            domain: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(
            DomainTenant::try_from(row).map(|_| ()),
            Err(TypeConstraintError::InvalidSlug)
        );
    }

    #[test]
    fn update_clears_domain() {
        let domain = DomainUpdateTenant::new(
            TenantName::new("Acme").expect("valid name"),
            None,
            false,
        );
        let update: UpdateTenant = (&domain).into();
        assert_eq!(update.domain, None);
        assert!(!update.is_active);
    }
}
