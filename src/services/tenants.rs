//! Services behind the tenant management pages.

use crate::SERVICE_PLATFORM_ROLE;
use crate::domain::tenant::{NewTenant, Tenant, UpdateTenant};
use crate::domain::types::TenantId;
use crate::dto::tenants::{TenantModuleRow, TenantPageData, TenantsPageData, TenantsQuery};
use crate::forms::tenants::{AddTenantForm, EditTenantForm, ToggleModuleForm, ToggleModulePayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ModuleListQuery, ModuleReader, TenantListQuery, TenantReader, TenantWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Lists every tenant, one page at a time.
pub fn load_tenants_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: TenantsQuery,
) -> ServiceResult<TenantsPageData>
where
    R: TenantReader + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let page = query.page.unwrap_or(1);
    let (total, tenants) = repo
        .list_tenants(TenantListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE))
        .map_err(|err| {
            log::error!("Failed to list tenants: {err}");
            err
        })?;

    Ok(TenantsPageData {
        tenants: Paginated::new(tenants, page, total),
    })
}

/// Loads a tenant together with the registry modules and their state.
pub fn load_tenant_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tenant_id: i32,
) -> ServiceResult<TenantPageData>
where
    R: TenantReader + ModuleReader + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let tenant_id = TenantId::new(tenant_id)?;
    let tenant = repo
        .get_tenant_by_id(tenant_id)?
        .ok_or(ServiceError::NotFound)?;

    let enabled = repo.list_tenant_modules(tenant_id).map_err(|err| {
        log::error!("Failed to list tenant modules: {err}");
        err
    })?;
    let modules = repo
        .list_modules(ModuleListQuery::default().exclude_consolidated())?
        .into_iter()
        .map(|module| TenantModuleRow {
            enabled: enabled.iter().any(|m| m.id == module.id),
            module,
        })
        .collect();

    Ok(TenantPageData { tenant, modules })
}

/// Registers a new tenant; slugs must be unique.
pub fn create_tenant<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddTenantForm,
) -> ServiceResult<Tenant>
where
    R: TenantReader + TenantWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let new_tenant = NewTenant::try_from(form)?;

    if repo.get_tenant_by_slug(&new_tenant.slug)?.is_some() {
        return Err(ServiceError::Form(format!(
            "Адрес «{}» уже занят.",
            new_tenant.slug
        )));
    }

    repo.create_tenant(&new_tenant).map_err(|err| {
        log::error!("Failed to create tenant: {err}");
        ServiceError::from(err)
    })
}

pub fn update_tenant<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tenant_id: i32,
    form: EditTenantForm,
) -> ServiceResult<Tenant>
where
    R: TenantWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let tenant_id = TenantId::new(tenant_id)?;
    let updates = UpdateTenant::try_from(form)?;

    repo.update_tenant(tenant_id, &updates).map_err(|err| {
        log::error!("Failed to update tenant: {err}");
        ServiceError::from(err)
    })
}

/// Enables or disables a registry module for the tenant. Modules merged into
/// another one cannot be enabled.
pub fn toggle_tenant_module<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tenant_id: i32,
    form: ToggleModuleForm,
) -> ServiceResult<()>
where
    R: TenantWriter + ModuleReader + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let tenant_id = TenantId::new(tenant_id)?;
    let payload = ToggleModulePayload::try_from(form)?;

    let module = repo
        .get_module_by_id(payload.module_id)?
        .ok_or(ServiceError::NotFound)?;
    if payload.enabled && module.is_consolidated() {
        return Err(ServiceError::Form(format!(
            "Модуль «{}» объединён с другим модулем.",
            module.name
        )));
    }

    repo.set_tenant_module(tenant_id, payload.module_id, payload.enabled)
        .map_err(|err| {
            log::error!("Failed to toggle tenant module: {err}");
            err
        })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::module::tests::build_module;
    use crate::domain::types::{ModuleId, TenantName, TenantSlug};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, platform_user};

    fn build_tenant(id: i32, slug: &str) -> Tenant {
        Tenant {
            id: TenantId::new(id).expect("valid id"),
            name: TenantName::new("Acme").expect("valid name"),
            slug: TenantSlug::new(slug).expect("valid slug"),
            domain: None,
            is_active: true,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn add_form(slug: &str) -> AddTenantForm {
        AddTenantForm {
            name: "Acme".to_string(),
            slug: slug.to_string(),
            domain: None,
        }
    }

    #[test]
    fn tenant_admin_cannot_manage_tenants() {
        let mut repo = MockRepository::new();
        repo.expect_create_tenant().times(0);

        let result = create_tenant(&repo, &admin_user(), add_form("acme"));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_tenant_by_slug()
            .times(1)
            .returning(|slug| Ok(Some(build_tenant(1, slug.as_str()))));
        repo.expect_create_tenant().times(0);

        let result = create_tenant(&repo, &platform_user(), add_form("acme"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_persists_new_tenant() {
        let mut repo = MockRepository::new();
        repo.expect_get_tenant_by_slug().returning(|_| Ok(None));
        repo.expect_create_tenant()
            .withf(|tenant| tenant.slug.as_str() == "acme")
            .times(1)
            .returning(|tenant| Ok(build_tenant(5, tenant.slug.as_str())));

        let tenant = create_tenant(&repo, &platform_user(), add_form("ACME")).expect("created");

        assert_eq!(tenant.id.get(), 5);
    }

    #[test]
    fn tenant_page_marks_enabled_modules() {
        let mut repo = MockRepository::new();
        repo.expect_get_tenant_by_id()
            .returning(|id| Ok(Some(build_tenant(id.get(), "acme"))));
        repo.expect_list_tenant_modules()
            .returning(|_| Ok(vec![build_module(2, "Pipeline", 50)]));
        repo.expect_list_modules().returning(|query| {
            assert!(query.exclude_consolidated);
            Ok(vec![build_module(1, "Analytics", 10), build_module(2, "Pipeline", 50)])
        });

        let data = load_tenant_page(&repo, &platform_user(), 3).expect("loaded");

        let enabled: Vec<bool> = data.modules.iter().map(|row| row.enabled).collect();
        assert_eq!(enabled, vec![false, true]);
    }

    #[test]
    fn consolidated_module_cannot_be_enabled() {
        let mut repo = MockRepository::new();
        repo.expect_get_module_by_id().returning(|id| {
            let mut module = build_module(id.get(), "Old Pipeline", 30);
            module.consolidated_into = Some(ModuleId::new(9).expect("valid id"));
            Ok(Some(module))
        });
        repo.expect_set_tenant_module().times(0);

        let form = ToggleModuleForm {
            module_id: 4,
            enabled: Some("on".to_string()),
        };
        let result = toggle_tenant_module(&repo, &platform_user(), 3, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
