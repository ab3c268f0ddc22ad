//! DTOs used by the tenant management pages.

use serde::{Deserialize, Serialize};

use crate::domain::module::SystemModule;
use crate::domain::tenant::Tenant;
use crate::pagination::Paginated;

#[derive(Debug, Default, Deserialize)]
pub struct TenantsQuery {
    pub page: Option<usize>,
}

pub struct TenantsPageData {
    pub tenants: Paginated<Tenant>,
}

/// Registry module with its state for one tenant.
#[derive(Debug, Serialize)]
pub struct TenantModuleRow {
    pub module: SystemModule,
    pub enabled: bool,
}

pub struct TenantPageData {
    pub tenant: Tenant,
    pub modules: Vec<TenantModuleRow>,
}
