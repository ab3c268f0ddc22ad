//! Repository implementation for tenants and their enabled modules.

use diesel::prelude::*;

use crate::{
    domain::{
        module::SystemModule,
        tenant::{NewTenant, Tenant, UpdateTenant},
        types::{ModuleId, TenantId, TenantSlug},
    },
    models::{
        module::SystemModule as DbSystemModule,
        tenant::{
            NewTenant as DbNewTenant, Tenant as DbTenant, TenantModule as DbTenantModule,
            UpdateTenant as DbUpdateTenant,
        },
    },
    repository::{
        DieselRepository, TenantListQuery, TenantReader, TenantWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl TenantReader for DieselRepository {
    fn get_tenant_by_id(&self, id: TenantId) -> RepositoryResult<Option<Tenant>> {
        use crate::schema::tenants;

        let mut conn = self.conn()?;
        let db_tenant = tenants::table
            .find(id.get())
            .first::<DbTenant>(&mut conn)
            .optional()?;

        db_tenant
            .map(Tenant::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_tenant_by_slug(&self, slug: &TenantSlug) -> RepositoryResult<Option<Tenant>> {
        use crate::schema::tenants;

        let mut conn = self.conn()?;
        let db_tenant = tenants::table
            .filter(tenants::slug.eq(slug.as_str()))
            .first::<DbTenant>(&mut conn)
            .optional()?;

        db_tenant
            .map(Tenant::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_tenants(&self, query: TenantListQuery) -> RepositoryResult<(usize, Vec<Tenant>)> {
        use crate::schema::tenants;

        let mut conn = self.conn()?;

        let total = tenants::table.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = tenants::table
            .order(tenants::name.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let tenants = items
            .load::<DbTenant>(&mut conn)?
            .into_iter()
            .map(Tenant::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, tenants))
    }

    fn list_tenant_modules(&self, tenant_id: TenantId) -> RepositoryResult<Vec<SystemModule>> {
        use crate::schema::{system_modules, tenant_modules};

        let mut conn = self.conn()?;
        let modules = system_modules::table
            .inner_join(tenant_modules::table)
            .filter(tenant_modules::tenant_id.eq(tenant_id.get()))
            .order(system_modules::name.asc())
            .select(system_modules::all_columns)
            .load::<DbSystemModule>(&mut conn)?;

        modules
            .into_iter()
            .map(|module| SystemModule::try_from(module).map_err(RepositoryError::from))
            .collect()
    }
}

impl TenantWriter for DieselRepository {
    fn create_tenant(&self, new_tenant: &NewTenant) -> RepositoryResult<Tenant> {
        use crate::schema::tenants;

        let mut conn = self.conn()?;
        let db_new_tenant: DbNewTenant = new_tenant.into();

        let db_tenant = diesel::insert_into(tenants::table)
            .values(&db_new_tenant)
            .get_result::<DbTenant>(&mut conn)?;

        Ok(Tenant::try_from(db_tenant)?)
    }

    fn update_tenant(&self, id: TenantId, updates: &UpdateTenant) -> RepositoryResult<Tenant> {
        use crate::schema::tenants;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateTenant = updates.into();

        let db_tenant = diesel::update(tenants::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbTenant>(&mut conn)?;

        Ok(Tenant::try_from(db_tenant)?)
    }

    fn set_tenant_module(
        &self,
        tenant_id: TenantId,
        module_id: ModuleId,
        enabled: bool,
    ) -> RepositoryResult<()> {
        use crate::schema::tenant_modules;

        let mut conn = self.conn()?;

        if enabled {
            diesel::insert_or_ignore_into(tenant_modules::table)
                .values(&DbTenantModule {
                    tenant_id: tenant_id.get(),
                    module_id: module_id.get(),
                })
                .execute(&mut conn)?;
        } else {
            diesel::delete(
                tenant_modules::table
                    .filter(tenant_modules::tenant_id.eq(tenant_id.get()))
                    .filter(tenant_modules::module_id.eq(module_id.get())),
            )
            .execute(&mut conn)?;
        }

        Ok(())
    }
}
