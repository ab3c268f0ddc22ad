//! Repository implementation for the module registry.

use chrono::Utc;
use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        module::{NewSystemModule, SystemModule, UpdateSystemModule},
        types::{ModuleId, ModuleName, ProgressPercent},
    },
    models::module::{
        NewSystemModule as DbNewSystemModule, SystemModule as DbSystemModule,
        UpdateSystemModule as DbUpdateSystemModule,
    },
    repository::{
        DieselRepository, ModuleListQuery, ModuleReader, ModuleWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ModuleReader for DieselRepository {
    fn get_module_by_id(&self, id: ModuleId) -> RepositoryResult<Option<SystemModule>> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;
        let db_module = system_modules::table
            .find(id.get())
            .first::<DbSystemModule>(&mut conn)
            .optional()?;

        db_module
            .map(SystemModule::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_module_by_name(&self, name: &ModuleName) -> RepositoryResult<Option<SystemModule>> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;
        let db_module = system_modules::table
            .filter(system_modules::name.eq(name.as_str()))
            .first::<DbSystemModule>(&mut conn)
            .optional()?;

        db_module
            .map(SystemModule::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_modules(&self, query: ModuleListQuery) -> RepositoryResult<Vec<SystemModule>> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;

        let mut items = system_modules::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(category) = &query.category {
            items = items.filter(system_modules::category.eq(category));
        }
        if query.exclude_consolidated {
            items = items.filter(system_modules::consolidated_into.is_null());
        }

        items
            .order((system_modules::category.asc(), system_modules::name.asc()))
            .load::<DbSystemModule>(&mut conn)?
            .into_iter()
            .map(|module| SystemModule::try_from(module).map_err(RepositoryError::from))
            .collect()
    }
}

impl ModuleWriter for DieselRepository {
    fn create_module(&self, new_module: &NewSystemModule) -> RepositoryResult<SystemModule> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;
        let db_new_module: DbNewSystemModule = new_module.into();

        let db_module = diesel::insert_into(system_modules::table)
            .values(&db_new_module)
            .get_result::<DbSystemModule>(&mut conn)?;

        Ok(SystemModule::try_from(db_module)?)
    }

    fn seed_modules(&self, modules: &[NewSystemModule]) -> RepositoryResult<usize> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;
        let insertables: Vec<DbNewSystemModule> = modules.iter().map(Into::into).collect();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let mut inserted = 0;
            for module in &insertables {
                inserted += diesel::insert_or_ignore_into(system_modules::table)
                    .values(module)
                    .execute(conn)?;
            }
            Ok(inserted)
        })
        .map_err(RepositoryError::from)
    }

    fn update_module(
        &self,
        id: ModuleId,
        updates: &UpdateSystemModule,
    ) -> RepositoryResult<SystemModule> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateSystemModule = updates.into();

        let db_module = diesel::update(system_modules::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbSystemModule>(&mut conn)?;

        Ok(SystemModule::try_from(db_module)?)
    }

    fn consolidate_modules(
        &self,
        target: ModuleId,
        sources: &[ModuleId],
        progress: ProgressPercent,
    ) -> RepositoryResult<usize> {
        use crate::schema::system_modules;

        let mut conn = self.conn()?;
        let source_ids: Vec<i32> = sources
            .iter()
            .map(|id| id.get())
            .filter(|id| *id != target.get())
            .collect();
        let now = Utc::now().naive_utc();

        conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let merged = diesel::update(
                system_modules::table
                    .filter(system_modules::id.eq_any(&source_ids))
                    .filter(system_modules::consolidated_into.is_null()),
            )
            .set((
                system_modules::consolidated_into.eq(target.get()),
                system_modules::is_active.eq(false),
                system_modules::updated_at.eq(now),
            ))
            .execute(conn)?;

            let touched = diesel::update(
                system_modules::table
                    .find(target.get())
                    .filter(system_modules::progress.ne(i32::from(progress))),
            )
            .set((
                system_modules::progress.eq(i32::from(progress)),
                system_modules::updated_at.eq(now),
            ))
            .execute(conn)?;
            log::debug!("Consolidated {merged} modules into #{target}, progress rows {touched}");

            Ok(merged)
        })
        .map_err(RepositoryError::from)
    }
}
