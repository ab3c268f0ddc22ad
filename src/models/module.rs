//! Diesel models for the module registry.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::module::{
    NewSystemModule as DomainNewSystemModule, SystemModule as DomainSystemModule,
    UpdateSystemModule as DomainUpdateSystemModule,
};
use crate::domain::types::{
    ModuleCategory, ModuleId, ModuleName, ProgressPercent, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::system_modules)]
/// Diesel model for [`crate::domain::module::SystemModule`].
pub struct SystemModule {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub progress: i32,
    pub is_active: bool,
    pub consolidated_into: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::system_modules)]
pub struct NewSystemModule<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub progress: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::system_modules)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateSystemModule<'a> {
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub progress: i32,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<SystemModule> for DomainSystemModule {
    type Error = TypeConstraintError;

    fn try_from(module: SystemModule) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ModuleId::try_from(module.id)?,
            name: ModuleName::new(module.name)?,
            category: ModuleCategory::new(module.category)?,
            description: module.description,
            progress: ProgressPercent::try_from(module.progress)?,
            is_active: module.is_active,
            consolidated_into: module.consolidated_into.map(ModuleId::try_from).transpose()?,
            created_at: module.created_at,
            updated_at: module.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewSystemModule> for NewSystemModule<'a> {
    fn from(module: &'a DomainNewSystemModule) -> Self {
        Self {
            name: module.name.as_str(),
            category: module.category.as_str(),
            description: module.description.as_deref(),
            progress: module.progress.into(),
        }
    }
}

impl<'a> From<&'a DomainUpdateSystemModule> for UpdateSystemModule<'a> {
    fn from(module: &'a DomainUpdateSystemModule) -> Self {
        Self {
            category: module.category.as_str(),
            description: module.description.as_deref(),
            progress: module.progress.into(),
            is_active: module.is_active,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(progress: i32, consolidated_into: Option<i32>) -> SystemModule {
        let now = Utc::now().naive_utc();
        SystemModule {
            id: 3,
            name: "people".to_string(),
            category: "crm".to_string(),
            description: None,
            progress,
            is_active: false,
            consolidated_into,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn db_module_into_domain() {
        let module = DomainSystemModule::try_from(row(80, Some(9))).expect("valid module");
        assert_eq!(module.progress.get(), 80);
        assert_eq!(module.consolidated_into.map(ModuleId::get), Some(9));
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        assert!(DomainSystemModule::try_from(row(120, None)).is_err());
        assert!(DomainSystemModule::try_from(row(10, Some(0))).is_err());
    }
}
