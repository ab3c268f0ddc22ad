use crate::{
    db::{DbConnection, DbPool},
    domain::{
        contact::{
            CompanyRelationship, NewCompanyRelationship, NewPerson, Person, RelationshipType,
            UpdatePerson,
        },
        custom_field::{CustomField, CustomFieldEntity, CustomFieldValue, NewCustomField},
        email_template::{EmailTemplate, NewEmailTemplate, UpdateEmailTemplate},
        module::{NewSystemModule, SystemModule, UpdateSystemModule},
        password_policy::PasswordPolicy,
        talent::{NewTalent, Talent, TalentStatus, UpdateTalent},
        tenant::{NewTenant, Tenant, UpdateTenant},
        types::{
            CustomFieldId, EmailTemplateId, ModuleId, ModuleName, PersonId, ProgressPercent,
            PublicId, RelationshipId, TalentId, TenantId, TenantSlug,
        },
    },
    repository::errors::RepositoryResult,
};

pub mod contact;
pub mod custom_field;
pub mod email_template;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod module;
pub mod password_policy;
pub mod talent;
pub mod tenant;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows to skip, saturating at `i64::MAX` for absurd page numbers.
    pub fn offset(&self) -> i64 {
        let offset = (self.page.max(1) - 1).saturating_mul(self.per_page);
        i64::try_from(offset).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantListQuery {
    pub pagination: Option<Pagination>,
}

impl TenantListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleListQuery {
    pub category: Option<String>,
    /// Hide modules already merged into another one.
    pub exclude_consolidated: bool,
}

impl ModuleListQuery {
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn exclude_consolidated(mut self) -> Self {
        self.exclude_consolidated = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalentListQuery {
    pub tenant_id: TenantId,
    pub search: Option<String>,
    pub status: Option<TalentStatus>,
    pub pagination: Option<Pagination>,
}

impl TalentListQuery {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            search: None,
            status: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: TalentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonListQuery {
    pub tenant_id: TenantId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl PersonListQuery {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Talent plus the custom field values parsed from the same CSV row.
#[derive(Debug, Clone)]
pub struct TalentImportRow {
    pub talent: NewTalent,
    pub custom_values: Vec<(CustomFieldId, String)>,
}

pub trait TenantReader {
    fn get_tenant_by_id(&self, id: TenantId) -> RepositoryResult<Option<Tenant>>;
    fn get_tenant_by_slug(&self, slug: &TenantSlug) -> RepositoryResult<Option<Tenant>>;
    fn list_tenants(&self, query: TenantListQuery) -> RepositoryResult<(usize, Vec<Tenant>)>;
    fn list_tenant_modules(&self, tenant_id: TenantId) -> RepositoryResult<Vec<SystemModule>>;
}

pub trait TenantWriter {
    fn create_tenant(&self, new_tenant: &NewTenant) -> RepositoryResult<Tenant>;
    fn update_tenant(&self, id: TenantId, updates: &UpdateTenant) -> RepositoryResult<Tenant>;
    fn set_tenant_module(
        &self,
        tenant_id: TenantId,
        module_id: ModuleId,
        enabled: bool,
    ) -> RepositoryResult<()>;
}

pub trait ModuleReader {
    fn get_module_by_id(&self, id: ModuleId) -> RepositoryResult<Option<SystemModule>>;
    fn get_module_by_name(&self, name: &ModuleName) -> RepositoryResult<Option<SystemModule>>;
    fn list_modules(&self, query: ModuleListQuery) -> RepositoryResult<Vec<SystemModule>>;
}

pub trait ModuleWriter {
    fn create_module(&self, new_module: &NewSystemModule) -> RepositoryResult<SystemModule>;
    /// Inserts modules whose name is not registered yet, returning the count.
    fn seed_modules(&self, modules: &[NewSystemModule]) -> RepositoryResult<usize>;
    fn update_module(
        &self,
        id: ModuleId,
        updates: &UpdateSystemModule,
    ) -> RepositoryResult<SystemModule>;
    /// Marks `sources` as merged into `target` and sets the target progress
    /// in one transaction. Returns the number of sources updated.
    fn consolidate_modules(
        &self,
        target: ModuleId,
        sources: &[ModuleId],
        progress: ProgressPercent,
    ) -> RepositoryResult<usize>;
}

pub trait TalentReader {
    fn get_talent_by_id(&self, id: TalentId, tenant_id: TenantId)
    -> RepositoryResult<Option<Talent>>;
    fn get_talent_by_public_id(
        &self,
        public_id: PublicId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Option<Talent>>;
    fn list_talents(&self, query: TalentListQuery) -> RepositoryResult<(usize, Vec<Talent>)>;
    fn count_talents_by_status(
        &self,
        tenant_id: TenantId,
    ) -> RepositoryResult<Vec<(TalentStatus, usize)>>;
    fn list_recent_talents(&self, tenant_id: TenantId, limit: usize)
    -> RepositoryResult<Vec<Talent>>;
}

pub trait TalentWriter {
    fn create_talent(&self, new_talent: &NewTalent) -> RepositoryResult<Talent>;
    /// Inserts the rows skipping emails already used in the tenant. Returns
    /// the number of talents created.
    fn import_talents(&self, rows: &[TalentImportRow]) -> RepositoryResult<usize>;
    fn update_talent(
        &self,
        id: TalentId,
        tenant_id: TenantId,
        updates: &UpdateTalent,
    ) -> RepositoryResult<Talent>;
    fn set_talent_status(
        &self,
        id: TalentId,
        tenant_id: TenantId,
        status: TalentStatus,
    ) -> RepositoryResult<Talent>;
    /// Deletes the talent along with its custom field values.
    fn delete_talent(&self, id: TalentId, tenant_id: TenantId) -> RepositoryResult<()>;
}

pub trait PersonReader {
    fn get_person_by_id(&self, id: PersonId, tenant_id: TenantId)
    -> RepositoryResult<Option<Person>>;
    fn list_people(&self, query: PersonListQuery) -> RepositoryResult<(usize, Vec<Person>)>;
    fn list_relationships(
        &self,
        person_id: PersonId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Vec<CompanyRelationship>>;
    fn count_relationships_by_type(
        &self,
        tenant_id: TenantId,
    ) -> RepositoryResult<Vec<(RelationshipType, usize)>>;
}

pub trait PersonWriter {
    fn create_person(&self, new_person: &NewPerson) -> RepositoryResult<Person>;
    fn update_person(
        &self,
        id: PersonId,
        tenant_id: TenantId,
        updates: &UpdatePerson,
    ) -> RepositoryResult<Person>;
    /// Deletes the person, its relationships and custom field values.
    fn delete_person(&self, id: PersonId, tenant_id: TenantId) -> RepositoryResult<()>;
    fn create_relationship(
        &self,
        relationship: &NewCompanyRelationship,
    ) -> RepositoryResult<CompanyRelationship>;
    fn delete_relationship(&self, id: RelationshipId, tenant_id: TenantId)
    -> RepositoryResult<()>;
}

pub trait CustomFieldReader {
    fn list_custom_fields(
        &self,
        tenant_id: TenantId,
        entity: CustomFieldEntity,
    ) -> RepositoryResult<Vec<CustomField>>;
    fn list_custom_field_values(
        &self,
        tenant_id: TenantId,
        entity: CustomFieldEntity,
        entity_id: i32,
    ) -> RepositoryResult<Vec<CustomFieldValue>>;
}

pub trait CustomFieldWriter {
    fn create_custom_field(&self, field: &NewCustomField) -> RepositoryResult<CustomField>;
    fn delete_custom_field(&self, id: CustomFieldId, tenant_id: TenantId) -> RepositoryResult<()>;
    /// Replaces every value of `entity_id` for the tenant's `entity` fields.
    fn replace_custom_field_values(
        &self,
        tenant_id: TenantId,
        entity: CustomFieldEntity,
        entity_id: i32,
        values: &[CustomFieldValue],
    ) -> RepositoryResult<usize>;
}

pub trait EmailTemplateReader {
    fn get_email_template(&self, id: EmailTemplateId) -> RepositoryResult<Option<EmailTemplate>>;
    fn list_email_templates(&self, active_only: bool) -> RepositoryResult<Vec<EmailTemplate>>;
}

pub trait EmailTemplateWriter {
    fn create_email_template(&self, template: &NewEmailTemplate)
    -> RepositoryResult<EmailTemplate>;
    fn update_email_template(
        &self,
        id: EmailTemplateId,
        updates: &UpdateEmailTemplate,
    ) -> RepositoryResult<EmailTemplate>;
}

pub trait PasswordPolicyReader {
    fn get_password_policy(&self, tenant_id: TenantId) -> RepositoryResult<Option<PasswordPolicy>>;
}

pub trait PasswordPolicyWriter {
    fn save_password_policy(&self, policy: &PasswordPolicy) -> RepositoryResult<PasswordPolicy>;
}
