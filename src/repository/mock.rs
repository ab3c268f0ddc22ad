//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::contact::{
    CompanyRelationship, NewCompanyRelationship, NewPerson, Person, RelationshipType, UpdatePerson,
};
use crate::domain::custom_field::{CustomField, CustomFieldEntity, CustomFieldValue, NewCustomField};
use crate::domain::email_template::{EmailTemplate, NewEmailTemplate, UpdateEmailTemplate};
use crate::domain::module::{NewSystemModule, SystemModule, UpdateSystemModule};
use crate::domain::password_policy::PasswordPolicy;
use crate::domain::talent::{NewTalent, Talent, TalentStatus, UpdateTalent};
use crate::domain::tenant::{NewTenant, Tenant, UpdateTenant};
use crate::domain::types::{
    CustomFieldId, EmailTemplateId, ModuleId, ModuleName, PersonId, ProgressPercent, PublicId,
    RelationshipId, TalentId, TenantId, TenantSlug,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CustomFieldReader, CustomFieldWriter, EmailTemplateReader, EmailTemplateWriter,
    ModuleListQuery, ModuleReader, ModuleWriter, PasswordPolicyReader, PasswordPolicyWriter,
    PersonListQuery, PersonReader, PersonWriter, TalentImportRow, TalentListQuery, TalentReader,
    TalentWriter, TenantListQuery, TenantReader, TenantWriter,
};

mock! {
    pub Repository {}

    impl TenantReader for Repository {
        fn get_tenant_by_id(&self, id: TenantId) -> RepositoryResult<Option<Tenant>>;
        fn get_tenant_by_slug(&self, slug: &TenantSlug) -> RepositoryResult<Option<Tenant>>;
        fn list_tenants(&self, query: TenantListQuery) -> RepositoryResult<(usize, Vec<Tenant>)>;
        fn list_tenant_modules(&self, tenant_id: TenantId) -> RepositoryResult<Vec<SystemModule>>;
    }

    impl TenantWriter for Repository {
        fn create_tenant(&self, new_tenant: &NewTenant) -> RepositoryResult<Tenant>;
        fn update_tenant(&self, id: TenantId, updates: &UpdateTenant) -> RepositoryResult<Tenant>;
        fn set_tenant_module(
            &self,
            tenant_id: TenantId,
            module_id: ModuleId,
            enabled: bool,
        ) -> RepositoryResult<()>;
    }

    impl ModuleReader for Repository {
        fn get_module_by_id(&self, id: ModuleId) -> RepositoryResult<Option<SystemModule>>;
        fn get_module_by_name(&self, name: &ModuleName) -> RepositoryResult<Option<SystemModule>>;
        fn list_modules(&self, query: ModuleListQuery) -> RepositoryResult<Vec<SystemModule>>;
    }

    impl ModuleWriter for Repository {
        fn create_module(&self, new_module: &NewSystemModule) -> RepositoryResult<SystemModule>;
        fn seed_modules(&self, modules: &[NewSystemModule]) -> RepositoryResult<usize>;
        fn update_module(
            &self,
            id: ModuleId,
            updates: &UpdateSystemModule,
        ) -> RepositoryResult<SystemModule>;
        fn consolidate_modules(
            &self,
            target: ModuleId,
            sources: &[ModuleId],
            progress: ProgressPercent,
        ) -> RepositoryResult<usize>;
    }

    impl TalentReader for Repository {
        fn get_talent_by_id(&self, id: TalentId, tenant_id: TenantId) -> RepositoryResult<Option<Talent>>;
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
        fn list_recent_talents(&self, tenant_id: TenantId, limit: usize) -> RepositoryResult<Vec<Talent>>;
    }

    impl TalentWriter for Repository {
        fn create_talent(&self, new_talent: &NewTalent) -> RepositoryResult<Talent>;
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
        fn delete_talent(&self, id: TalentId, tenant_id: TenantId) -> RepositoryResult<()>;
    }

    impl PersonReader for Repository {
        fn get_person_by_id(&self, id: PersonId, tenant_id: TenantId) -> RepositoryResult<Option<Person>>;
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

    impl PersonWriter for Repository {
        fn create_person(&self, new_person: &NewPerson) -> RepositoryResult<Person>;
        fn update_person(
            &self,
            id: PersonId,
            tenant_id: TenantId,
            updates: &UpdatePerson,
        ) -> RepositoryResult<Person>;
        fn delete_person(&self, id: PersonId, tenant_id: TenantId) -> RepositoryResult<()>;
        fn create_relationship(
            &self,
            relationship: &NewCompanyRelationship,
        ) -> RepositoryResult<CompanyRelationship>;
        fn delete_relationship(&self, id: RelationshipId, tenant_id: TenantId) -> RepositoryResult<()>;
    }

    impl CustomFieldReader for Repository {
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

    impl CustomFieldWriter for Repository {
        fn create_custom_field(&self, field: &NewCustomField) -> RepositoryResult<CustomField>;
        fn delete_custom_field(&self, id: CustomFieldId, tenant_id: TenantId) -> RepositoryResult<()>;
        fn replace_custom_field_values(
            &self,
            tenant_id: TenantId,
            entity: CustomFieldEntity,
            entity_id: i32,
            values: &[CustomFieldValue],
        ) -> RepositoryResult<usize>;
    }

    impl EmailTemplateReader for Repository {
        fn get_email_template(&self, id: EmailTemplateId) -> RepositoryResult<Option<EmailTemplate>>;
        fn list_email_templates(&self, active_only: bool) -> RepositoryResult<Vec<EmailTemplate>>;
    }

    impl EmailTemplateWriter for Repository {
        fn create_email_template(&self, template: &NewEmailTemplate) -> RepositoryResult<EmailTemplate>;
        fn update_email_template(
            &self,
            id: EmailTemplateId,
            updates: &UpdateEmailTemplate,
        ) -> RepositoryResult<EmailTemplate>;
    }

    impl PasswordPolicyReader for Repository {
        fn get_password_policy(&self, tenant_id: TenantId) -> RepositoryResult<Option<PasswordPolicy>>;
    }

    impl PasswordPolicyWriter for Repository {
        fn save_password_policy(&self, policy: &PasswordPolicy) -> RepositoryResult<PasswordPolicy>;
    }
}
