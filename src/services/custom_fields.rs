//! Services for tenant-defined custom fields.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::custom_field::{CustomField, CustomFieldEntity};
use crate::domain::types::{CustomFieldId, TenantId};
use crate::dto::custom_fields::{CustomFieldRow, CustomFieldsPageData};
use crate::forms::custom_fields::{AddCustomFieldForm, CustomValuesForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CustomFieldReader, CustomFieldWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

pub fn load_custom_fields<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<CustomFieldsPageData>
where
    R: CustomFieldReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let tenant_id = user.tenant()?;
    Ok(CustomFieldsPageData {
        talent_fields: repo.list_custom_fields(tenant_id, CustomFieldEntity::Talent)?,
        person_fields: repo.list_custom_fields(tenant_id, CustomFieldEntity::Person)?,
    })
}

/// Adds a field definition; names are unique per tenant and entity.
pub fn create_custom_field<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCustomFieldForm,
) -> ServiceResult<CustomField>
where
    R: CustomFieldWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let field = form.into_new_field(user.tenant()?)?;

    repo.create_custom_field(&field).map_err(|err| {
        log::error!("Failed to create custom field: {err}");
        match ServiceError::from(err) {
            ServiceError::Conflict(_) => {
                ServiceError::Form(format!("Поле «{}» уже существует.", field.name))
            }
            other => other,
        }
    })
}

/// Removes a definition and every value stored for it.
pub fn delete_custom_field<R>(
    repo: &R,
    user: &AuthenticatedUser,
    field_id: i32,
) -> ServiceResult<()>
where
    R: CustomFieldWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_custom_field(CustomFieldId::new(field_id)?, user.tenant()?)
        .map_err(|err| {
            log::error!("Failed to delete custom field: {err}");
            ServiceError::from(err)
        })
}

/// Definitions of `entity` joined with the values stored for one record.
pub(crate) fn custom_field_rows<R>(
    repo: &R,
    tenant_id: TenantId,
    entity: CustomFieldEntity,
    entity_id: i32,
) -> ServiceResult<Vec<CustomFieldRow>>
where
    R: CustomFieldReader + ?Sized,
{
    let fields = repo.list_custom_fields(tenant_id, entity)?;
    let values = repo.list_custom_field_values(tenant_id, entity, entity_id)?;
    Ok(CustomFieldRow::join(fields, &values))
}

/// Validates and stores every custom value of one record. The caller is
/// responsible for checking that the record belongs to the tenant.
pub(crate) fn replace_custom_values<R>(
    repo: &R,
    tenant_id: TenantId,
    entity: CustomFieldEntity,
    entity_id: i32,
    form: CustomValuesForm,
) -> ServiceResult<usize>
where
    R: CustomFieldReader + CustomFieldWriter + ?Sized,
{
    let fields = repo.list_custom_fields(tenant_id, entity)?;
    let values = form.into_values(&fields, entity_id)?;

    repo.replace_custom_field_values(tenant_id, entity, entity_id, &values)
        .map_err(|err| {
            log::error!("Failed to save custom values: {err}");
            ServiceError::from(err)
        })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::custom_field::CustomFieldType;
    use crate::domain::custom_field::tests::build_field;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, viewer_user};

    fn add_form() -> AddCustomFieldForm {
        AddCustomFieldForm {
            entity: "talent".to_string(),
            name: "Seniority".to_string(),
            field_type: "text".to_string(),
            options: String::new(),
            is_required: None,
        }
    }

    #[test]
    fn only_admins_define_fields() {
        let mut repo = MockRepository::new();
        repo.expect_create_custom_field().times(0);

        let result = create_custom_field(&repo, &viewer_user(), add_form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn duplicate_name_becomes_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_custom_field()
            .times(1)
            .returning(|_| Err(RepositoryError::ConstraintViolation("unique".to_string())));

        let result = create_custom_field(&repo, &admin_user(), add_form());

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_scopes_field_to_user_tenant() {
        let mut repo = MockRepository::new();
        repo.expect_create_custom_field()
            .withf(|field| field.tenant_id.get() == 42 && field.entity == CustomFieldEntity::Talent)
            .times(1)
            .returning(|field| {
                Ok(build_field(
                    9,
                    field.name.as_str(),
                    field.field_type,
                    &[],
                    field.is_required,
                ))
            });

        let field = create_custom_field(&repo, &admin_user(), add_form()).expect("created");

        assert_eq!(field.id.get(), 9);
    }

    #[test]
    fn invalid_value_blocks_saving() {
        let mut repo = MockRepository::new();
        repo.expect_list_custom_fields().returning(|_, _| {
            Ok(vec![build_field(
                1,
                "Years",
                CustomFieldType::Number,
                &[],
                false,
            )])
        });
        repo.expect_replace_custom_field_values().times(0);

        let form = CustomValuesForm {
            field_id: vec![1],
            value: vec!["many".to_string()],
        };
        let result = replace_custom_values(
            &repo,
            TenantId::new(42).expect("valid tenant"),
            CustomFieldEntity::Talent,
            3,
            form,
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }
}
