//! Services behind the talent pages and the CSV import.

use std::io::Read;

use crate::domain::custom_field::CustomFieldEntity;
use crate::domain::talent::{Talent, TalentStatus, UpdateTalent};
use crate::domain::types::{TalentId, TenantId};
use crate::dto::talents::{ImportSummary, TalentPageData, TalentsPageData, TalentsQuery};
use crate::forms::custom_fields::CustomValuesForm;
use crate::forms::talents::{AddTalentForm, EditTalentForm, TalentStatusForm, parse_talents_csv};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CustomFieldReader, CustomFieldWriter, EmailTemplateReader, TalentListQuery, TalentReader,
    TalentWriter,
};
use crate::services::custom_fields::{custom_field_rows, replace_custom_values};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

fn duplicate_email(err: ServiceError) -> ServiceError {
    match err {
        ServiceError::Conflict(_) => {
            ServiceError::Form("Кандидат с таким email уже существует.".to_string())
        }
        other => other,
    }
}

fn get_talent<R>(repo: &R, talent_id: i32, tenant_id: TenantId) -> ServiceResult<Talent>
where
    R: TalentReader + ?Sized,
{
    repo.get_talent_by_id(TalentId::new(talent_id)?, tenant_id)?
        .ok_or(ServiceError::NotFound)
}

/// Searches the tenant talents. An unknown status filter is ignored.
pub fn load_talents_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: TalentsQuery,
) -> ServiceResult<TalentsPageData>
where
    R: TalentReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let mut list_query =
        TalentListQuery::new(user.tenant()?).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<TalentStatus>().ok());
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let (total, talents) = repo.list_talents(list_query).map_err(|err| {
        log::error!("Failed to list talents: {err}");
        err
    })?;

    Ok(TalentsPageData {
        talents: Paginated::new(talents, page, total),
        search_query,
        status,
    })
}

pub fn load_talent_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    talent_id: i32,
) -> ServiceResult<TalentPageData>
where
    R: TalentReader + CustomFieldReader + EmailTemplateReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tenant_id = user.tenant()?;
    let talent = get_talent(repo, talent_id, tenant_id)?;
    let fields = custom_field_rows(repo, tenant_id, CustomFieldEntity::Talent, talent.id.get())?;
    let templates = repo.list_email_templates(true)?;

    Ok(TalentPageData {
        talent,
        fields,
        templates,
    })
}

pub fn create_talent<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddTalentForm,
) -> ServiceResult<Talent>
where
    R: TalentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_talent = form.into_new_talent(user.tenant()?)?;

    repo.create_talent(&new_talent).map_err(|err| {
        log::error!("Failed to create talent: {err}");
        duplicate_email(err.into())
    })
}

pub fn update_talent<R>(
    repo: &R,
    user: &AuthenticatedUser,
    talent_id: i32,
    form: EditTalentForm,
) -> ServiceResult<Talent>
where
    R: TalentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let updates = UpdateTalent::try_from(form)?;

    repo.update_talent(TalentId::new(talent_id)?, user.tenant()?, &updates)
        .map_err(|err| {
            log::error!("Failed to update talent: {err}");
            duplicate_email(err.into())
        })
}

/// Moves a talent to another pipeline stage.
pub fn change_talent_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    talent_id: i32,
    form: TalentStatusForm,
) -> ServiceResult<Talent>
where
    R: TalentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let status = TalentStatus::try_from(form)?;

    repo.set_talent_status(TalentId::new(talent_id)?, user.tenant()?, status)
        .map_err(|err| {
            log::error!("Failed to change talent status: {err}");
            ServiceError::from(err)
        })
}

pub fn delete_talent<R>(repo: &R, user: &AuthenticatedUser, talent_id: i32) -> ServiceResult<()>
where
    R: TalentWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_talent(TalentId::new(talent_id)?, user.tenant()?)
        .map_err(|err| {
            log::error!("Failed to delete talent: {err}");
            ServiceError::from(err)
        })
}

/// Imports talents from CSV. Rows whose email already exists in the tenant
/// are skipped and counted as duplicates.
pub fn import_talents<R, F>(
    repo: &R,
    user: &AuthenticatedUser,
    reader: F,
) -> ServiceResult<ImportSummary>
where
    R: TalentWriter + CustomFieldReader + ?Sized,
    F: Read,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let tenant_id = user.tenant()?;
    let fields = repo.list_custom_fields(tenant_id, CustomFieldEntity::Talent)?;

    let csv = parse_talents_csv(reader, tenant_id, &fields).map_err(|err| {
        log::error!("Failed to parse talents: {err}");
        ServiceError::Form(format!("Ошибка при разборе CSV: {err}"))
    })?;

    let created = repo.import_talents(&csv.rows).map_err(|err| {
        log::error!("Failed to import talents: {err}");
        err
    })?;
    log::info!(
        "Imported {created} talents for tenant #{tenant_id}, {} rejected",
        csv.rejected
    );

    Ok(ImportSummary {
        created,
        duplicates: csv.rows.len().saturating_sub(created),
        rejected: csv.rejected,
    })
}

pub fn save_talent_custom_values<R>(
    repo: &R,
    user: &AuthenticatedUser,
    talent_id: i32,
    form: CustomValuesForm,
) -> ServiceResult<usize>
where
    R: TalentReader + CustomFieldReader + CustomFieldWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tenant_id = user.tenant()?;
    let talent = get_talent(repo, talent_id, tenant_id)?;

    replace_custom_values(
        repo,
        tenant_id,
        CustomFieldEntity::Talent,
        talent.id.get(),
        form,
    )
}

#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{PublicId, TalentName};
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, viewer_user};

    pub(crate) fn build_talent(id: i32, name: &str, status: TalentStatus) -> Talent {
        let now = Utc::now().naive_utc();
        Talent {
            id: TalentId::new(id).expect("valid id"),
            tenant_id: TenantId::new(42).expect("valid tenant"),
            public_id: PublicId::new(),
            name: TalentName::new(name).expect("valid name"),
            email: None,
            phone: None,
            headline: None,
            location: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn list_applies_search_and_status() {
        let mut repo = MockRepository::new();
        repo.expect_list_talents()
            .withf(|query| {
                query.tenant_id.get() == 42
                    && query.search.as_deref() == Some("rust")
                    && query.status == Some(TalentStatus::Interviewing)
            })
            .times(1)
            .returning(|_| Ok((1, vec![build_talent(1, "Ada", TalentStatus::Interviewing)])));

        let data = load_talents_page(
            &repo,
            &viewer_user(),
            TalentsQuery {
                search: Some("  rust ".to_string()),
                status: Some("Interviewing".to_string()),
                page: None,
            },
        )
        .expect("loaded");

        assert_eq!(data.talents.items.len(), 1);
        assert_eq!(data.search_query.as_deref(), Some("rust"));
    }

    #[test]
    fn duplicate_email_on_create_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_talent()
            .returning(|_| Err(RepositoryError::ConstraintViolation("unique".to_string())));

        let form = AddTalentForm {
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
            headline: None,
            location: None,
        };
        let result = create_talent(&repo, &viewer_user(), form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn viewers_cannot_delete() {
        let mut repo = MockRepository::new();
        repo.expect_delete_talent().times(0);

        let result = delete_talent(&repo, &viewer_user(), 1);

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn import_counts_duplicates_and_rejects() {
        let mut repo = MockRepository::new();
        repo.expect_list_custom_fields().returning(|_, _| Ok(vec![]));
        repo.expect_import_talents()
            .withf(|rows| rows.len() == 3)
            .times(1)
            .returning(|_| Ok(2));

        let data = "name,email\nAda,ada@example.com\nGrace,grace@example.com\n\
                    Ada Again,ada@example.com\n,missing@example.com\n";
        let summary = import_talents(&repo, &admin_user(), data.as_bytes()).expect("imported");

        assert_eq!(
            summary,
            ImportSummary {
                created: 2,
                duplicates: 1,
                rejected: 1,
            }
        );
    }

    #[test]
    fn custom_values_require_existing_talent() {
        let mut repo = MockRepository::new();
        repo.expect_get_talent_by_id().returning(|_, _| Ok(None));
        repo.expect_replace_custom_field_values().times(0);

        let result =
            save_talent_custom_values(&repo, &viewer_user(), 7, CustomValuesForm::default());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
