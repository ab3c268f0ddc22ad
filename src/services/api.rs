//! Services behind the `/api/v1` JSON endpoints.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::module::ModuleView;
use crate::dto::api::{ModulesApiQuery, ModulesResponse, TalentsApiQuery, TalentsResponse};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ModuleListQuery, ModuleReader, TalentListQuery, TalentReader};
use crate::services::{ServiceResult, ensure_role};

/// Talents of the user's tenant. Without `page` every match is returned.
pub fn list_talents<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: TalentsApiQuery,
) -> ServiceResult<TalentsResponse>
where
    R: TalentReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut query = TalentListQuery::new(user.tenant()?);

    if let Some(page) = params.page {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    let search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = search {
        query = query.search(term);
    }

    let (total, talents) = repo.list_talents(query).map_err(|err| {
        log::error!("Failed to list talents: {err}");
        err
    })?;

    Ok(TalentsResponse { total, talents })
}

/// Active registry modules with their maturity.
pub fn list_modules<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ModulesApiQuery,
) -> ServiceResult<ModulesResponse>
where
    R: ModuleReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut query = ModuleListQuery::default().exclude_consolidated();
    if let Some(category) = params.category.filter(|c| !c.trim().is_empty()) {
        query = query.category(category.trim());
    }

    let modules = repo.list_modules(query).map_err(|err| {
        log::error!("Failed to list modules: {err}");
        err
    })?;

    Ok(ModulesResponse {
        modules: modules.into_iter().map(ModuleView::from).collect(),
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::module::tests::build_module;
    use crate::domain::talent::TalentStatus;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::talents::tests::build_talent;
    use crate::services::test_support::{outsider_user, viewer_user};

    #[test]
    fn talents_without_page_are_unpaginated() {
        let mut repo = MockRepository::new();
        repo.expect_list_talents()
            .withf(|query| query.pagination.is_none() && query.search.is_none())
            .returning(|_| Ok((1, vec![build_talent(1, "Ada", TalentStatus::New)])));

        let response =
            list_talents(&repo, &viewer_user(), TalentsApiQuery::default()).expect("listed");

        assert_eq!(response.total, 1);
    }

    #[test]
    fn modules_skip_consolidated_and_filter_category() {
        let mut repo = MockRepository::new();
        repo.expect_list_modules()
            .withf(|query| query.exclude_consolidated && query.category.as_deref() == Some("core"))
            .returning(|_| Ok(vec![build_module(1, "CRM", 85)]));

        let response = list_modules(
            &repo,
            &viewer_user(),
            ModulesApiQuery {
                category: Some(" core ".to_string()),
            },
        )
        .expect("listed");

        assert_eq!(response.modules.len(), 1);
    }

    #[test]
    fn api_requires_access_role() {
        let repo = MockRepository::new();
        assert!(matches!(
            list_talents(&repo, &outsider_user(), TalentsApiQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }
}
