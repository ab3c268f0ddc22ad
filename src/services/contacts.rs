//! Services for contact people and their company relationships.

use crate::domain::contact::{CompanyRelationship, Person};
use crate::domain::custom_field::CustomFieldEntity;
use crate::domain::types::{PersonId, RelationshipId, TenantId};
use crate::dto::contacts::{PeoplePageData, PeopleQuery, PersonPageData};
use crate::forms::contacts::{AddRelationshipForm, PersonForm, PersonPayload};
use crate::forms::custom_fields::CustomValuesForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    CustomFieldReader, CustomFieldWriter, EmailTemplateReader, PersonListQuery, PersonReader,
    PersonWriter,
};
use crate::services::custom_fields::{custom_field_rows, replace_custom_values};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

fn get_person<R>(repo: &R, person_id: i32, tenant_id: TenantId) -> ServiceResult<Person>
where
    R: PersonReader + ?Sized,
{
    repo.get_person_by_id(PersonId::new(person_id)?, tenant_id)?
        .ok_or(ServiceError::NotFound)
}

/// Searches people by name, contact details, position or company.
pub fn load_people_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PeopleQuery,
) -> ServiceResult<PeoplePageData>
where
    R: PersonReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page = query.page.unwrap_or(1);
    let mut list_query =
        PersonListQuery::new(user.tenant()?).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, people) = repo.list_people(list_query).map_err(|err| {
        log::error!("Failed to list people: {err}");
        err
    })?;

    Ok(PeoplePageData {
        people: Paginated::new(people, page, total),
        search_query,
    })
}

pub fn load_person_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
) -> ServiceResult<PersonPageData>
where
    R: PersonReader + CustomFieldReader + EmailTemplateReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tenant_id = user.tenant()?;
    let person = get_person(repo, person_id, tenant_id)?;
    let relationships = repo.list_relationships(person.id, tenant_id)?;
    let fields = custom_field_rows(repo, tenant_id, CustomFieldEntity::Person, person.id.get())?;
    let templates = repo.list_email_templates(true)?;

    Ok(PersonPageData {
        person,
        relationships,
        fields,
        templates,
    })
}

pub fn create_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PersonForm,
) -> ServiceResult<Person>
where
    R: PersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_person = PersonPayload::try_from(form)?.into_new_person(user.tenant()?);

    repo.create_person(&new_person).map_err(|err| {
        log::error!("Failed to create person: {err}");
        ServiceError::from(err)
    })
}

pub fn update_person<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: PersonForm,
) -> ServiceResult<Person>
where
    R: PersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let updates = PersonPayload::try_from(form)?.into_update();

    repo.update_person(PersonId::new(person_id)?, user.tenant()?, &updates)
        .map_err(|err| {
            log::error!("Failed to update person: {err}");
            ServiceError::from(err)
        })
}

pub fn delete_person<R>(repo: &R, user: &AuthenticatedUser, person_id: i32) -> ServiceResult<()>
where
    R: PersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    repo.delete_person(PersonId::new(person_id)?, user.tenant()?)
        .map_err(|err| {
            log::error!("Failed to delete person: {err}");
            ServiceError::from(err)
        })
}

/// Links a person to a company. The person must belong to the tenant.
pub fn add_relationship<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: AddRelationshipForm,
) -> ServiceResult<CompanyRelationship>
where
    R: PersonReader + PersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tenant_id = user.tenant()?;
    let person = get_person(repo, person_id, tenant_id)?;
    let relationship = form.into_new_relationship(tenant_id, person.id)?;

    repo.create_relationship(&relationship).map_err(|err| {
        log::error!("Failed to add relationship: {err}");
        ServiceError::from(err)
    })
}

pub fn remove_relationship<R>(
    repo: &R,
    user: &AuthenticatedUser,
    relationship_id: i32,
) -> ServiceResult<()>
where
    R: PersonWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.delete_relationship(RelationshipId::new(relationship_id)?, user.tenant()?)
        .map_err(|err| {
            log::error!("Failed to remove relationship: {err}");
            ServiceError::from(err)
        })
}

pub fn save_person_custom_values<R>(
    repo: &R,
    user: &AuthenticatedUser,
    person_id: i32,
    form: CustomValuesForm,
) -> ServiceResult<usize>
where
    R: PersonReader + CustomFieldReader + CustomFieldWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tenant_id = user.tenant()?;
    let person = get_person(repo, person_id, tenant_id)?;

    replace_custom_values(
        repo,
        tenant_id,
        CustomFieldEntity::Person,
        person.id.get(),
        form,
    )
}

#[cfg(all(test, feature = "test-mocks"))]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::contact::RelationshipType;
    use crate::domain::types::{CompanyName, PersonName};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{admin_user, outsider_user, viewer_user};

    pub(crate) fn build_person(id: i32, name: &str) -> Person {
        let now = Utc::now().naive_utc();
        Person {
            id: PersonId::new(id).expect("valid id"),
            tenant_id: TenantId::new(42).expect("valid tenant"),
            name: PersonName::new(name).expect("valid name"),
            email: None,
            phone: None,
            position: Some("CTO".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn build_relationship(
        id: i32,
        person_id: i32,
        company: &str,
    ) -> CompanyRelationship {
        CompanyRelationship {
            id: RelationshipId::new(id).expect("valid id"),
            tenant_id: TenantId::new(42).expect("valid tenant"),
            person_id: PersonId::new(person_id).expect("valid person"),
            company_name: CompanyName::new(company).expect("valid company"),
            relationship_type: RelationshipType::Client,
            notes: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn person_page_collects_relationships_and_fields() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(build_person(id.get(), "Grace"))));
        repo.expect_list_relationships()
            .returning(|person_id, _| Ok(vec![build_relationship(1, person_id.get(), "Initech")]));
        repo.expect_list_custom_fields().returning(|_, _| Ok(vec![]));
        repo.expect_list_custom_field_values()
            .returning(|_, _, _| Ok(vec![]));
        repo.expect_list_email_templates()
            .withf(|active_only| *active_only)
            .returning(|_| Ok(vec![]));

        let data = load_person_page(&repo, &viewer_user(), 3).expect("loaded");

        assert_eq!(data.person.id.get(), 3);
        assert_eq!(data.relationships.len(), 1);
        assert_eq!(data.relationships[0].company_name.as_str(), "Initech");
    }

    #[test]
    fn relationship_needs_known_person() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id().returning(|_, _| Ok(None));
        repo.expect_create_relationship().times(0);

        let form = AddRelationshipForm {
            company_name: "Initech".to_string(),
            relationship_type: "Client".to_string(),
            notes: None,
        };
        let result = add_relationship(&repo, &viewer_user(), 9, form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn relationship_is_stored_for_tenant() {
        let mut repo = MockRepository::new();
        repo.expect_get_person_by_id()
            .returning(|id, _| Ok(Some(build_person(id.get(), "Grace"))));
        repo.expect_create_relationship()
            .withf(|rel| {
                rel.tenant_id.get() == 42
                    && rel.person_id.get() == 3
                    && rel.relationship_type == RelationshipType::Partner
            })
            .times(1)
            .returning(|rel| {
                Ok(build_relationship(5, rel.person_id.get(), rel.company_name.as_str()))
            });

        let form = AddRelationshipForm {
            company_name: "Initech".to_string(),
            relationship_type: "Partner".to_string(),
            notes: Some("met at a conference".to_string()),
        };
        let relationship = add_relationship(&repo, &viewer_user(), 3, form).expect("added");

        assert_eq!(relationship.id.get(), 5);
    }

    #[test]
    fn deleting_people_needs_admin() {
        let mut repo = MockRepository::new();
        repo.expect_delete_person().times(1).returning(|_, _| Ok(()));

        assert!(matches!(
            delete_person(&repo, &viewer_user(), 3),
            Err(ServiceError::Unauthorized)
        ));
        assert!(delete_person(&repo, &admin_user(), 3).is_ok());
    }

    #[test]
    fn outsiders_cannot_list_people() {
        let repo = MockRepository::new();
        let result = load_people_page(&repo, &outsider_user(), PeopleQuery::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
