//! Repository implementation for contact people and company relationships.

use diesel::{Connection, dsl::count_star, prelude::*};

use crate::{
    domain::{
        contact::{
            CompanyRelationship, NewCompanyRelationship, NewPerson, Person, RelationshipType,
            UpdatePerson,
        },
        custom_field::CustomFieldEntity,
        types::{PersonId, RelationshipId, TenantId},
    },
    models::contact::{
        CompanyRelationship as DbCompanyRelationship,
        NewCompanyRelationship as DbNewCompanyRelationship, NewPerson as DbNewPerson,
        Person as DbPerson, UpdatePerson as DbUpdatePerson, parse_relationship_counts,
    },
    repository::{
        DieselRepository, PersonListQuery, PersonReader, PersonWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl PersonReader for DieselRepository {
    fn get_person_by_id(
        &self,
        id: PersonId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Option<Person>> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let db_person = people::table
            .filter(people::id.eq(id.get()))
            .filter(people::tenant_id.eq(tenant_id.get()))
            .first::<DbPerson>(&mut conn)
            .optional()?;

        db_person
            .map(Person::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_people(&self, query: PersonListQuery) -> RepositoryResult<(usize, Vec<Person>)> {
        use crate::schema::{company_relationships, people};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = people::table
                .filter(people::tenant_id.eq(query.tenant_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            let term = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty());
            if let Some(term) = term {
                let pattern = format!("%{term}%");
                let by_company = company_relationships::table
                    .filter(company_relationships::company_name.like(pattern.clone()))
                    .select(company_relationships::person_id);
                items = items.filter(
                    people::name
                        .like(pattern.clone())
                        .or(people::email.like(pattern.clone()))
                        .or(people::phone.like(pattern.clone()))
                        .or(people::position.like(pattern))
                        .or(people::id.eq_any(by_company)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(people::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let people = items
            .load::<DbPerson>(&mut conn)?
            .into_iter()
            .map(Person::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, people))
    }

    fn list_relationships(
        &self,
        person_id: PersonId,
        tenant_id: TenantId,
    ) -> RepositoryResult<Vec<CompanyRelationship>> {
        use crate::schema::company_relationships;

        let mut conn = self.conn()?;
        let rows = company_relationships::table
            .filter(company_relationships::person_id.eq(person_id.get()))
            .filter(company_relationships::tenant_id.eq(tenant_id.get()))
            .order(company_relationships::company_name.asc())
            .load::<DbCompanyRelationship>(&mut conn)?;

        rows.into_iter()
            .map(|row| CompanyRelationship::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn count_relationships_by_type(
        &self,
        tenant_id: TenantId,
    ) -> RepositoryResult<Vec<(RelationshipType, usize)>> {
        use crate::schema::company_relationships;

        let mut conn = self.conn()?;
        let rows = company_relationships::table
            .filter(company_relationships::tenant_id.eq(tenant_id.get()))
            .group_by(company_relationships::relationship_type)
            .select((company_relationships::relationship_type, count_star()))
            .load::<(String, i64)>(&mut conn)?;

        Ok(parse_relationship_counts(rows))
    }
}

impl PersonWriter for DieselRepository {
    fn create_person(&self, new_person: &NewPerson) -> RepositoryResult<Person> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let db_new_person: DbNewPerson = new_person.into();

        let db_person = diesel::insert_into(people::table)
            .values(&db_new_person)
            .get_result::<DbPerson>(&mut conn)?;

        Ok(Person::try_from(db_person)?)
    }

    fn update_person(
        &self,
        id: PersonId,
        tenant_id: TenantId,
        updates: &UpdatePerson,
    ) -> RepositoryResult<Person> {
        use crate::schema::people;

        let mut conn = self.conn()?;
        let db_updates: DbUpdatePerson = updates.into();

        let db_person = diesel::update(
            people::table
                .filter(people::id.eq(id.get()))
                .filter(people::tenant_id.eq(tenant_id.get())),
        )
        .set(&db_updates)
        .get_result::<DbPerson>(&mut conn)?;

        Ok(Person::try_from(db_person)?)
    }

    fn delete_person(&self, id: PersonId, tenant_id: TenantId) -> RepositoryResult<()> {
        use crate::schema::{company_relationships, custom_field_values, custom_fields, people};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::delete(
                company_relationships::table
                    .filter(company_relationships::person_id.eq(id.get()))
                    .filter(company_relationships::tenant_id.eq(tenant_id.get())),
            )
            .execute(conn)?;

            let person_fields = custom_fields::table
                .filter(custom_fields::tenant_id.eq(tenant_id.get()))
                .filter(custom_fields::entity_type.eq(CustomFieldEntity::Person.as_str()))
                .select(custom_fields::id);
            diesel::delete(
                custom_field_values::table
                    .filter(custom_field_values::entity_id.eq(id.get()))
                    .filter(custom_field_values::field_id.eq_any(person_fields)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(
                people::table
                    .filter(people::id.eq(id.get()))
                    .filter(people::tenant_id.eq(tenant_id.get())),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            Ok(())
        })
        .map_err(RepositoryError::from)
    }

    fn create_relationship(
        &self,
        relationship: &NewCompanyRelationship,
    ) -> RepositoryResult<CompanyRelationship> {
        use crate::schema::company_relationships;

        let mut conn = self.conn()?;
        let db_relationship: DbNewCompanyRelationship = relationship.into();

        let row = diesel::insert_into(company_relationships::table)
            .values(&db_relationship)
            .get_result::<DbCompanyRelationship>(&mut conn)?;

        Ok(CompanyRelationship::try_from(row)?)
    }

    fn delete_relationship(&self, id: RelationshipId, tenant_id: TenantId) -> RepositoryResult<()> {
        use crate::schema::company_relationships;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            company_relationships::table
                .filter(company_relationships::id.eq(id.get()))
                .filter(company_relationships::tenant_id.eq(tenant_id.get())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
