//! Diesel models for contact people and company relationships.

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::contact::{
    CompanyRelationship as DomainCompanyRelationship,
    NewCompanyRelationship as DomainNewCompanyRelationship, NewPerson as DomainNewPerson,
    Person as DomainPerson, RelationshipType, UpdatePerson as DomainUpdatePerson,
};
use crate::domain::types::{
    CompanyName, ContactEmail, PersonId, PersonName, PhoneNumber, RelationshipId, TenantId,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::people)]
/// Diesel model for [`crate::domain::contact::Person`].
pub struct Person {
    pub id: i32,
    pub tenant_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::people)]
pub struct NewPerson<'a> {
    pub tenant_id: i32,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::people)]
#[diesel(treat_none_as_null = true)]
pub struct UpdatePerson<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Person, foreign_key = person_id))]
#[diesel(table_name = crate::schema::company_relationships)]
pub struct CompanyRelationship {
    pub id: i32,
    pub tenant_id: i32,
    pub person_id: i32,
    pub company_name: String,
    pub relationship_type: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::company_relationships)]
pub struct NewCompanyRelationship<'a> {
    pub tenant_id: i32,
    pub person_id: i32,
    pub company_name: &'a str,
    pub relationship_type: String,
    pub notes: Option<&'a str>,
}

impl TryFrom<Person> for DomainPerson {
    type Error = TypeConstraintError;

    fn try_from(person: Person) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PersonId::try_from(person.id)?,
            tenant_id: TenantId::try_from(person.tenant_id)?,
            name: PersonName::new(person.name)?,
            email: person.email.map(ContactEmail::new).transpose()?,
            phone: person.phone.map(PhoneNumber::new).transpose()?,
            position: person.position,
            created_at: person.created_at,
            updated_at: person.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPerson> for NewPerson<'a> {
    fn from(person: &'a DomainNewPerson) -> Self {
        Self {
            tenant_id: person.tenant_id.get(),
            name: person.name.as_str(),
            email: person.email.as_ref().map(ContactEmail::as_str),
            phone: person.phone.as_ref().map(PhoneNumber::as_str),
            position: person.position.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdatePerson> for UpdatePerson<'a> {
    fn from(person: &'a DomainUpdatePerson) -> Self {
        Self {
            name: person.name.as_str(),
            email: person.email.as_ref().map(ContactEmail::as_str),
            phone: person.phone.as_ref().map(PhoneNumber::as_str),
            position: person.position.as_deref(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl TryFrom<CompanyRelationship> for DomainCompanyRelationship {
    type Error = TypeConstraintError;

    fn try_from(relationship: CompanyRelationship) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RelationshipId::try_from(relationship.id)?,
            tenant_id: TenantId::try_from(relationship.tenant_id)?,
            person_id: PersonId::try_from(relationship.person_id)?,
            company_name: CompanyName::new(relationship.company_name)?,
            relationship_type: relationship.relationship_type.parse()?,
            notes: relationship.notes,
            created_at: relationship.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewCompanyRelationship> for NewCompanyRelationship<'a> {
    fn from(relationship: &'a DomainNewCompanyRelationship) -> Self {
        Self {
            tenant_id: relationship.tenant_id.get(),
            person_id: relationship.person_id.get(),
            company_name: relationship.company_name.as_str(),
            relationship_type: relationship.relationship_type.to_string(),
            notes: relationship.notes.as_deref(),
        }
    }
}

/// Parses grouped relationship type counts, dropping unknown types.
pub fn parse_relationship_counts(rows: Vec<(String, i64)>) -> Vec<(RelationshipType, usize)> {
    rows.into_iter()
        .filter_map(|(kind, count)| Some((kind.parse::<RelationshipType>().ok()?, count as usize)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_row_with_unknown_type_fails() {
        let row = CompanyRelationship {
            id: 1,
            tenant_id: 1,
            person_id: 1,
            company_name: "Initech".to_string(),
            relationship_type: "Competitor".to_string(),
            notes: None,
            created_at: Utc::now().naive_utc(),
        };
        assert!(DomainCompanyRelationship::try_from(row).is_err());
    }

    #[test]
    fn new_person_maps_optional_fields() {
        let domain = DomainNewPerson::new(
            TenantId::new(4).expect("valid tenant"),
            PersonName::new("Peter Gibbons").expect("valid name"),
            Some(ContactEmail::new("peter@initech.com").expect("valid email")),
            None,
            Some("Engineer".to_string()),
        );
        let insertable: NewPerson = (&domain).into();

        assert_eq!(insertable.tenant_id, 4);
        assert_eq!(insertable.email, Some("peter@initech.com"));
        assert_eq!(insertable.phone, None);
        assert_eq!(insertable.position, Some("Engineer"));
    }
}
