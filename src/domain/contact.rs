//! Contact people and their relationships with companies.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CompanyName, ContactEmail, PersonId, PersonName, PhoneNumber, RelationshipId, TenantId,
    TypeConstraintError, clean_optional_text,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub tenant_id: TenantId,
    pub name: PersonName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewPerson {
    pub tenant_id: TenantId,
    pub name: PersonName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
}

impl NewPerson {
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        name: PersonName,
        email: Option<ContactEmail>,
        phone: Option<PhoneNumber>,
        position: Option<String>,
    ) -> Self {
        Self {
            tenant_id,
            name,
            email,
            phone,
            position: clean_optional_text(position),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdatePerson {
    pub name: PersonName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
}

impl UpdatePerson {
    #[must_use]
    pub fn new(
        name: PersonName,
        email: Option<ContactEmail>,
        phone: Option<PhoneNumber>,
        position: Option<String>,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            position: clean_optional_text(position),
        }
    }
}

/// Kind of link between a contact and a company.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    Client,
    Prospect,
    Partner,
    Vendor,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Client,
        RelationshipType::Prospect,
        RelationshipType::Partner,
        RelationshipType::Vendor,
    ];
}

impl Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipType::Client => write!(f, "Client"),
            RelationshipType::Prospect => write!(f, "Prospect"),
            RelationshipType::Partner => write!(f, "Partner"),
            RelationshipType::Vendor => write!(f, "Vendor"),
        }
    }
}

impl FromStr for RelationshipType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Client" => Ok(RelationshipType::Client),
            "Prospect" => Ok(RelationshipType::Prospect),
            "Partner" => Ok(RelationshipType::Partner),
            "Vendor" => Ok(RelationshipType::Vendor),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown relationship type `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CompanyRelationship {
    pub id: RelationshipId,
    pub tenant_id: TenantId,
    pub person_id: PersonId,
    pub company_name: CompanyName,
    pub relationship_type: RelationshipType,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCompanyRelationship {
    pub tenant_id: TenantId,
    pub person_id: PersonId,
    pub company_name: CompanyName,
    pub relationship_type: RelationshipType,
    pub notes: Option<String>,
}

impl NewCompanyRelationship {
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        person_id: PersonId,
        company_name: CompanyName,
        relationship_type: RelationshipType,
        notes: Option<String>,
    ) -> Self {
        Self {
            tenant_id,
            person_id,
            company_name,
            relationship_type,
            notes: clean_optional_text(notes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_type_parses_known_values() {
        for kind in RelationshipType::ALL {
            assert_eq!(kind.to_string().parse::<RelationshipType>(), Ok(kind));
        }
        assert!("Competitor".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn new_relationship_cleans_notes() {
        let relationship = NewCompanyRelationship::new(
            TenantId::new(1).expect("valid tenant"),
            PersonId::new(2).expect("valid person"),
            CompanyName::new("Initech").expect("valid company"),
            RelationshipType::Client,
            Some("   ".to_string()),
        );
        assert_eq!(relationship.notes, None);
    }
}
