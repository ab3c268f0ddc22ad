//! Forms for contact people and their company relationships.

use serde::Deserialize;
use validator::Validate;

use crate::domain::contact::{NewCompanyRelationship, NewPerson, RelationshipType, UpdatePerson};
use crate::domain::types::{
    CompanyName, ContactEmail, PersonId, PersonName, PhoneNumber, TenantId,
};
use crate::forms::{FormError, parse_email, parse_phone};

#[derive(Debug, Deserialize, Validate)]
pub struct PersonForm {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Validated person fields shared by create and update.
pub struct PersonPayload {
    pub name: PersonName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub position: Option<String>,
}

impl TryFrom<PersonForm> for PersonPayload {
    type Error = FormError;

    fn try_from(form: PersonForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            name: PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            email: parse_email(form.email)?,
            phone: parse_phone(form.phone)?,
            position: form.position,
        })
    }
}

impl PersonPayload {
    pub fn into_new_person(self, tenant_id: TenantId) -> NewPerson {
        NewPerson::new(tenant_id, self.name, self.email, self.phone, self.position)
    }

    pub fn into_update(self) -> UpdatePerson {
        UpdatePerson::new(self.name, self.email, self.phone, self.position)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddRelationshipForm {
    #[validate(length(min = 1, max = 256))]
    pub company_name: String,
    pub relationship_type: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AddRelationshipForm {
    pub fn into_new_relationship(
        self,
        tenant_id: TenantId,
        person_id: PersonId,
    ) -> Result<NewCompanyRelationship, FormError> {
        self.validate()?;
        let relationship_type = self
            .relationship_type
            .parse::<RelationshipType>()
            .map_err(|_| FormError::InvalidRelationshipType)?;
        let company_name = CompanyName::new(ammonia::clean(self.company_name.trim()))
            .map_err(|_| FormError::InvalidName)?;
        Ok(NewCompanyRelationship::new(
            tenant_id,
            person_id,
            company_name,
            relationship_type,
            self.notes,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_form_normalizes_contact_details() {
        let form = PersonForm {
            name: "Grace Hopper".to_string(),
            email: Some(" GRACE@Navy.mil ".to_string()),
            phone: Some(String::new()),
            position: Some("  Rear Admiral ".to_string()),
        };
        let person = PersonPayload::try_from(form)
            .expect("valid form")
            .into_new_person(TenantId::new(2).expect("valid tenant"));

        assert_eq!(person.email.as_ref().map(|e| e.as_str()), Some("grace@navy.mil"));
        assert!(person.phone.is_none());
        assert_eq!(person.position.as_deref(), Some("Rear Admiral"));
    }

    #[test]
    fn relationship_type_must_be_known() {
        let form = AddRelationshipForm {
            company_name: "Initech".to_string(),
            relationship_type: "Friend".to_string(),
            notes: None,
        };
        let result = form.into_new_relationship(
            TenantId::new(1).expect("valid tenant"),
            PersonId::new(1).expect("valid person"),
        );
        assert!(matches!(result, Err(FormError::InvalidRelationshipType)));
    }
}
