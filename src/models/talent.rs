use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::talent::{
    NewTalent as DomainNewTalent, Talent as DomainTalent, TalentStatus,
    UpdateTalent as DomainUpdateTalent,
};
use crate::domain::types::{
    ContactEmail, PhoneNumber, PublicId, TalentId, TalentName, TenantId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::talents)]
/// Diesel model for [`crate::domain::talent::Talent`].
pub struct Talent {
    pub id: i32,
    pub tenant_id: i32,
    pub public_id: Vec<u8>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::talents)]
pub struct NewTalent<'a> {
    pub tenant_id: i32,
    pub public_id: &'a [u8],
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub headline: Option<&'a str>,
    pub location: Option<&'a str>,
    pub status: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::talents)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateTalent<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub headline: Option<&'a str>,
    pub location: Option<&'a str>,
    pub status: String,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Talent> for DomainTalent {
    type Error = TypeConstraintError;

    fn try_from(talent: Talent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TalentId::try_from(talent.id)?,
            tenant_id: TenantId::try_from(talent.tenant_id)?,
            public_id: PublicId::from_bytes(&talent.public_id)?,
            name: TalentName::new(talent.name)?,
            email: talent.email.map(ContactEmail::new).transpose()?,
            phone: talent.phone.map(PhoneNumber::new).transpose()?,
            headline: talent.headline,
            location: talent.location,
            status: talent.status.parse()?,
            created_at: talent.created_at,
            updated_at: talent.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewTalent> for NewTalent<'a> {
    fn from(talent: &'a DomainNewTalent) -> Self {
        Self {
            tenant_id: talent.tenant_id.get(),
            public_id: talent.public_id.as_bytes(),
            name: talent.name.as_str(),
            email: talent.email.as_ref().map(ContactEmail::as_str),
            phone: talent.phone.as_ref().map(PhoneNumber::as_str),
            headline: talent.headline.as_deref(),
            location: talent.location.as_deref(),
            status: talent.status.to_string(),
        }
    }
}

impl<'a> From<&'a DomainUpdateTalent> for UpdateTalent<'a> {
    fn from(talent: &'a DomainUpdateTalent) -> Self {
        Self {
            name: talent.name.as_str(),
            email: talent.email.as_ref().map(ContactEmail::as_str),
            phone: talent.phone.as_ref().map(PhoneNumber::as_str),
            headline: talent.headline.as_deref(),
            location: talent.location.as_deref(),
            status: talent.status.to_string(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

/// Row of a `GROUP BY status` count.
pub type StatusCount = (String, i64);

/// Parses grouped status counts, dropping rows with unknown statuses.
pub fn parse_status_counts(rows: Vec<StatusCount>) -> Vec<(TalentStatus, usize)> {
    rows.into_iter()
        .filter_map(|(status, count)| {
            let status = status.parse::<TalentStatus>().ok()?;
            Some((status, count as usize))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_talent_keeps_public_id_bytes() {
        let domain = DomainNewTalent::try_new(
            1,
            "Ada",
            Some("ada@example.com".to_string()),
            None,
            None,
            None,
        )
        .expect("valid talent");
        let insertable: NewTalent = (&domain).into();

        assert_eq!(insertable.public_id, domain.public_id.as_bytes());
        assert_eq!(insertable.email, Some("ada@example.com"));
        assert_eq!(insertable.status, "New");
    }

    #[test]
    fn db_talent_into_domain() {
        let now = Utc::now().naive_utc();
        let public_id = PublicId::new();
        let row = Talent {
            id: 5,
            tenant_id: 2,
            public_id: public_id.as_bytes().to_vec(),
            name: "Ada".to_string(),
            email: None,
            phone: Some("+14155552671".to_string()),
            headline: None,
            location: Some("London".to_string()),
            status: "Interviewing".to_string(),
            created_at: now,
            updated_at: now,
        };

        let talent = DomainTalent::try_from(row).expect("valid talent");
        assert_eq!(talent.public_id, public_id);
        assert_eq!(talent.status, TalentStatus::Interviewing);
        assert_eq!(talent.phone.map(PhoneNumber::into_inner).as_deref(), Some("+14155552671"));
    }

    #[test]
    fn unknown_statuses_are_dropped_from_counts() {
        let counts = parse_status_counts(vec![
            ("Placed".to_string(), 3),
            ("Archived".to_string(), 1),
        ]);
        assert_eq!(counts, vec![(TalentStatus::Placed, 3)]);
    }
}
