use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ContactEmail, PhoneNumber, PublicId, TalentId, TalentName, TenantId, TypeConstraintError,
    clean_optional_text,
};

/// Position of a talent in the recruiting pipeline.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TalentStatus {
    New,
    Screening,
    Interviewing,
    Offered,
    Placed,
    Rejected,
}

impl TalentStatus {
    pub const ALL: [TalentStatus; 6] = [
        TalentStatus::New,
        TalentStatus::Screening,
        TalentStatus::Interviewing,
        TalentStatus::Offered,
        TalentStatus::Placed,
        TalentStatus::Rejected,
    ];

    /// Statuses counted as the active pipeline on the dashboard.
    pub fn is_in_pipeline(self) -> bool {
        matches!(
            self,
            TalentStatus::Screening | TalentStatus::Interviewing | TalentStatus::Offered
        )
    }
}

impl Display for TalentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TalentStatus::New => write!(f, "New"),
            TalentStatus::Screening => write!(f, "Screening"),
            TalentStatus::Interviewing => write!(f, "Interviewing"),
            TalentStatus::Offered => write!(f, "Offered"),
            TalentStatus::Placed => write!(f, "Placed"),
            TalentStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for TalentStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "New" => Ok(TalentStatus::New),
            "Screening" => Ok(TalentStatus::Screening),
            "Interviewing" => Ok(TalentStatus::Interviewing),
            "Offered" => Ok(TalentStatus::Offered),
            "Placed" => Ok(TalentStatus::Placed),
            "Rejected" => Ok(TalentStatus::Rejected),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown talent status `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Talent {
    pub id: TalentId,
    pub tenant_id: TenantId,
    pub public_id: PublicId,
    pub name: TalentName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub status: TalentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTalent {
    pub tenant_id: TenantId,
    pub public_id: PublicId,
    pub name: TalentName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub status: TalentStatus,
}

impl NewTalent {
    #[must_use]
    pub fn new(
        tenant_id: TenantId,
        name: TalentName,
        email: Option<ContactEmail>,
        phone: Option<PhoneNumber>,
        headline: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            tenant_id,
            public_id: PublicId::new(),
            name,
            email,
            phone,
            headline: clean_optional_text(headline),
            location: clean_optional_text(location),
            status: TalentStatus::New,
        }
    }

    /// Builds a talent from raw strings; blank optional values are dropped.
    pub fn try_new(
        tenant_id: i32,
        name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
        headline: Option<String>,
        location: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        let email = match email.filter(|e| !e.trim().is_empty()) {
            Some(email) => Some(ContactEmail::new(email)?),
            None => None,
        };
        let phone = match phone.filter(|p| !p.trim().is_empty()) {
            Some(phone) => Some(PhoneNumber::new(phone)?),
            None => None,
        };
        Ok(Self::new(
            TenantId::new(tenant_id)?,
            TalentName::new(name)?,
            email,
            phone,
            headline,
            location,
        ))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateTalent {
    pub name: TalentName,
    pub email: Option<ContactEmail>,
    pub phone: Option<PhoneNumber>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub status: TalentStatus,
}

impl UpdateTalent {
    #[must_use]
    pub fn new(
        name: TalentName,
        email: Option<ContactEmail>,
        phone: Option<PhoneNumber>,
        headline: Option<String>,
        location: Option<String>,
        status: TalentStatus,
    ) -> Self {
        Self {
            name,
            email,
            phone,
            headline: clean_optional_text(headline),
            location: clean_optional_text(location),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in TalentStatus::ALL {
            assert_eq!(status.to_string().parse::<TalentStatus>(), Ok(status));
        }
        assert!("Hired".parse::<TalentStatus>().is_err());
    }

    #[test]
    fn pipeline_statuses() {
        let pipeline: Vec<_> = TalentStatus::ALL
            .into_iter()
            .filter(|s| s.is_in_pipeline())
            .collect();
        assert_eq!(
            pipeline,
            vec![
                TalentStatus::Screening,
                TalentStatus::Interviewing,
                TalentStatus::Offered
            ]
        );
    }

    #[test]
    fn try_new_drops_blank_contacts() {
        let talent = NewTalent::try_new(
            1,
            " Ada Lovelace ",
            Some("  ".to_string()),
            Some(String::new()),
            Some(" Analyst ".to_string()),
            None,
        )
        .expect("valid talent");

        assert_eq!(talent.name.as_str(), "Ada Lovelace");
        assert_eq!(talent.email, None);
        assert_eq!(talent.phone, None);
        assert_eq!(talent.headline.as_deref(), Some("Analyst"));
        assert_eq!(talent.status, TalentStatus::New);
    }

    #[test]
    fn try_new_rejects_invalid_email() {
        let result = NewTalent::try_new(1, "Ada", Some("ada@".to_string()), None, None, None);
        assert_eq!(result.map(|_| ()), Err(TypeConstraintError::InvalidEmail));
    }
}
