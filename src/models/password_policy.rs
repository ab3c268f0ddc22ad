use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::password_policy::PasswordPolicy as DomainPasswordPolicy;
use crate::domain::types::{TenantId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::password_policy_enforcement)]
#[diesel(primary_key(tenant_id))]
/// Diesel model for [`crate::domain::password_policy::PasswordPolicy`].
pub struct PasswordPolicy {
    pub tenant_id: i32,
    pub min_length: i32,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
    pub max_age_days: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::password_policy_enforcement)]
#[diesel(treat_none_as_null = true)]
pub struct SavePasswordPolicy {
    pub tenant_id: i32,
    pub min_length: i32,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
    pub max_age_days: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<PasswordPolicy> for DomainPasswordPolicy {
    type Error = TypeConstraintError;

    fn try_from(policy: PasswordPolicy) -> Result<Self, Self::Error> {
        DomainPasswordPolicy::try_new(
            TenantId::try_from(policy.tenant_id)?,
            policy.min_length,
            policy.require_uppercase,
            policy.require_lowercase,
            policy.require_digit,
            policy.require_symbol,
            policy.max_age_days,
        )
    }
}

impl From<&DomainPasswordPolicy> for SavePasswordPolicy {
    fn from(policy: &DomainPasswordPolicy) -> Self {
        Self {
            tenant_id: policy.tenant_id.get(),
            min_length: policy.min_length.into(),
            require_uppercase: policy.require_uppercase,
            require_lowercase: policy.require_lowercase,
            require_digit: policy.require_digit,
            require_symbol: policy.require_symbol,
            max_age_days: policy.max_age_days.map(i32::from),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_policy_round_trips() {
        let policy = DomainPasswordPolicy::try_new(
            TenantId::new(3).expect("valid tenant"),
            12,
            true,
            false,
            true,
            true,
            Some(90),
        )
        .expect("valid policy");
        let row: SavePasswordPolicy = (&policy).into();

        let restored = DomainPasswordPolicy::try_from(PasswordPolicy {
            tenant_id: row.tenant_id,
            min_length: row.min_length,
            require_uppercase: row.require_uppercase,
            require_lowercase: row.require_lowercase,
            require_digit: row.require_digit,
            require_symbol: row.require_symbol,
            max_age_days: row.max_age_days,
            updated_at: row.updated_at,
        })
        .expect("valid row");

        assert_eq!(restored, policy);
    }
}
