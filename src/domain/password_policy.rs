//! Per-tenant password policy enforcement rules.

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TenantId, TypeConstraintError};

pub const MIN_PASSWORD_LENGTH: u8 = 6;
pub const MAX_PASSWORD_LENGTH: u8 = 128;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PasswordPolicy {
    pub tenant_id: TenantId,
    pub min_length: u8,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
    /// Days after which a password must be changed; `None` disables expiry.
    pub max_age_days: Option<u16>,
}

/// Single rule a password failed to satisfy.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PasswordViolation {
    TooShort { min_length: u8 },
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSymbol,
}

impl Display for PasswordViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordViolation::TooShort { min_length } => {
                write!(f, "Пароль должен содержать не менее {min_length} символов")
            }
            PasswordViolation::MissingUppercase => write!(f, "Нужна хотя бы одна заглавная буква"),
            PasswordViolation::MissingLowercase => write!(f, "Нужна хотя бы одна строчная буква"),
            PasswordViolation::MissingDigit => write!(f, "Нужна хотя бы одна цифра"),
            PasswordViolation::MissingSymbol => write!(f, "Нужен хотя бы один спецсимвол"),
        }
    }
}

impl PasswordPolicy {
    /// Policy applied to tenants that never saved their own.
    pub fn default_for(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: false,
            max_age_days: None,
        }
    }

    pub fn try_new(
        tenant_id: TenantId,
        min_length: i32,
        require_uppercase: bool,
        require_lowercase: bool,
        require_digit: bool,
        require_symbol: bool,
        max_age_days: Option<i32>,
    ) -> Result<Self, TypeConstraintError> {
        let (min, max) = (
            i32::from(MIN_PASSWORD_LENGTH),
            i32::from(MAX_PASSWORD_LENGTH),
        );
        if !(min..=max).contains(&min_length) {
            return Err(TypeConstraintError::OutOfRange {
                value: min_length.into(),
                min: min.into(),
                max: max.into(),
            });
        }
        let max_age_days = match max_age_days {
            None => None,
            Some(days) if (1..=3650).contains(&days) => Some(days as u16),
            Some(days) => {
                return Err(TypeConstraintError::OutOfRange {
                    value: days.into(),
                    min: 1,
                    max: 3650,
                });
            }
        };

        Ok(Self {
            tenant_id,
            min_length: min_length as u8,
            require_uppercase,
            require_lowercase,
            require_digit,
            require_symbol,
            max_age_days,
        })
    }

    /// Returns every rule `password` breaks; empty means it is accepted.
    pub fn check(&self, password: &str) -> Vec<PasswordViolation> {
        let mut violations = Vec::new();

        if password.chars().count() < usize::from(self.min_length) {
            violations.push(PasswordViolation::TooShort {
                min_length: self.min_length,
            });
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            violations.push(PasswordViolation::MissingUppercase);
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            violations.push(PasswordViolation::MissingLowercase);
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordViolation::MissingDigit);
        }
        let has_symbol = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
        if self.require_symbol && !has_symbol {
            violations.push(PasswordViolation::MissingSymbol);
        }

        violations
    }

    /// Whether a password last changed at `changed_at` has expired by `now`.
    pub fn is_expired(&self, changed_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self.max_age_days {
            Some(days) => now.signed_duration_since(changed_at).num_days() > i64::from(days),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn tenant() -> TenantId {
        TenantId::new(1).expect("valid tenant")
    }

    #[test]
    fn default_policy_reports_all_violations() {
        let policy = PasswordPolicy::default_for(tenant());

        assert_eq!(
            policy.check("abc"),
            vec![
                PasswordViolation::TooShort { min_length: 8 },
                PasswordViolation::MissingUppercase,
                PasswordViolation::MissingDigit,
            ]
        );
        assert!(policy.check("Recruit2025").is_empty());
    }

    #[test]
    fn symbol_rule_ignores_whitespace() {
        let policy = PasswordPolicy::try_new(tenant(), 6, false, false, false, true, None)
            .expect("valid policy");

        assert_eq!(
            policy.check("abc def"),
            vec![PasswordViolation::MissingSymbol]
        );
        assert!(policy.check("abc#def").is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let policy = PasswordPolicy::try_new(tenant(), 6, false, false, false, false, None)
            .expect("valid policy");

        assert!(policy.check("пароль").is_empty());
    }

    #[test]
    fn try_new_validates_ranges() {
        assert!(PasswordPolicy::try_new(tenant(), 5, true, true, true, true, None).is_err());
        assert!(PasswordPolicy::try_new(tenant(), 129, true, true, true, true, None).is_err());
        assert!(PasswordPolicy::try_new(tenant(), 8, true, true, true, true, Some(0)).is_err());
        assert!(PasswordPolicy::try_new(tenant(), 8, true, true, true, true, Some(90)).is_ok());
    }

    #[test]
    fn expiry_uses_max_age() {
        let now = Utc::now().naive_utc();
        let policy = PasswordPolicy::try_new(tenant(), 8, true, true, true, false, Some(30))
            .expect("valid policy");

        assert!(!policy.is_expired(now - Duration::days(30), now));
        assert!(policy.is_expired(now - Duration::days(31), now));
        assert!(!PasswordPolicy::default_for(tenant()).is_expired(now - Duration::days(3650), now));
    }
}
