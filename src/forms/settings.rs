//! Forms for tenant settings.

use serde::Deserialize;

use crate::domain::password_policy::PasswordPolicy;
use crate::domain::types::TenantId;
use crate::forms::{FormError, checkbox, non_blank};

#[derive(Debug, Deserialize)]
pub struct PasswordPolicyForm {
    pub min_length: i32,
    #[serde(default)]
    pub require_uppercase: Option<String>,
    #[serde(default)]
    pub require_lowercase: Option<String>,
    #[serde(default)]
    pub require_digit: Option<String>,
    #[serde(default)]
    pub require_symbol: Option<String>,
    /// Blank disables expiry.
    #[serde(default)]
    pub max_age_days: Option<String>,
}

impl PasswordPolicyForm {
    pub fn into_policy(self, tenant_id: TenantId) -> Result<PasswordPolicy, FormError> {
        let max_age_days = non_blank(self.max_age_days)
            .map(|days| {
                days.parse::<i32>()
                    .map_err(|_| FormError::InvalidPolicy(format!("`{days}` is not a number")))
            })
            .transpose()?;

        PasswordPolicy::try_new(
            tenant_id,
            self.min_length,
            checkbox(&self.require_uppercase),
            checkbox(&self.require_lowercase),
            checkbox(&self.require_digit),
            checkbox(&self.require_symbol),
            max_age_days,
        )
        .map_err(|e| FormError::InvalidPolicy(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(min_length: i32, max_age_days: &str) -> PasswordPolicyForm {
        PasswordPolicyForm {
            min_length,
            require_uppercase: Some("on".to_string()),
            require_lowercase: None,
            require_digit: Some("on".to_string()),
            require_symbol: None,
            max_age_days: Some(max_age_days.to_string()),
        }
    }

    #[test]
    fn blank_expiry_disables_it() {
        let policy = form(10, "")
            .into_policy(TenantId::new(1).expect("valid tenant"))
            .expect("valid policy");

        assert_eq!(policy.min_length, 10);
        assert!(policy.require_uppercase);
        assert!(!policy.require_lowercase);
        assert_eq!(policy.max_age_days, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let tenant = TenantId::new(1).expect("valid tenant");
        assert!(form(3, "").into_policy(tenant).is_err());
        assert!(form(8, "soon").into_policy(tenant).is_err());
        assert!(form(8, "0").into_policy(tenant).is_err());
    }
}
