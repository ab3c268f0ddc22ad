//! Tenant settings and the password policy.

use chrono::Utc;

use crate::domain::custom_field::CustomFieldEntity;
use crate::domain::password_policy::PasswordPolicy;
use crate::domain::types::TenantId;
use crate::dto::api::{PasswordCheckRequest, PasswordCheckResponse};
use crate::dto::settings::SettingsPageData;
use crate::forms::settings::PasswordPolicyForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    CustomFieldReader, PasswordPolicyReader, PasswordPolicyWriter, TenantReader,
};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Stored policy of the tenant, or the default one with `true` when the
/// tenant never saved its own.
fn effective_policy<R>(repo: &R, tenant_id: TenantId) -> ServiceResult<(PasswordPolicy, bool)>
where
    R: PasswordPolicyReader + ?Sized,
{
    Ok(match repo.get_password_policy(tenant_id)? {
        Some(policy) => (policy, false),
        None => (PasswordPolicy::default_for(tenant_id), true),
    })
}

pub fn load_settings_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<SettingsPageData>
where
    R: PasswordPolicyReader + CustomFieldReader + TenantReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let tenant_id = user.tenant()?;
    let (policy, is_default_policy) = effective_policy(repo, tenant_id)?;

    Ok(SettingsPageData {
        policy,
        is_default_policy,
        talent_fields: repo.list_custom_fields(tenant_id, CustomFieldEntity::Talent)?,
        person_fields: repo.list_custom_fields(tenant_id, CustomFieldEntity::Person)?,
        modules: repo.list_tenant_modules(tenant_id)?,
    })
}

pub fn save_password_policy<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PasswordPolicyForm,
) -> ServiceResult<PasswordPolicy>
where
    R: PasswordPolicyWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let policy = form.into_policy(user.tenant()?)?;

    repo.save_password_policy(&policy).map_err(|err| {
        log::error!("Failed to save password policy: {err}");
        ServiceError::from(err)
    })
}

/// Checks a candidate password against the tenant policy and reports every
/// failed rule.
pub fn check_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request: PasswordCheckRequest,
) -> ServiceResult<PasswordCheckResponse>
where
    R: PasswordPolicyReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let (policy, _) = effective_policy(repo, user.tenant()?)?;
    let violations = policy.check(&request.password);
    let expired = request
        .changed_at
        .is_some_and(|changed_at| policy.is_expired(changed_at, Utc::now().naive_utc()));

    Ok(PasswordCheckResponse {
        valid: violations.is_empty() && !expired,
        messages: violations.iter().map(ToString::to_string).collect(),
        violations,
        expired,
    })
}
