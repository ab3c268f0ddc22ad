//! Dashboard counters for the signed-in tenant.

use std::collections::HashMap;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::contact::RelationshipType;
use crate::domain::module::RegistrySummary;
use crate::domain::talent::TalentStatus;
use crate::dto::analytics::DashboardData;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{
    ModuleListQuery, ModuleReader, PersonListQuery, PersonReader, TalentReader, TenantReader,
};
use crate::services::{ServiceResult, ensure_role};

const RECENT_TALENTS: usize = 5;

/// Placed / (placed + rejected); `None` while both are zero.
pub fn placement_rate(placed: usize, rejected: usize) -> Option<f64> {
    let closed = placed + rejected;
    if closed == 0 {
        None
    } else {
        Some(placed as f64 / closed as f64)
    }
}

fn zero_filled<K, const N: usize>(all: [K; N], counts: Vec<(K, usize)>) -> Vec<(K, usize)>
where
    K: Copy + Eq + std::hash::Hash,
{
    let counts: HashMap<K, usize> = counts.into_iter().collect();
    all.into_iter()
        .map(|key| (key, counts.get(&key).copied().unwrap_or(0)))
        .collect()
}

pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: TalentReader + PersonReader + ModuleReader + TenantReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let tenant_id = user.tenant()?;

    let talents_by_status = zero_filled(
        TalentStatus::ALL,
        repo.count_talents_by_status(tenant_id).map_err(|err| {
            log::error!("Failed to count talents: {err}");
            err
        })?,
    );
    let count_of = |status: TalentStatus| {
        talents_by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    };
    let talents_total = talents_by_status.iter().map(|(_, n)| n).sum();
    let active_pipeline = talents_by_status
        .iter()
        .filter(|(status, _)| status.is_in_pipeline())
        .map(|(_, n)| n)
        .sum();
    let placement_rate = placement_rate(
        count_of(TalentStatus::Placed),
        count_of(TalentStatus::Rejected),
    );

    let (people_total, _) = repo.list_people(PersonListQuery::new(tenant_id).paginate(1, 1))?;
    let relationships_by_type = zero_filled(
        RelationshipType::ALL,
        repo.count_relationships_by_type(tenant_id)?,
    );

    let modules = repo.list_modules(ModuleListQuery::default())?;
    let enabled_modules = repo.list_tenant_modules(tenant_id)?.len();
    let recent_talents = repo.list_recent_talents(tenant_id, RECENT_TALENTS)?;

    Ok(DashboardData {
        talents_total,
        talents_by_status,
        active_pipeline,
        placement_rate,
        people_total,
        relationships_by_type,
        registry: RegistrySummary::from_modules(&modules),
        enabled_modules,
        recent_talents,
    })
}
