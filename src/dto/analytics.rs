//! DTOs for the analytics dashboard.

use serde::Serialize;

use crate::domain::contact::RelationshipType;
use crate::domain::module::RegistrySummary;
use crate::domain::talent::{Talent, TalentStatus};

/// Counters shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub talents_total: usize,
    /// Every status, zero-filled, in pipeline order.
    pub talents_by_status: Vec<(TalentStatus, usize)>,
    /// Talents in Screening, Interviewing or Offered.
    pub active_pipeline: usize,
    /// Placed / (Placed + Rejected), `None` while nobody left the pipeline.
    pub placement_rate: Option<f64>,
    pub people_total: usize,
    pub relationships_by_type: Vec<(RelationshipType, usize)>,
    pub registry: RegistrySummary,
    pub enabled_modules: usize,
    pub recent_talents: Vec<Talent>,
}
