//! DTOs for the module registry and the consolidation screen.

use serde::Serialize;

use crate::domain::consolidation::ConsolidationStep;
use crate::domain::module::{ModuleView, RegistrySummary};

pub struct ModulesPageData {
    pub modules: Vec<ModuleView>,
    pub summary: RegistrySummary,
    pub categories: Vec<String>,
    pub category: Option<String>,
}

/// Preview of the consolidation plan against the current registry.
pub struct ConsolidationPageData {
    pub steps: Vec<ConsolidationStep>,
    /// Structural problems of the plan itself; applying is refused while
    /// any are present.
    pub violations: Vec<String>,
}

/// Outcome of applying the consolidation plan.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidationReport {
    /// Targets that had to be created.
    pub created: usize,
    /// Source modules marked as merged.
    pub merged: usize,
    /// Targets whose progress was raised.
    pub raised: usize,
    /// Source names missing from the registry.
    pub missing: Vec<String>,
}

impl ConsolidationReport {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.merged == 0 && self.raised == 0
    }
}
