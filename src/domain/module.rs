//! Module registry entities and maturity classification.
//!
//! A module's maturity is never stored: it is derived from the completion
//! percentage through [`MATURITY_THRESHOLDS`].

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ModuleCategory, ModuleId, ModuleName, ProgressPercent, TypeConstraintError,
};

/// Maturity label assigned to a module from its progress.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModuleMaturity {
    Planned,
    Prototype,
    Alpha,
    Beta,
    Stable,
    Production,
}

/// Lower bound (inclusive) of each maturity label, highest first.
pub const MATURITY_THRESHOLDS: &[(u8, ModuleMaturity)] = &[
    (100, ModuleMaturity::Production),
    (80, ModuleMaturity::Stable),
    (60, ModuleMaturity::Beta),
    (40, ModuleMaturity::Alpha),
    (20, ModuleMaturity::Prototype),
    (0, ModuleMaturity::Planned),
];

impl ModuleMaturity {
    /// Every label in ascending order of maturity.
    pub const ALL: [ModuleMaturity; 6] = [
        ModuleMaturity::Planned,
        ModuleMaturity::Prototype,
        ModuleMaturity::Alpha,
        ModuleMaturity::Beta,
        ModuleMaturity::Stable,
        ModuleMaturity::Production,
    ];

    /// Classifies a completion percentage.
    pub fn from_progress(progress: ProgressPercent) -> Self {
        MATURITY_THRESHOLDS
            .iter()
            .find(|(min, _)| progress.get() >= *min)
            .map(|(_, maturity)| *maturity)
            .unwrap_or(ModuleMaturity::Planned)
    }

    /// Minimum progress required to reach this label.
    pub fn min_progress(self) -> u8 {
        MATURITY_THRESHOLDS
            .iter()
            .find(|(_, maturity)| *maturity == self)
            .map(|(min, _)| *min)
            .unwrap_or(0)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleMaturity::Planned => "planned",
            ModuleMaturity::Prototype => "prototype",
            ModuleMaturity::Alpha => "alpha",
            ModuleMaturity::Beta => "beta",
            ModuleMaturity::Stable => "stable",
            ModuleMaturity::Production => "production",
        }
    }
}

impl Display for ModuleMaturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleMaturity {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleMaturity::ALL
            .into_iter()
            .find(|maturity| maturity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// Scores a checklist as the rounded-down share of completed items.
pub fn score_progress(completed: usize, total: usize) -> ProgressPercent {
    if total == 0 {
        return ProgressPercent::default();
    }
    let percent = (completed.min(total) as u128 * 100) / total as u128;
    i32::try_from(percent)
        .ok()
        .and_then(|p| ProgressPercent::new(p).ok())
        .unwrap_or(ProgressPercent::MAX)
}

/// Next maturity label above `progress` and the points still missing.
pub fn next_maturity(progress: ProgressPercent) -> Option<(ModuleMaturity, u8)> {
    let current = ModuleMaturity::from_progress(progress);
    MATURITY_THRESHOLDS
        .iter()
        .rev()
        .find(|(_, maturity)| *maturity > current)
        .map(|(min, maturity)| (*maturity, min - progress.get()))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SystemModule {
    pub id: ModuleId,
    pub name: ModuleName,
    pub category: ModuleCategory,
    pub description: Option<String>,
    pub progress: ProgressPercent,
    pub is_active: bool,
    /// Set once the module has been merged into another one.
    pub consolidated_into: Option<ModuleId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SystemModule {
    pub fn maturity(&self) -> ModuleMaturity {
        ModuleMaturity::from_progress(self.progress)
    }

    pub fn is_consolidated(&self) -> bool {
        self.consolidated_into.is_some()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSystemModule {
    pub name: ModuleName,
    pub category: ModuleCategory,
    pub description: Option<String>,
    pub progress: ProgressPercent,
}

impl NewSystemModule {
    #[must_use]
    pub fn new(
        name: ModuleName,
        category: ModuleCategory,
        description: Option<String>,
        progress: ProgressPercent,
    ) -> Self {
        Self {
            name,
            category,
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            progress,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateSystemModule {
    pub category: ModuleCategory,
    pub description: Option<String>,
    pub progress: ProgressPercent,
    pub is_active: bool,
}

/// Module plus its derived maturity, shaped for templates and the API.
#[derive(Clone, Debug, Serialize)]
pub struct ModuleView {
    #[serde(flatten)]
    pub module: SystemModule,
    pub maturity: ModuleMaturity,
    pub next_maturity: Option<ModuleMaturity>,
    pub points_to_next: Option<u8>,
}

impl From<SystemModule> for ModuleView {
    fn from(module: SystemModule) -> Self {
        let maturity = module.maturity();
        let next = next_maturity(module.progress);
        Self {
            module,
            maturity,
            next_maturity: next.map(|(maturity, _)| maturity),
            points_to_next: next.map(|(_, points)| points),
        }
    }
}

/// Aggregate statistics over the module registry.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RegistrySummary {
    pub total: usize,
    pub active: usize,
    pub consolidated: usize,
    /// Mean progress of active modules, `0.0` when there are none.
    pub average_progress: f64,
    /// Count per maturity label, every label present in ascending order.
    pub by_maturity: Vec<(ModuleMaturity, usize)>,
}

impl RegistrySummary {
    pub fn from_modules(modules: &[SystemModule]) -> Self {
        let active: Vec<&SystemModule> = modules.iter().filter(|m| m.is_active).collect();
        let consolidated = modules.iter().filter(|m| m.is_consolidated()).count();

        let average_progress = if active.is_empty() {
            0.0
        } else {
            let sum: u32 = active.iter().map(|m| u32::from(m.progress.get())).sum();
            f64::from(sum) / active.len() as f64
        };

        let by_maturity = ModuleMaturity::ALL
            .into_iter()
            .map(|maturity| {
                let count = modules.iter().filter(|m| m.maturity() == maturity).count();
                (maturity, count)
            })
            .collect();

        Self {
            total: modules.len(),
            active: active.len(),
            consolidated,
            average_progress,
            by_maturity,
        }
    }
}
