//! Static module consolidation plan and the seed registry it applies to.
//!
//! The plan lists which registered modules are merged into a single target
//! module. [`plan_consolidation`] compares the plan with the current registry
//! and yields the concrete steps; applying them is left to the service layer.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::module::SystemModule;
use crate::domain::types::{ModuleId, ProgressPercent};

/// One merge group of the consolidation plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsolidationGroup {
    pub target: &'static str,
    pub category: &'static str,
    pub sources: &'static [&'static str],
    pub rationale: &'static str,
}

pub const CONSOLIDATION_PLAN: &[ConsolidationGroup] = &[
    ConsolidationGroup {
        target: "talent-management",
        category: "recruiting",
        sources: &["talent-pool", "talent-search", "smart-talent-matching"],
        rationale: "Talent records, search and matching operate on the same rows.",
    },
    ConsolidationGroup {
        target: "contact-management",
        category: "crm",
        sources: &["people", "company-relationships"],
        rationale: "Contacts and their company links are edited on one screen.",
    },
    ConsolidationGroup {
        target: "email-assistant",
        category: "communication",
        sources: &["email-templates", "email-generation"],
        rationale: "Generation is only ever driven by the global templates.",
    },
    ConsolidationGroup {
        target: "analytics",
        category: "analytics",
        sources: &[
            "dashboard-metrics",
            "pattern-recognition",
            "behavioral-insights",
        ],
        rationale: "All dashboards read the same aggregate counts.",
    },
    ConsolidationGroup {
        target: "tenant-settings",
        category: "administration",
        sources: &["password-policy", "custom-fields-admin"],
        rationale: "Per-tenant configuration belongs to a single settings area.",
    },
];

/// Seed entry for the module registry: name, category, initial progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleSeed {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub progress: u8,
}

pub const MODULE_SEEDS: &[ModuleSeed] = &[
    ModuleSeed {
        name: "tenants",
        category: "administration",
        description: "Tenant organizations and their enabled modules.",
        progress: 100,
    },
    ModuleSeed {
        name: "talent-pool",
        category: "recruiting",
        description: "Talent records and CSV import.",
        progress: 85,
    },
    ModuleSeed {
        name: "talent-search",
        category: "recruiting",
        description: "Free-text talent search.",
        progress: 70,
    },
    ModuleSeed {
        name: "smart-talent-matching",
        category: "recruiting",
        description: "Ranking talents against open roles.",
        progress: 15,
    },
    ModuleSeed {
        name: "people",
        category: "crm",
        description: "Contact people.",
        progress: 80,
    },
    ModuleSeed {
        name: "company-relationships",
        category: "crm",
        description: "Links between contacts and companies.",
        progress: 55,
    },
    ModuleSeed {
        name: "email-templates",
        category: "communication",
        description: "Global email templates.",
        progress: 90,
    },
    ModuleSeed {
        name: "email-generation",
        category: "communication",
        description: "Drafting emails from templates.",
        progress: 45,
    },
    ModuleSeed {
        name: "dashboard-metrics",
        category: "analytics",
        description: "Counts shown on the dashboard.",
        progress: 65,
    },
    ModuleSeed {
        name: "pattern-recognition",
        category: "analytics",
        description: "Pattern detection over pipeline history.",
        progress: 10,
    },
    ModuleSeed {
        name: "behavioral-insights",
        category: "analytics",
        description: "Behavioural scoring of contacts.",
        progress: 5,
    },
    ModuleSeed {
        name: "password-policy",
        category: "administration",
        description: "Per-tenant password rules.",
        progress: 95,
    },
    ModuleSeed {
        name: "custom-fields-admin",
        category: "administration",
        description: "Tenant-defined extra attributes.",
        progress: 75,
    },
];

/// Structural problems detected in a consolidation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanViolation {
    EmptyGroup(&'static str),
    TargetIsSource(&'static str),
    SourceInSeveralGroups(&'static str),
    DuplicateTarget(&'static str),
}

/// Checks the structural invariants of a plan, returning every violation.
pub fn validate_plan(plan: &[ConsolidationGroup]) -> Vec<PlanViolation> {
    let mut violations = Vec::new();
    let targets: HashSet<&str> = plan.iter().map(|g| g.target).collect();
    let mut seen_targets = HashSet::new();
    let mut seen_sources = HashSet::new();

    for group in plan {
        if group.sources.is_empty() {
            violations.push(PlanViolation::EmptyGroup(group.target));
        }
        if !seen_targets.insert(group.target) {
            violations.push(PlanViolation::DuplicateTarget(group.target));
        }
        for source in group.sources {
            if targets.contains(source) {
                violations.push(PlanViolation::TargetIsSource(*source));
            }
            if !seen_sources.insert(*source) {
                violations.push(PlanViolation::SourceInSeveralGroups(*source));
            }
        }
    }

    violations
}

/// Concrete work required to bring one group in line with the registry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConsolidationStep {
    pub target: &'static str,
    pub category: &'static str,
    /// Existing target module, `None` when it must be created.
    pub target_id: Option<ModuleId>,
    /// Current progress of the existing target.
    pub target_progress: Option<ProgressPercent>,
    /// Source modules that still have to be merged.
    pub merge: Vec<ModuleId>,
    /// Source names already merged into the target.
    pub already_merged: Vec<&'static str>,
    /// Source names absent from the registry.
    pub missing: Vec<&'static str>,
    /// Progress the target ends up with.
    pub resulting_progress: ProgressPercent,
}

impl ConsolidationStep {
    /// Whether applying the step would leave the registry untouched.
    pub fn is_noop(&self) -> bool {
        self.target_id.is_some()
            && self.merge.is_empty()
            && self.target_progress == Some(self.resulting_progress)
    }
}

/// Compares `plan` with the registry and returns one step per group.
pub fn plan_consolidation(
    plan: &[ConsolidationGroup],
    modules: &[SystemModule],
) -> Vec<ConsolidationStep> {
    let by_name: HashMap<&str, &SystemModule> =
        modules.iter().map(|m| (m.name.as_str(), m)).collect();

    plan.iter()
        .map(|group| {
            let target = by_name.get(group.target).copied();
            let mut merge = Vec::new();
            let mut already_merged = Vec::new();
            let mut missing = Vec::new();
            let mut resulting_progress = target.map(|t| t.progress).unwrap_or_default();

            for source_name in group.sources {
                match by_name.get(source_name) {
                    None => missing.push(*source_name),
                    Some(source) => {
                        let merged_into_target = matches!(
                            (source.consolidated_into, target),
                            (Some(into), Some(t)) if into == t.id
                        );
                        if merged_into_target {
                            already_merged.push(*source_name);
                        } else if source.consolidated_into.is_none() {
                            merge.push(source.id);
                            resulting_progress = resulting_progress.max(source.progress);
                        } else {
                            // Merged elsewhere by hand; leave it where it is.
                            already_merged.push(*source_name);
                        }
                    }
                }
            }

            ConsolidationStep {
                target: group.target,
                category: group.category,
                target_id: target.map(|t| t.id),
                target_progress: target.map(|t| t.progress),
                merge,
                already_merged,
                missing,
                resulting_progress,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::module::tests::build_module;

    #[test]
    fn shipped_plan_is_valid() {
        assert!(validate_plan(CONSOLIDATION_PLAN).is_empty());
    }

    #[test]
    fn shipped_plan_only_references_seeded_sources() {
        let seeded: HashSet<&str> = MODULE_SEEDS.iter().map(|s| s.name).collect();
        for group in CONSOLIDATION_PLAN {
            for source in group.sources {
                assert!(seeded.contains(source), "{source} is not seeded");
            }
        }
    }

    #[test]
    fn validation_reports_structural_problems() {
        const BROKEN: &[ConsolidationGroup] = &[
            ConsolidationGroup {
                target: "a",
                category: "core",
                sources: &["b", "c"],
                rationale: "",
            },
            ConsolidationGroup {
                target: "b",
                category: "core",
                sources: &["c"],
                rationale: "",
            },
            ConsolidationGroup {
                target: "d",
                category: "core",
                sources: &[],
                rationale: "",
            },
        ];

        let violations = validate_plan(BROKEN);

        assert!(violations.contains(&PlanViolation::TargetIsSource("b")));
        assert!(violations.contains(&PlanViolation::SourceInSeveralGroups("c")));
        assert!(violations.contains(&PlanViolation::EmptyGroup("d")));
    }

    #[test]
    fn planning_creates_missing_target_and_merges_sources() {
        const PLAN: &[ConsolidationGroup] = &[ConsolidationGroup {
            target: "contact-management",
            category: "crm",
            sources: &["people", "company-relationships", "legacy-crm"],
            rationale: "",
        }];
        let modules = vec![
            build_module(1, "people", 80),
            build_module(2, "company-relationships", 55),
        ];

        let steps = plan_consolidation(PLAN, &modules);

        assert_eq!(steps.len(), 1);
        let step = &steps[0];
        assert_eq!(step.target_id, None);
        assert_eq!(step.merge.len(), 2);
        assert_eq!(step.missing, vec!["legacy-crm"]);
        assert_eq!(step.resulting_progress.get(), 80);
        assert!(!step.is_noop());
    }

    #[test]
    fn planning_after_merge_is_a_noop() {
        const PLAN: &[ConsolidationGroup] = &[ConsolidationGroup {
            target: "contact-management",
            category: "crm",
            sources: &["people"],
            rationale: "",
        }];
        let target = build_module(10, "contact-management", 80);
        let mut people = build_module(1, "people", 80);
        people.consolidated_into = Some(target.id);
        people.is_active = false;

        let steps = plan_consolidation(PLAN, &[target, people]);

        assert_eq!(steps[0].already_merged, vec!["people"]);
        assert!(steps[0].merge.is_empty());
        assert!(steps[0].is_noop());
    }

    #[test]
    fn existing_target_keeps_higher_progress() {
        const PLAN: &[ConsolidationGroup] = &[ConsolidationGroup {
            target: "analytics",
            category: "analytics",
            sources: &["dashboard-metrics"],
            rationale: "",
        }];
        let modules = vec![
            build_module(1, "analytics", 90),
            build_module(2, "dashboard-metrics", 65),
        ];

        let steps = plan_consolidation(PLAN, &modules);

        assert_eq!(steps[0].target_id.map(ModuleId::get), Some(1));
        assert_eq!(steps[0].resulting_progress.get(), 90);
    }
}
