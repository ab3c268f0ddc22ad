//! Services for the module registry and the consolidation plan.

use std::collections::BTreeSet;

use crate::domain::consolidation::{
    CONSOLIDATION_PLAN, ConsolidationGroup, MODULE_SEEDS, ModuleSeed, plan_consolidation,
    validate_plan,
};
use crate::domain::module::{
    ModuleView, NewSystemModule, RegistrySummary, SystemModule, UpdateSystemModule,
};
use crate::domain::types::{ModuleCategory, ModuleId, ModuleName, ProgressPercent};
use crate::dto::modules::{ConsolidationPageData, ConsolidationReport, ModulesPageData};
use crate::forms::modules::{AddModuleForm, EditModuleForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{ModuleListQuery, ModuleReader, ModuleWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_PLATFORM_ROLE};

/// Loads the registry, optionally narrowed to one category. The summary and
/// category list always cover the whole registry.
pub fn load_modules_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category: Option<String>,
) -> ServiceResult<ModulesPageData>
where
    R: ModuleReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let all = repo.list_modules(ModuleListQuery::default()).map_err(|err| {
        log::error!("Failed to list modules: {err}");
        err
    })?;

    let summary = RegistrySummary::from_modules(&all);
    let categories: Vec<String> = all
        .iter()
        .map(|m| m.category.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let modules = all
        .into_iter()
        .filter(|m| category.as_deref().is_none_or(|c| m.category.as_str() == c))
        .map(ModuleView::from)
        .collect();

    Ok(ModulesPageData {
        modules,
        summary,
        categories,
        category,
    })
}

pub fn load_module<R>(
    repo: &R,
    user: &AuthenticatedUser,
    module_id: i32,
) -> ServiceResult<ModuleView>
where
    R: ModuleReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let module = repo
        .get_module_by_id(ModuleId::new(module_id)?)?
        .ok_or(ServiceError::NotFound)?;

    Ok(ModuleView::from(module))
}

pub fn create_module<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddModuleForm,
) -> ServiceResult<SystemModule>
where
    R: ModuleReader + ModuleWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let new_module = NewSystemModule::try_from(form)?;
    if repo.get_module_by_name(&new_module.name)?.is_some() {
        return Err(ServiceError::Form(format!(
            "Модуль «{}» уже зарегистрирован.",
            new_module.name
        )));
    }

    repo.create_module(&new_module).map_err(|err| {
        log::error!("Failed to create module: {err}");
        ServiceError::from(err)
    })
}

pub fn update_module<R>(
    repo: &R,
    user: &AuthenticatedUser,
    module_id: i32,
    form: EditModuleForm,
) -> ServiceResult<SystemModule>
where
    R: ModuleWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let updates = UpdateSystemModule::try_from(form)?;

    repo.update_module(ModuleId::new(module_id)?, &updates)
        .map_err(|err| {
            log::error!("Failed to update module: {err}");
            ServiceError::from(err)
        })
}

fn seed_to_new_module(seed: &ModuleSeed) -> ServiceResult<NewSystemModule> {
    Ok(NewSystemModule::new(
        ModuleName::new(seed.name)?,
        ModuleCategory::new(seed.category)?,
        Some(seed.description.to_string()),
        ProgressPercent::new(i32::from(seed.progress))?,
    ))
}

/// Inserts the seed modules that are not registered yet.
pub fn seed_registry<R>(repo: &R, seeds: &[ModuleSeed]) -> ServiceResult<usize>
where
    R: ModuleWriter + ?Sized,
{
    let modules = seeds
        .iter()
        .map(seed_to_new_module)
        .collect::<ServiceResult<Vec<_>>>()?;

    let inserted = repo.seed_modules(&modules).map_err(|err| {
        log::error!("Failed to seed modules: {err}");
        err
    })?;
    log::info!(
        "Seeded {inserted} of {} modules, {} already registered",
        modules.len(),
        modules.len() - inserted
    );

    Ok(inserted)
}

/// Seeds the registry from the built-in seed table.
pub fn seed_default_registry<R>(repo: &R) -> ServiceResult<usize>
where
    R: ModuleWriter + ?Sized,
{
    seed_registry(repo, MODULE_SEEDS)
}

/// Shows what applying the built-in plan would change.
pub fn preview_consolidation<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<ConsolidationPageData>
where
    R: ModuleReader + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    let modules = repo.list_modules(ModuleListQuery::default())?;

    Ok(ConsolidationPageData {
        steps: plan_consolidation(CONSOLIDATION_PLAN, &modules),
        violations: validate_plan(CONSOLIDATION_PLAN)
            .into_iter()
            .map(|v| format!("{v:?}"))
            .collect(),
    })
}

/// Applies the built-in plan on behalf of a platform operator.
pub fn apply_consolidation<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<ConsolidationReport>
where
    R: ModuleReader + ModuleWriter + ?Sized,
{
    ensure_role(user, SERVICE_PLATFORM_ROLE)?;

    apply_consolidation_plan(repo, CONSOLIDATION_PLAN)
}

/// Brings the registry in line with `plan`.
///
/// Missing targets are created with the group's category and rationale,
/// unmerged sources are marked as consolidated into their target and the
/// target progress is raised to the highest merged progress. Running it a
/// second time reports no changes.
pub fn apply_consolidation_plan<R>(
    repo: &R,
    plan: &[ConsolidationGroup],
) -> ServiceResult<ConsolidationReport>
where
    R: ModuleReader + ModuleWriter + ?Sized,
{
    let violations = validate_plan(plan);
    if !violations.is_empty() {
        log::error!("Refusing to apply an invalid consolidation plan: {violations:?}");
        return Err(ServiceError::Form(
            "План объединения модулей содержит ошибки.".to_string(),
        ));
    }

    let modules = repo.list_modules(ModuleListQuery::default())?;
    let steps = plan_consolidation(plan, &modules);
    let mut report = ConsolidationReport::default();

    for (step, group) in steps.into_iter().zip(plan) {
        report
            .missing
            .extend(step.missing.iter().map(|name| name.to_string()));
        for name in &step.missing {
            log::warn!("Module `{name}` is not registered, skipping");
        }

        if step.is_noop() {
            continue;
        }

        let target_id = match step.target_id {
            Some(id) => id,
            None => {
                let new_module = NewSystemModule::new(
                    ModuleName::new(step.target)?,
                    ModuleCategory::new(step.category)?,
                    Some(group.rationale.to_string()),
                    step.resulting_progress,
                );
                let created = repo.create_module(&new_module).map_err(|err| {
                    log::error!("Failed to create module `{}`: {err}", step.target);
                    err
                })?;
                log::info!("Created consolidation target `{}`", step.target);
                report.created += 1;
                created.id
            }
        };

        let merged = repo
            .consolidate_modules(target_id, &step.merge, step.resulting_progress)
            .map_err(|err| {
                log::error!("Failed to consolidate into `{}`: {err}", step.target);
                err
            })?;
        report.merged += merged;
        if step
            .target_progress
            .is_some_and(|current| current < step.resulting_progress)
        {
            report.raised += 1;
        }
        log::info!(
            "Merged {merged} modules into `{}` at {}",
            step.target,
            step.resulting_progress
        );
    }

    Ok(report)
}
