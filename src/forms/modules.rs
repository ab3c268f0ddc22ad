//! Forms for the module registry.

use serde::Deserialize;
use validator::Validate;

use crate::domain::module::{NewSystemModule, UpdateSystemModule, score_progress};
use crate::domain::types::{ModuleCategory, ModuleName, ProgressPercent};
use crate::forms::{FormError, checkbox, non_blank};

#[derive(Debug, Deserialize, Validate)]
pub struct AddModuleForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub progress: i32,
}

impl TryFrom<AddModuleForm> for NewSystemModule {
    type Error = FormError;

    fn try_from(form: AddModuleForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewSystemModule::new(
            ModuleName::new(form.name).map_err(|_| FormError::InvalidName)?,
            ModuleCategory::new(form.category).map_err(|_| FormError::InvalidName)?,
            non_blank(form.description).map(|d| ammonia::clean(&d)),
            ProgressPercent::new(form.progress).map_err(|_| FormError::InvalidProgress)?,
        ))
    }
}

/// Edits a module. When a checklist is submitted its score replaces
/// `progress`.
#[derive(Debug, Deserialize, Validate)]
pub struct EditModuleForm {
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub progress: Option<i32>,
    #[serde(default)]
    pub checklist_completed: Option<usize>,
    #[serde(default)]
    pub checklist_total: Option<usize>,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl TryFrom<EditModuleForm> for UpdateSystemModule {
    type Error = FormError;

    fn try_from(form: EditModuleForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let progress = match (form.checklist_completed, form.checklist_total) {
            (Some(completed), Some(total)) if completed <= total => {
                score_progress(completed, total)
            }
            (Some(_), Some(_)) => return Err(FormError::InvalidProgress),
            _ => ProgressPercent::new(form.progress.ok_or(FormError::InvalidProgress)?)
                .map_err(|_| FormError::InvalidProgress)?,
        };

        Ok(UpdateSystemModule {
            category: ModuleCategory::new(form.category).map_err(|_| FormError::InvalidName)?,
            description: non_blank(form.description).map(|d| ammonia::clean(&d)),
            progress,
            is_active: checkbox(&form.is_active),
        })
    }
}
