//! Module registry pages and the consolidation screen.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::forms::modules::{AddModuleForm, EditModuleForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::modules as modules_service;

#[derive(Deserialize)]
struct ModulesQueryParams {
    category: Option<String>,
}

#[get("/modules")]
pub async fn show_modules(
    params: web::Query<ModulesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let category = params.into_inner().category;
    match modules_service::load_modules_page(repo.get_ref(), &user, category) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "modules", &server_config.auth_service_url);
            context.insert("modules", &data.modules);
            context.insert("summary", &data.summary);
            context.insert("categories", &data.categories);
            context.insert("category", &data.category);
            render_template(&tera, "modules/index.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/modules/add")]
pub async fn add_module(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddModuleForm>,
) -> impl Responder {
    match modules_service::create_module(repo.get_ref(), &user, form) {
        Ok(module) => {
            FlashMessage::success(format!("Модуль «{}» добавлен.", module.name)).send();
            redirect("/modules")
        }
        Err(err) => flash_failure(err, "/modules", "Не удалось добавить модуль."),
    }
}

#[get("/modules/{module_id}")]
pub async fn show_module(
    module_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match modules_service::load_module(repo.get_ref(), &user, module_id.into_inner()) {
        Ok(module) => {
            let mut context =
                base_context(&flash_messages, &user, "modules", &server_config.auth_service_url);
            context.insert("module", &module);
            render_template(&tera, "modules/module.html", &context)
        }
        Err(err) => page_failure(err, "/modules"),
    }
}

#[post("/modules/{module_id}/save")]
pub async fn save_module(
    module_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditModuleForm>,
) -> impl Responder {
    let module_id = module_id.into_inner();
    let back = format!("/modules/{module_id}");
    match modules_service::update_module(repo.get_ref(), &user, module_id, form) {
        Ok(_) => {
            FlashMessage::success("Модуль обновлён.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось обновить модуль."),
    }
}

#[get("/consolidation")]
pub async fn show_consolidation(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match modules_service::preview_consolidation(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "consolidation",
                &server_config.auth_service_url,
            );
            context.insert("steps", &data.steps);
            context.insert("violations", &data.violations);
            render_template(&tera, "modules/consolidation.html", &context)
        }
        Err(err) => page_failure(err, "/modules"),
    }
}

#[post("/consolidation/apply")]
pub async fn apply_consolidation(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match modules_service::apply_consolidation(repo.get_ref(), &user) {
        Ok(report) if report.is_empty() => {
            FlashMessage::info("Реестр уже соответствует плану.").send();
            redirect("/consolidation")
        }
        Ok(report) => {
            FlashMessage::success(format!(
                "Создано модулей: {}, объединено: {}, обновлён прогресс: {}.",
                report.created, report.merged, report.raised
            ))
            .send();
            redirect("/consolidation")
        }
        Err(err) => flash_failure(err, "/consolidation", "Не удалось применить план."),
    }
}
