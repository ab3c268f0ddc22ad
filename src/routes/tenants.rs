//! Tenant management for platform operators.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::tenants::TenantsQuery;
use crate::forms::tenants::{AddTenantForm, EditTenantForm, ToggleModuleForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::tenants as tenants_service;

#[get("/tenants")]
pub async fn show_tenants(
    params: web::Query<TenantsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match tenants_service::load_tenants_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "tenants", &server_config.auth_service_url);
            context.insert("tenants", &data.tenants);
            render_template(&tera, "tenants/index.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/tenants/add")]
pub async fn add_tenant(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddTenantForm>,
) -> impl Responder {
    match tenants_service::create_tenant(repo.get_ref(), &user, form) {
        Ok(tenant) => {
            FlashMessage::success(format!("Организация «{}» создана.", tenant.name)).send();
            redirect(&format!("/tenants/{}", tenant.id))
        }
        Err(err) => flash_failure(err, "/tenants", "Не удалось создать организацию."),
    }
}

#[get("/tenants/{tenant_id}")]
pub async fn show_tenant(
    tenant_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match tenants_service::load_tenant_page(repo.get_ref(), &user, tenant_id.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "tenants", &server_config.auth_service_url);
            context.insert("tenant", &data.tenant);
            context.insert("modules", &data.modules);
            render_template(&tera, "tenants/tenant.html", &context)
        }
        Err(err) => page_failure(err, "/tenants"),
    }
}

#[post("/tenants/{tenant_id}/save")]
pub async fn save_tenant(
    tenant_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditTenantForm>,
) -> impl Responder {
    let tenant_id = tenant_id.into_inner();
    let back = format!("/tenants/{tenant_id}");
    match tenants_service::update_tenant(repo.get_ref(), &user, tenant_id, form) {
        Ok(_) => {
            FlashMessage::success("Организация обновлена.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось обновить организацию."),
    }
}

#[post("/tenants/{tenant_id}/modules")]
pub async fn toggle_tenant_module(
    tenant_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ToggleModuleForm>,
) -> impl Responder {
    let tenant_id = tenant_id.into_inner();
    let back = format!("/tenants/{tenant_id}");
    match tenants_service::toggle_tenant_module(repo.get_ref(), &user, tenant_id, form) {
        Ok(()) => {
            FlashMessage::success("Набор модулей обновлён.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось изменить модуль."),
    }
}
