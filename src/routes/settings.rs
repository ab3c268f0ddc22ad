//! Tenant settings page and the password policy form.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::settings::PasswordPolicyForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::settings as settings_service;

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match settings_service::load_settings_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "settings", &server_config.auth_service_url);
            context.insert("policy", &data.policy);
            context.insert("is_default_policy", &data.is_default_policy);
            context.insert("talent_fields", &data.talent_fields);
            context.insert("person_fields", &data.person_fields);
            context.insert("modules", &data.modules);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/settings/password-policy")]
pub async fn save_password_policy(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PasswordPolicyForm>,
) -> impl Responder {
    match settings_service::save_password_policy(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Политика паролей сохранена.").send();
            redirect("/settings")
        }
        Err(err) => flash_failure(err, "/settings", "Не удалось сохранить политику паролей."),
    }
}
