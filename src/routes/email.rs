//! Global email templates and draft generation.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::email::{AddTemplateForm, EditTemplateForm, GenerateEmailForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::email as email_service;

#[get("/email-templates")]
pub async fn show_templates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match email_service::load_templates_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "email", &server_config.auth_service_url);
            context.insert("templates", &data.templates);
            context.insert("placeholders", &data.placeholders);
            render_template(&tera, "email/index.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/email-templates/add")]
pub async fn add_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddTemplateForm>,
) -> impl Responder {
    match email_service::create_template(repo.get_ref(), &user, form) {
        Ok(template) => {
            FlashMessage::success(format!("Шаблон «{}» создан.", template.name)).send();
            redirect(&format!("/email-templates/{}", template.id))
        }
        Err(err) => flash_failure(err, "/email-templates", "Не удалось создать шаблон."),
    }
}

#[get("/email-templates/{template_id}")]
pub async fn show_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match email_service::get_template(repo.get_ref(), &user, template_id.into_inner()) {
        Ok(template) => {
            let mut context =
                base_context(&flash_messages, &user, "email", &server_config.auth_service_url);
            context.insert("template", &template);
            context.insert("placeholders", &email_service::PLACEHOLDERS);
            render_template(&tera, "email/template.html", &context)
        }
        Err(err) => page_failure(err, "/email-templates"),
    }
}

#[post("/email-templates/{template_id}/save")]
pub async fn save_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditTemplateForm>,
) -> impl Responder {
    let template_id = template_id.into_inner();
    let back = format!("/email-templates/{template_id}");
    match email_service::update_template(repo.get_ref(), &user, template_id, form) {
        Ok(_) => {
            FlashMessage::success("Шаблон обновлён.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось обновить шаблон."),
    }
}

#[post("/email-templates/{template_id}/deactivate")]
pub async fn deactivate_template(
    template_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let template_id = template_id.into_inner();
    match email_service::deactivate_template(repo.get_ref(), &user, template_id) {
        Ok(_) => {
            FlashMessage::success("Шаблон отключен.").send();
            redirect("/email-templates")
        }
        Err(err) => flash_failure(
            err,
            &format!("/email-templates/{template_id}"),
            "Не удалось отключить шаблон.",
        ),
    }
}

#[post("/email/generate")]
/// Renders a draft for the talent or person the form was posted from.
pub async fn generate_email(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<GenerateEmailForm>,
) -> impl Responder {
    let back = match form.recipient_type.as_str() {
        "person" => format!("/people/{}", form.recipient_id),
        _ => format!("/talents/{}", form.recipient_id),
    };

    match email_service::generate_email(repo.get_ref(), &user, form) {
        Ok(draft) => {
            let mut context =
                base_context(&flash_messages, &user, "email", &server_config.auth_service_url);
            context.insert("draft", &draft);
            context.insert("back_url", &back);
            render_template(&tera, "email/draft.html", &context)
        }
        Err(err) => flash_failure(err, &back, "Не удалось подготовить письмо."),
    }
}
