//! Custom field definitions for talents and people.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::custom_field::CustomFieldType;
use crate::forms::custom_fields::AddCustomFieldForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::custom_fields as custom_fields_service;

#[get("/custom-fields")]
pub async fn show_custom_fields(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match custom_fields_service::load_custom_fields(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "custom_fields",
                &server_config.auth_service_url,
            );
            context.insert("talent_fields", &data.talent_fields);
            context.insert("person_fields", &data.person_fields);
            context.insert("field_types", &CustomFieldType::ALL);
            render_template(&tera, "settings/custom_fields.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/custom-fields/add")]
pub async fn add_custom_field(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCustomFieldForm>,
) -> impl Responder {
    match custom_fields_service::create_custom_field(repo.get_ref(), &user, form) {
        Ok(field) => {
            FlashMessage::success(format!("Поле «{}» добавлено.", field.name)).send();
            redirect("/custom-fields")
        }
        Err(err) => flash_failure(err, "/custom-fields", "Не удалось добавить поле."),
    }
}

#[post("/custom-fields/{field_id}/delete")]
pub async fn delete_custom_field(
    field_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match custom_fields_service::delete_custom_field(repo.get_ref(), &user, field_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Поле удалено.").send();
            redirect("/custom-fields")
        }
        Err(err) => flash_failure(err, "/custom-fields", "Не удалось удалить поле."),
    }
}
