//! Talent pages, CSV upload and custom values.

use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::talent::TalentStatus;
use crate::dto::talents::TalentsQuery;
use crate::forms::custom_fields::CustomValuesForm;
use crate::forms::talents::{AddTalentForm, EditTalentForm, TalentStatusForm, UploadTalentsForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::talents as talents_service;

#[get("/talents")]
pub async fn show_talents(
    params: web::Query<TalentsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match talents_service::load_talents_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "talents", &server_config.auth_service_url);
            context.insert("talents", &data.talents);
            context.insert("search_query", &data.search_query);
            context.insert("status", &data.status);
            context.insert("statuses", &TalentStatus::ALL);
            render_template(&tera, "talents/index.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/talents/add")]
pub async fn add_talent(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddTalentForm>,
) -> impl Responder {
    match talents_service::create_talent(repo.get_ref(), &user, form) {
        Ok(talent) => {
            FlashMessage::success("Кандидат добавлен.").send();
            redirect(&format!("/talents/{}", talent.id))
        }
        Err(err) => flash_failure(err, "/talents", "Не удалось добавить кандидата."),
    }
}

#[post("/talents/upload")]
pub async fn upload_talents(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadTalentsForm>,
) -> impl Responder {
    let file = match form.open() {
        Ok(file) => file,
        Err(err) => {
            log::error!("Failed to open uploaded CSV: {err}");
            FlashMessage::error(format!("Ошибка при чтении файла: {err}")).send();
            return redirect("/talents");
        }
    };

    match talents_service::import_talents(repo.get_ref(), &user, file) {
        Ok(summary) => {
            FlashMessage::success(format!(
                "Импортировано: {}, дубликатов: {}, отклонено строк: {}.",
                summary.created, summary.duplicates, summary.rejected
            ))
            .send();
            redirect("/talents")
        }
        Err(err) => flash_failure(err, "/talents", "Не удалось импортировать кандидатов."),
    }
}

#[get("/talents/{talent_id}")]
pub async fn show_talent(
    talent_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match talents_service::load_talent_page(repo.get_ref(), &user, talent_id.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "talents", &server_config.auth_service_url);
            context.insert("talent", &data.talent);
            context.insert("fields", &data.fields);
            context.insert("templates", &data.templates);
            context.insert("statuses", &TalentStatus::ALL);
            render_template(&tera, "talents/talent.html", &context)
        }
        Err(err) => page_failure(err, "/talents"),
    }
}

#[post("/talents/{talent_id}/save")]
pub async fn save_talent(
    talent_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<EditTalentForm>,
) -> impl Responder {
    let talent_id = talent_id.into_inner();
    let back = format!("/talents/{talent_id}");
    match talents_service::update_talent(repo.get_ref(), &user, talent_id, form) {
        Ok(_) => {
            FlashMessage::success("Кандидат обновлён.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось обновить кандидата."),
    }
}

#[post("/talents/{talent_id}/status")]
pub async fn change_talent_status(
    talent_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TalentStatusForm>,
) -> impl Responder {
    let talent_id = talent_id.into_inner();
    let back = format!("/talents/{talent_id}");
    match talents_service::change_talent_status(repo.get_ref(), &user, talent_id, form) {
        Ok(talent) => {
            FlashMessage::success(format!("Статус изменён: {}.", talent.status)).send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось изменить статус."),
    }
}

#[post("/talents/{talent_id}/delete")]
pub async fn delete_talent(
    talent_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let talent_id = talent_id.into_inner();
    match talents_service::delete_talent(repo.get_ref(), &user, talent_id) {
        Ok(()) => {
            FlashMessage::success("Кандидат удалён.").send();
            redirect("/talents")
        }
        Err(err) => flash_failure(
            err,
            &format!("/talents/{talent_id}"),
            "Не удалось удалить кандидата.",
        ),
    }
}

#[post("/talents/{talent_id}/fields")]
/// Custom values arrive as repeated `field_id`/`value` pairs.
pub async fn save_talent_fields(
    talent_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let talent_id = talent_id.into_inner();
    let back = format!("/talents/{talent_id}");

    let form = match CustomValuesForm::from_body(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match talents_service::save_talent_custom_values(repo.get_ref(), &user, talent_id, form) {
        Ok(_) => {
            FlashMessage::success("Дополнительные поля сохранены.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось сохранить поля."),
    }
}
