//! Contact people and their company relationships.

use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::contact::RelationshipType;
use crate::dto::contacts::PeopleQuery;
use crate::forms::contacts::{AddRelationshipForm, PersonForm};
use crate::forms::custom_fields::CustomValuesForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, flash_failure, page_failure, redirect, render_template};
use crate::services::contacts as contacts_service;

#[get("/people")]
pub async fn show_people(
    params: web::Query<PeopleQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match contacts_service::load_people_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "people", &server_config.auth_service_url);
            context.insert("people", &data.people);
            context.insert("search_query", &data.search_query);
            render_template(&tera, "contacts/index.html", &context)
        }
        Err(err) => page_failure(err, "/"),
    }
}

#[post("/people/add")]
pub async fn add_person(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PersonForm>,
) -> impl Responder {
    match contacts_service::create_person(repo.get_ref(), &user, form) {
        Ok(person) => {
            FlashMessage::success("Контакт добавлен.").send();
            redirect(&format!("/people/{}", person.id))
        }
        Err(err) => flash_failure(err, "/people", "Не удалось добавить контакт."),
    }
}

#[get("/people/{person_id}")]
pub async fn show_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match contacts_service::load_person_page(repo.get_ref(), &user, person_id.into_inner()) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "people", &server_config.auth_service_url);
            context.insert("person", &data.person);
            context.insert("relationships", &data.relationships);
            context.insert("fields", &data.fields);
            context.insert("templates", &data.templates);
            context.insert("relationship_types", &RelationshipType::ALL);
            render_template(&tera, "contacts/person.html", &context)
        }
        Err(err) => page_failure(err, "/people"),
    }
}

#[post("/people/{person_id}/save")]
pub async fn save_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PersonForm>,
) -> impl Responder {
    let person_id = person_id.into_inner();
    let back = format!("/people/{person_id}");
    match contacts_service::update_person(repo.get_ref(), &user, person_id, form) {
        Ok(_) => {
            FlashMessage::success("Контакт обновлён.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось обновить контакт."),
    }
}

#[post("/people/{person_id}/delete")]
pub async fn delete_person(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let person_id = person_id.into_inner();
    match contacts_service::delete_person(repo.get_ref(), &user, person_id) {
        Ok(()) => {
            FlashMessage::success("Контакт удалён.").send();
            redirect("/people")
        }
        Err(err) => flash_failure(
            err,
            &format!("/people/{person_id}"),
            "Не удалось удалить контакт.",
        ),
    }
}

#[post("/people/{person_id}/relationships")]
pub async fn add_relationship(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddRelationshipForm>,
) -> impl Responder {
    let person_id = person_id.into_inner();
    let back = format!("/people/{person_id}");
    match contacts_service::add_relationship(repo.get_ref(), &user, person_id, form) {
        Ok(relationship) => {
            FlashMessage::success(format!(
                "Связь с «{}» добавлена.",
                relationship.company_name
            ))
            .send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось добавить связь."),
    }
}

#[post("/people/{person_id}/relationships/{relationship_id}/delete")]
pub async fn remove_relationship(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (person_id, relationship_id) = path.into_inner();
    let back = format!("/people/{person_id}");
    match contacts_service::remove_relationship(repo.get_ref(), &user, relationship_id) {
        Ok(()) => {
            FlashMessage::success("Связь удалена.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось удалить связь."),
    }
}

#[post("/people/{person_id}/fields")]
pub async fn save_person_fields(
    person_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let person_id = person_id.into_inner();
    let back = format!("/people/{person_id}");

    let form = match CustomValuesForm::from_body(&body) {
        Ok(form) => form,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&back);
        }
    };

    match contacts_service::save_person_custom_values(repo.get_ref(), &user, person_id, form) {
        Ok(_) => {
            FlashMessage::success("Дополнительные поля сохранены.").send();
            redirect(&back)
        }
        Err(err) => flash_failure(err, &back, "Не удалось сохранить поля."),
    }
}
