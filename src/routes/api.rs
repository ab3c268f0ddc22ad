//! JSON endpoints under `/api/v1`.

use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::dto::api::{ModulesApiQuery, PasswordCheckRequest, TalentsApiQuery};
use crate::forms::email::GenerateEmailForm;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::{
    ServiceError, api as api_service, email as email_service, settings as settings_service,
};

/// Maps a service failure onto a JSON error response.
fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Forbidden().json(json!({"error": "forbidden"})),
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({"error": "not found"})),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({"error": message}))
        }
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(json!({"error": message})),
        err => {
            log::error!("API request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/talents")]
pub async fn api_v1_talents(
    params: web::Query<TalentsApiQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::list_talents(repo.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/v1/modules")]
pub async fn api_v1_modules(
    params: web::Query<ModulesApiQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::list_modules(repo.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[post("/v1/password/check")]
pub async fn api_v1_password_check(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(request): web::Json<PasswordCheckRequest>,
) -> impl Responder {
    match settings_service::check_password(repo.get_ref(), &user, request) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[post("/v1/email/generate")]
pub async fn api_v1_email_generate(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<GenerateEmailForm>,
) -> impl Responder {
    match email_service::generate_email(repo.get_ref(), &user, form) {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(err) => error_response(err),
    }
}
