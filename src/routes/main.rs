//! Dashboard and the "no access" page.

use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_failure, render_template};
use crate::services::analytics as analytics_service;

#[get("/")]
pub async fn show_index(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match analytics_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context =
                base_context(&flash_messages, &user, "index", &server_config.auth_service_url);
            context.insert("dashboard", &data);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => page_failure(err, "/na"),
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, &user, "index", &server_config.auth_service_url);
    render_template(&tera, "main/not_assigned.html", &context)
}
