//! Handshake with the external auth service.

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use serde::Deserialize;

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::redirect;

#[derive(Deserialize)]
struct TokenForm {
    token: String,
}

#[get("/auth/signin")]
pub async fn signin(server_config: web::Data<ServerConfig>) -> impl Responder {
    let url = format!(
        "{}/auth/signin",
        server_config.auth_service_url.trim_end_matches('/')
    );
    redirect(&url)
}

#[post("/auth/token")]
/// Stores a token issued by the auth service in the identity cookie.
pub async fn accept_token(
    request: HttpRequest,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<TokenForm>,
) -> impl Responder {
    let token = form.token.trim();
    let user = match AuthenticatedUser::from_jwt(token, &server_config.secret) {
        Ok(user) => user,
        Err(err) => {
            log::warn!("Rejected token from auth service: {err}");
            return HttpResponse::Unauthorized().finish();
        }
    };

    match Identity::login(&request.extensions(), token.to_string()) {
        Ok(_) => {
            log::info!("User {} signed in to tenant #{}", user.email, user.tenant_id);
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to store identity: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
