//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedUser;
use crate::services::ServiceError;

pub mod api;
pub mod auth;
pub mod contacts;
pub mod custom_fields;
pub mod email;
pub mod main;
pub mod modules;
pub mod settings;
pub mod talents;
pub mod tenants;

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page template expects: alerts, the current user, the
/// active navigation entry and the auth service link.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Turns a failed form submission into a flash message and a redirect.
/// Unauthorized users are sent to `/na`, everyone else back to `back`.
pub fn flash_failure(err: ServiceError, back: &str, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::NotFound => {
            FlashMessage::error("Запись не найдена.").send();
            redirect(back)
        }
        err => {
            log::error!("Request to {back} failed: {err}");
            FlashMessage::error(fallback).send();
            redirect(back)
        }
    }
}

/// Response for a page whose data could not be loaded.
pub fn page_failure(err: ServiceError, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        ServiceError::NotFound => {
            FlashMessage::error("Запись не найдена.").send();
            redirect(back)
        }
        err => {
            log::error!("Failed to load page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_levels_map_to_bootstrap_classes() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
        assert_eq!(alert_level_to_str(&Level::Info), "info");
    }

    #[test]
    fn redirect_uses_see_other() {
        let response = redirect("/talents");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/talents")
        );
    }
}
