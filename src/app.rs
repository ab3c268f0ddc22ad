//! HTTP server wiring.

use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::api::{
    api_v1_email_generate, api_v1_modules, api_v1_password_check, api_v1_talents,
};
use crate::routes::auth::{accept_token, logout, signin};
use crate::routes::contacts::{
    add_person, add_relationship, delete_person, remove_relationship, save_person,
    save_person_fields, show_people, show_person,
};
use crate::routes::custom_fields::{add_custom_field, delete_custom_field, show_custom_fields};
use crate::routes::email::{
    add_template, deactivate_template, generate_email, save_template, show_template,
    show_templates,
};
use crate::routes::main::{not_assigned, show_index};
use crate::routes::modules::{
    add_module, apply_consolidation, save_module, show_consolidation, show_module, show_modules,
};
use crate::routes::settings::{save_password_policy, show_settings};
use crate::routes::talents::{
    add_talent, change_talent_status, delete_talent, save_talent, save_talent_fields,
    show_talent, show_talents, upload_talents,
};
use crate::routes::tenants::{
    add_tenant, save_tenant, show_tenant, show_tenants, toggle_tenant_module,
};

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(signin)
            .service(accept_token)
            .service(
                web::scope("/api")
                    .service(api_v1_talents)
                    .service(api_v1_modules)
                    .service(api_v1_password_check)
                    .service(api_v1_email_generate),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(not_assigned)
                    .service(show_tenants)
                    .service(add_tenant)
                    .service(show_tenant)
                    .service(save_tenant)
                    .service(toggle_tenant_module)
                    .service(show_modules)
                    .service(add_module)
                    .service(show_module)
                    .service(save_module)
                    .service(show_consolidation)
                    .service(apply_consolidation)
                    .service(show_talents)
                    .service(add_talent)
                    .service(upload_talents)
                    .service(show_talent)
                    .service(save_talent)
                    .service(change_talent_status)
                    .service(delete_talent)
                    .service(save_talent_fields)
                    .service(show_people)
                    .service(add_person)
                    .service(show_person)
                    .service(save_person)
                    .service(delete_person)
                    .service(add_relationship)
                    .service(remove_relationship)
                    .service(save_person_fields)
                    .service(show_custom_fields)
                    .service(add_custom_field)
                    .service(delete_custom_field)
                    .service(show_templates)
                    .service(add_template)
                    .service(show_template)
                    .service(save_template)
                    .service(deactivate_template)
                    .service(generate_email)
                    .service(show_settings)
                    .service(save_password_policy)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
