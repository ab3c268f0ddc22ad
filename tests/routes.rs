use actix_web::{App, http::StatusCode, http::header, test, web};
use actix_web_flash_messages::Level;
use serde_json::{Value, json};

use talent_crm::domain::email_template::NewEmailTemplate;
use talent_crm::domain::module::NewSystemModule;
use talent_crm::domain::talent::NewTalent;
use talent_crm::domain::tenant::NewTenant;
use talent_crm::domain::types::{
    ModuleCategory, ModuleName, ProgressPercent, TemplateBody, TemplateCategory, TemplateName,
    TemplateSubject,
};
use talent_crm::models::auth::AuthenticatedUser;
use talent_crm::models::config::ServerConfig;
use talent_crm::repository::{
    DieselRepository, EmailTemplateWriter, ModuleWriter, TalentWriter, TenantWriter,
};
use talent_crm::routes::alert_level_to_str;
use talent_crm::routes::api::{
    api_v1_email_generate, api_v1_modules, api_v1_password_check, api_v1_talents,
};

mod common;

const SECRET: &str = "integration-secret-integration-secret-0000";

fn server_config() -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        database_url: String::new(),
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        auth_service_url: "http://localhost:8000".to_string(),
    }
}

fn bearer(roles: &[&str]) -> String {
    let mut user = AuthenticatedUser {
        sub: "1".to_string(),
        email: "recruiter@example.com".to_string(),
        tenant_id: 1,
        name: "Recruiter".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: 0,
    };
    user.set_expiration(1);
    format!("Bearer {}", user.to_jwt(SECRET).unwrap())
}

macro_rules! api_app {
    ($repo:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($repo))
                .app_data(web::Data::new(server_config()))
                .service(
                    web::scope("/api")
                        .service(api_v1_talents)
                        .service(api_v1_modules)
                        .service(api_v1_password_check)
                        .service(api_v1_email_generate),
                ),
        )
        .await
    };
}

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn api_requires_token() {
    let test_db = common::TestDb::new("api_requires_token.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::get().uri("/api/v1/talents").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn api_rejects_users_without_access_role() {
    let test_db = common::TestDb::new("api_rejects_users_without_access_role.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::get()
        .uri("/api/v1/modules")
        .insert_header((header::AUTHORIZATION, bearer(&["billing"])))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn api_lists_tenant_talents() {
    let test_db = common::TestDb::new("api_lists_tenant_talents.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.create_talent(
        &NewTalent::try_new(1, "Ada Lovelace", None, None, None, None).unwrap(),
    )
    .unwrap();
    repo.create_talent(
        &NewTalent::try_new(2, "Someone Else", None, None, None, None).unwrap(),
    )
    .unwrap();
    let app = api_app!(repo);

    let req = test::TestRequest::get()
        .uri("/api/v1/talents?search=ada")
        .insert_header((header::AUTHORIZATION, bearer(&["crm"])))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["talents"][0]["name"], "Ada Lovelace");
}

#[actix_web::test]
async fn api_checks_password_against_default_policy() {
    let test_db = common::TestDb::new("api_checks_password_against_default_policy.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::post()
        .uri("/api/v1/password/check")
        .insert_header((header::AUTHORIZATION, bearer(&["crm"])))
        .set_json(json!({"password": "short"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["valid"], false);
    assert_eq!(body["expired"], false);
    assert!(!body["messages"].as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/v1/password/check")
        .insert_header((header::AUTHORIZATION, bearer(&["crm"])))
        .set_json(json!({"password": "Correct1Horse"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["valid"], true);
}

fn module(name: &str, category: &str, progress: i32) -> NewSystemModule {
    NewSystemModule::new(
        ModuleName::new(name).unwrap(),
        ModuleCategory::new(category).unwrap(),
        None,
        ProgressPercent::new(progress).unwrap(),
    )
}

#[actix_web::test]
async fn api_modules_requires_token() {
    let test_db = common::TestDb::new("api_modules_requires_token.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::get().uri("/api/v1/modules").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn api_lists_modules_by_category() {
    let test_db = common::TestDb::new("api_lists_modules_by_category.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.create_module(&module("Talents", "core", 80)).unwrap();
    repo.create_module(&module("Analytics", "insights", 20)).unwrap();
    let app = api_app!(repo);

    let req = test::TestRequest::get()
        .uri("/api/v1/modules?category=core")
        .insert_header((header::AUTHORIZATION, bearer(&["crm"])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let modules = body["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["name"], "Talents");
    assert_eq!(modules[0]["progress"], 80);
}

#[actix_web::test]
async fn api_email_generate_requires_token() {
    let test_db = common::TestDb::new("api_email_generate_requires_token.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::post()
        .uri("/api/v1/email/generate")
        .set_json(json!({"template_id": 1, "recipient_type": "talent", "recipient_id": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn api_email_generate_rejects_users_without_access_role() {
    let test_db = common::TestDb::new("api_email_generate_rejects_users.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::post()
        .uri("/api/v1/email/generate")
        .insert_header((header::AUTHORIZATION, bearer(&["billing"])))
        .set_json(json!({"template_id": 1, "recipient_type": "talent", "recipient_id": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn api_email_generate_renders_draft() {
    let test_db = common::TestDb::new("api_email_generate_renders_draft.db");
    let repo = DieselRepository::new(test_db.pool());
    repo.create_tenant(&NewTenant::try_new("Acme", "acme", None).unwrap())
        .unwrap();
    let talent = repo
        .create_talent(
            &NewTalent::try_new(
                1,
                "Ada Lovelace",
                Some("ada@example.com".to_string()),
                None,
                None,
                None,
            )
            .unwrap(),
        )
        .unwrap();
    let template = repo
        .create_email_template(&NewEmailTemplate {
            name: TemplateName::new("Intro").unwrap(),
            category: TemplateCategory::new("outreach").unwrap(),
            subject: TemplateSubject::new("Hello from {{ tenant.name }}").unwrap(),
            body: TemplateBody::new("Hi {{ recipient.first_name }}").unwrap(),
        })
        .unwrap();
    let app = api_app!(repo);

    let req = test::TestRequest::post()
        .uri("/api/v1/email/generate")
        .insert_header((header::AUTHORIZATION, bearer(&["crm"])))
        .set_json(json!({
            "template_id": template.id,
            "recipient_type": "talent",
            "recipient_id": talent.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["to"], "ada@example.com");
    assert_eq!(body["subject"], "Hello from Acme");
    assert_eq!(body["body"], "Hi Ada");
}

#[actix_web::test]
async fn api_email_generate_rejects_unknown_recipient_type() {
    let test_db = common::TestDb::new("api_email_generate_rejects_unknown_recipient.db");
    let app = api_app!(DieselRepository::new(test_db.pool()));

    let req = test::TestRequest::post()
        .uri("/api/v1/email/generate")
        .insert_header((header::AUTHORIZATION, bearer(&["crm"])))
        .set_json(json!({"template_id": 1, "recipient_type": "company", "recipient_id": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
