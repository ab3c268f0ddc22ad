//! One-off script seeding the module registry and applying the built-in
//! consolidation plan.

use std::env;

use dotenvy::dotenv;

use talent_crm::db::establish_connection_pool;
use talent_crm::domain::consolidation::CONSOLIDATION_PLAN;
use talent_crm::models::config::ServerConfig;
use talent_crm::repository::DieselRepository;
use talent_crm::services::modules::{apply_consolidation_plan, seed_default_registry};

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let server_config = match ServerConfig::load(&app_env) {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let repo = DieselRepository::new(pool);

    match seed_default_registry(&repo) {
        Ok(seeded) => log::info!("Seeded {seeded} new modules"),
        Err(e) => {
            log::error!("Failed to seed module registry: {e}");
            std::process::exit(1);
        }
    }

    match apply_consolidation_plan(&repo, CONSOLIDATION_PLAN) {
        Ok(report) if report.is_empty() => {
            log::info!("Registry already matches the consolidation plan");
        }
        Ok(report) => {
            log::info!(
                "Consolidation applied: {} created, {} merged, {} raised",
                report.created,
                report.merged,
                report.raised
            );
            if !report.missing.is_empty() {
                log::warn!("Missing source modules: {}", report.missing.join(", "));
            }
        }
        Err(e) => {
            log::error!("Failed to apply consolidation plan: {e}");
            std::process::exit(1);
        }
    }
}
