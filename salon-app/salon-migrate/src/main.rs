use anyhow::Context;
use tracing::{error, info};

use salon_core::services::TenantResolver;
use salon_infrastructure::database::{connection, migrations};
use salon_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize telemetry; the guard flushes the file sink on exit
    let _guard = salon_shared::telemetry::init_telemetry(&config.log)?;

    info!("{} migrator starting ({})", config.app.name, config.app.env);

    // Reject a tenant fallback that is switched on without a usable default
    let resolver = TenantResolver::from_settings(&config.tenant)?;
    match resolver.fallback() {
        Some(tenant) => info!("Anonymous calls fall back to salon {}", tenant),
        None => info!("Anonymous calls are rejected"),
    }

    // Connect to Database
    let pool = connection::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection established.");

    if let Err(e) = migrations::run_migrations(&pool).await {
        error!("Migration failed: {}", e);
        return Err(e.into());
    }

    pool.close().await;
    info!("Schema is up to date.");
    Ok(())
}
