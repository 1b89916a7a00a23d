use std::sync::Arc;

use anyhow::{Context, Result};
use domain::services::ChatGateway;
use formbot_api::{app, config, middleware, services::TelegramClient};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics().context("failed to install Prometheus recorder")?;

    info!("Starting formbot API v{}", env!("CARGO_PKG_VERSION"));

    let db_config: persistence::db::DatabaseConfig = (&config.database).into();
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let gateway: Option<Arc<dyn ChatGateway>> = if config.telegram.enabled {
        let client = TelegramClient::new(&config.telegram)
            .context("failed to build Telegram client")?;
        info!(bot = %config.telegram.bot_username, "Telegram gateway enabled");
        Some(Arc::new(client))
    } else {
        warn!("Telegram disabled; submissions will not be forwarded");
        None
    };

    let addr = config.socket_addr().context("invalid server.host/server.port")?;
    let state = app::AppState::new(config, pool, gateway).context("invalid JWT keys")?;
    let router = app::create_app(state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
