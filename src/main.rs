use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use home_service::config::AppConfig;
use home_service::db::Database;
use home_service::routes;
use home_service::services::payment::phonepe::PhonePeGateway;
use home_service::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let db = Database::open(&config.database_url)?;
    tracing::info!("connected to database at {}", config.database_url);

    if !config.has_gateway_credentials() {
        tracing::warn!("PHONEPE_MERCHANT_ID or PHONEPE_SALT_KEY not set, payment orders will be rejected by the gateway");
    }
    tracing::info!("using PhonePe gateway (url: {})", config.phonepe_base_url);
    let gateway = PhonePeGateway::new(
        config.phonepe_base_url.clone(),
        config.phonepe_merchant_id.clone(),
        config.phonepe_salt_key.clone(),
        config.phonepe_salt_index.clone(),
    );

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        gateway: Box::new(gateway),
    });

    let app = routes::build_router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, closing database");
    state.db.close()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
