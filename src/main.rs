use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use mangai_api::{
    config::Config,
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        catalog = %config.catalog_base(),
        models = ?config.generation_models,
        max_attempts = config.generation_max_attempts,
        "Configuration loaded"
    );

    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
