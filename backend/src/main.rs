//! Thespian server - entry point
//!
//! Serves the REST API and the static browser client.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thespian_server::config::Config;
use thespian_server::db::Database;
use thespian_server::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thespian_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting thespian server");

    let config = Config::from_env()?;
    tracing::info!(
        client_dir = %config.client_dir.display(),
        token_configured = config.tmdb_api_token.is_some(),
        "Configuration loaded"
    );

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    tracing::info!(database = %config.database_url, "Database connected");

    let addr = config.bind_address();
    let state = AppState::new(config, db)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
