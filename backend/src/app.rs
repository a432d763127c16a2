//! Application state and HTTP router construction.
//!
//! Used by `main` and by the integration tests to build the Axum app.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::services::{MovieLinkScraper, StreamingClient, http_client};

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub streaming: Arc<StreamingClient>,
    pub movielink: Arc<MovieLinkScraper>,
}

impl AppState {
    /// Wire the outbound service clients from configuration
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let client = http_client(config.http_timeout)?;

        let streaming = StreamingClient::new(client.clone(), config.streaming_api_url.clone());
        let movielink = MovieLinkScraper::new(
            client,
            config.movielink_base_url.clone(),
            config.movielink_page_suffix.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            db,
            streaming: Arc::new(streaming),
            movielink: Arc::new(movielink),
        })
    }
}

/// Build the full Axum router.
///
/// Explicit routes win. Anything else is looked up in the client directory
/// first; single-segment paths that are not files become streaming
/// availability lookups.
pub fn build_app(state: AppState) -> Router<()> {
    let availability = api::streaming::router().with_state(state.clone());
    let client_files = ServeDir::new(&state.config.client_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(availability);

    Router::new()
        .merge(api::thespians::router())
        .merge(api::leaderboard::router())
        .merge(api::token::router())
        .merge(api::movielink::router())
        .nest_service("/bower_components", ServeDir::new(&state.config.bower_dir))
        .fallback_service(client_files)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
