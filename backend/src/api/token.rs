//! Movie-database token passthrough
//!
//! The browser client queries the movie database directly and picks up the
//! API token from here rather than shipping it in its source.

use axum::{Router, extract::State, routing::get};

use super::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /tmdb/token
async fn tmdb_token(State(state): State<AppState>) -> ApiResult<String> {
    state
        .config
        .tmdb_api_token
        .clone()
        .ok_or(ApiError::NotConfigured("movie database token"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tmdb/token", get(tmdb_token))
}
