//! Scraped media link endpoint

use axum::{Router, extract::State, http::Uri, routing::get};

use crate::AppState;
use crate::services::movielink::title::title_from_request_uri;

/// Body sent whenever no media link could be resolved
pub const ERROR_BODY: &str = "error";

/// GET /movielink/{title}
///
/// Answers with the media file URL as plain text, or `error`.
async fn movie_link(State(state): State<AppState>, uri: Uri) -> String {
    let raw = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let title = title_from_request_uri(raw);

    match state.movielink.media_url(&title).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(title = %title, error = %e, "Could not resolve movie link");
            ERROR_BODY.to_string()
        }
    }
}

pub fn router() -> Router<AppState> {
    // `{*path}` does not match an empty tail
    Router::new()
        .route("/movielink/", get(movie_link))
        .route("/movielink/{*path}", get(movie_link))
}
