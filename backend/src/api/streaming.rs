//! Streaming availability endpoint
//!
//! GET /{movie} answers whether the movie is on Netflix. The route sits
//! behind the static client files, so it only sees paths that are not files.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::AppState;
use crate::services::Availability;

/// GET /{movie}
///
/// Always answers 200; lookups that fail report the movie as unavailable.
async fn movie_availability(
    State(state): State<AppState>,
    Path(movie): Path<String>,
) -> Json<Availability> {
    tracing::info!(movie = %movie, "Checking streaming availability");
    Json(state.streaming.availability(&movie).await)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{movie}", get(movie_availability))
}
