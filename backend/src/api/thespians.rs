//! Thespian endpoints
//!
//! Thespians are posted by the client after it has looked the actor up in
//! the movie database, and read back by name or at random for the game.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult, require_name};
use crate::AppState;
use crate::db::{CreateThespian, ThespianRecord};

#[derive(Debug, Deserialize)]
pub struct ThespianQuery {
    pub name: Option<String>,
}

/// POST body: the thespian travels under `data`
#[derive(Debug, Deserialize)]
pub struct CreateThespianRequest {
    pub data: Option<CreateThespian>,
}

/// Outcome of a bulk delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: u8,
    pub n: u64,
}

/// Look a thespian up by exact name
///
/// GET /thespians?name=Tom+Hanks
///
/// A single match is returned as an object, several as an array.
async fn find_thespians(
    State(state): State<AppState>,
    Query(query): Query<ThespianQuery>,
) -> ApiResult<Response> {
    let Some(name) = query.name else {
        return Err(ApiError::NotInDb);
    };

    let mut found = state.db.thespians().find_by_name(&name).await?;
    match found.len() {
        0 => Err(ApiError::NotInDb),
        1 => Ok(Json(found.remove(0)).into_response()),
        _ => Ok(Json(found).into_response()),
    }
}

/// GET /thespians/random
async fn random_thespian(State(state): State<AppState>) -> ApiResult<Json<ThespianRecord>> {
    tracing::debug!("Picking a random thespian");
    state
        .db
        .thespians()
        .find_random()
        .await?
        .map(Json)
        .ok_or(ApiError::NotInDb)
}

/// POST /thespians
async fn create_thespian(
    State(state): State<AppState>,
    body: Result<Json<CreateThespianRequest>, JsonRejection>,
) -> ApiResult<Json<ThespianRecord>> {
    let Json(request) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let input = request
        .data
        .ok_or_else(|| ApiError::Validation("thespian must be sent under `data`".to_string()))?;
    require_name(&input.name)?;

    let created = state.db.thespians().create(input).await?;
    tracing::info!(thespian_id = %created.id, name = %created.name, "Thespian added");
    Ok(Json(created))
}

/// Drop every thespian without a profile image
///
/// DELETE /thespians
async fn delete_faceless(State(state): State<AppState>) -> ApiResult<Json<DeleteResponse>> {
    let n = state.db.thespians().delete_without_profile().await?;
    tracing::info!(deleted = n, "Removed thespians without a profile image");
    Ok(Json(DeleteResponse { ok: 1, n }))
}

/// GET /allthespians
async fn all_thespians(State(state): State<AppState>) -> ApiResult<Json<Vec<ThespianRecord>>> {
    Ok(Json(state.db.thespians().list_all().await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/thespians",
            get(find_thespians).post(create_thespian).delete(delete_faceless),
        )
        .route("/thespians/random", get(random_thespian))
        .route("/allthespians", get(all_thespians))
}
