//! Leaderboard endpoints
//!
//! GET returns the ten best scores. POST records a score and trims the
//! table back down to the scores that can still appear on the board.

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    routing::get,
};

use super::error::{ApiError, ApiResult, require_name};
use crate::AppState;
use crate::db::{CreateHighscore, HighscoreRecord, LEADERBOARD_SIZE};

/// GET /leaderboard
///
/// Example: `[{"_id": "...", "name": "Axe", "score": 8}, {"_id": "...", "name": "Sam", "score": 6}]`
async fn leaderboard(State(state): State<AppState>) -> ApiResult<Json<Vec<HighscoreRecord>>> {
    let top = state.db.highscores().top(LEADERBOARD_SIZE).await?;
    if top.is_empty() {
        return Err(ApiError::NoHighScoresYet);
    }
    Ok(Json(top))
}

/// POST /leaderboard
///
/// Accepts `{"name": "James", "score": 4}` as JSON or as a urlencoded form.
async fn post_highscore(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<HighscoreRecord>> {
    let input = read_highscore(request).await?;
    require_name(&input.name)?;

    let recorded = state.db.highscores().record(input).await?;
    tracing::info!(
        name = %recorded.record.name,
        score = recorded.record.score,
        pruned = recorded.pruned,
        "Highscore recorded"
    );
    Ok(Json(recorded.record))
}

async fn read_highscore(request: Request) -> ApiResult<CreateHighscore> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(input) = Form::<CreateHighscore>::from_request(request, &())
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        Ok(input)
    } else {
        let Json(input) = Json::<CreateHighscore>::from_request(request, &())
            .await
            .map_err(|e| ApiError::Validation(e.body_text()))?;
        Ok(input)
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/leaderboard", get(leaderboard).post(post_highscore))
}
