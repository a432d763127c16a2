//! Error responses shared by the REST handlers

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Database failure; the message is passed on to the client
    #[error("{0:#}")]
    Database(#[from] anyhow::Error),

    #[error("Not found in database")]
    NotInDb,

    #[error("No high scores yet")]
    NoHighScoresYet,

    #[error("{0}")]
    Validation(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotInDb | Self::NoHighScoresYet | Self::NotConfigured(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Reject blank names before they reach the database
pub fn require_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}
