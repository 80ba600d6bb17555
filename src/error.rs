use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures raised by a [`crate::db::SongStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("{0}")]
    InvalidBody(String),
    #[error("Invalid song data")]
    InvalidSong,
    #[error("song with id {0} already present")]
    Duplicate(i64),
    #[error("Song not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidBody(_) | ApiError::InvalidSong => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Duplicate(_) => StatusCode::FOUND,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::InvalidSong => json!({"error": self.to_string()}),
            // Detail is logged by the caller; clients only see a generic message.
            ApiError::Store(_) => json!({"message": "Internal server error"}),
            _ => json!({"message": self.to_string()}),
        };
        (status, Json(body)).into_response()
    }
}
