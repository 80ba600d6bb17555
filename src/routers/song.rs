use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::request::Parts,
    response::Response,
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::controllers::SongController;
use crate::error::ApiError;

/// Song id taken from the path. Only unsigned decimal digits match; anything
/// else is answered as an unknown song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongId(pub i64);

impl<S> FromRequestParts<S> for SongId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;
        parse_song_id(&raw).map(SongId).ok_or(ApiError::NotFound)
    }
}

pub fn parse_song_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Option<Value> {
    match payload {
        Ok(Json(value)) => Some(value),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection);
            None
        }
    }
}

pub async fn count_route(State(controller): State<SongController>) -> Result<Response, ApiError> {
    controller.count().await
}

pub async fn list_songs_route(
    State(controller): State<SongController>,
) -> Result<Response, ApiError> {
    controller.list().await
}

pub async fn get_song_route(
    State(controller): State<SongController>,
    SongId(id): SongId,
) -> Result<Response, ApiError> {
    controller.get(id).await
}

pub async fn insert_song_route(
    State(controller): State<SongController>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    controller.insert(json_body(payload)).await
}

pub async fn update_song_route(
    State(controller): State<SongController>,
    SongId(id): SongId,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    controller.update(id, json_body(payload)).await
}

pub async fn delete_song_route(
    State(controller): State<SongController>,
    SongId(id): SongId,
) -> Result<Response, ApiError> {
    controller.delete(id).await
}
