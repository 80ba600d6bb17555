use std::sync::Arc;

use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::Bson;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    db::SongStore,
    error::ApiError,
    models::song::{has_fields, to_document, to_extjson, InsertedSong, SongCount, REQUIRED_FIELDS},
};

/// Request handling for the song collection. Cheap to clone; every clone
/// shares the same store handle.
#[derive(Clone)]
pub struct SongController {
    store: Arc<dyn SongStore>,
}

impl SongController {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        SongController { store }
    }

    pub async fn count(&self) -> Result<Response, ApiError> {
        let count = self.store.count().await.map_err(|e| {
            error!("Error counting documents: {}", e);
            e
        })?;
        Ok((StatusCode::OK, Json(SongCount { count })).into_response())
    }

    pub async fn list(&self) -> Result<Response, ApiError> {
        let songs = self.store.find_all().await.map_err(|e| {
            error!("Error listing documents: {}", e);
            e
        })?;
        let songs: Vec<Value> = songs.into_iter().map(to_extjson).collect();
        Ok((StatusCode::OK, Json(Value::Array(songs))).into_response())
    }

    pub async fn get(&self, id: i64) -> Result<Response, ApiError> {
        let song = self.store.find_by_id(id).await.map_err(|e| {
            error!(id, "Error retrieving song: {}", e);
            e
        })?;
        match song {
            Some(song) => Ok((StatusCode::OK, Json(to_extjson(song))).into_response()),
            None => Err(ApiError::NotFound),
        }
    }

    pub async fn insert(&self, payload: Option<Value>) -> Result<Response, ApiError> {
        let Some(Value::Object(body)) = payload else {
            return Err(ApiError::InvalidBody(
                "Request body must be a JSON object".to_string(),
            ));
        };
        if !has_fields(&body, &REQUIRED_FIELDS) {
            return Err(ApiError::MissingFields);
        }
        let id = body
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::InvalidBody("id must be an integer".to_string()))?;

        let exists = self.store.exists(id).await.map_err(|e| {
            error!(id, "Error checking for existing song: {}", e);
            e
        })?;
        if exists {
            return Err(ApiError::Duplicate(id));
        }

        let song = to_document(Value::Object(body)).map_err(ApiError::InvalidBody)?;
        let inserted_id = self.store.insert(song).await.map_err(|e| {
            error!(id, "Error inserting song: {}", e);
            e
        })?;
        info!(id, "Inserted song");

        let inserted_id = match inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s,
            other => other.to_string(),
        };
        Ok((
            StatusCode::CREATED,
            Json(InsertedSong {
                message: "Song inserted successfully".to_string(),
                inserted_id,
            }),
        )
            .into_response())
    }

    /// Merges the submitted fields onto the song. A write that changes
    /// nothing answers 404, the same as a missing song.
    pub async fn update(&self, id: i64, payload: Option<Value>) -> Result<Response, ApiError> {
        let Some(Value::Object(body)) = payload else {
            return Err(ApiError::InvalidSong);
        };
        if !has_fields(&body, &["title", "lyrics"]) {
            return Err(ApiError::InvalidSong);
        }
        // Rewriting `id` would let two documents share one.
        if let Some(body_id) = body.get("id") {
            if body_id.as_i64() != Some(id) {
                return Err(ApiError::InvalidSong);
            }
        }
        let fields = to_document(Value::Object(body)).map_err(|_| ApiError::InvalidSong)?;

        let modified = self.store.set_fields(id, fields).await.map_err(|e| {
            error!(id, "Error updating song: {}", e);
            e
        })?;
        if modified == 0 {
            return Err(ApiError::NotFound);
        }

        let song = self.store.find_by_id(id).await.map_err(|e| {
            error!(id, "Error fetching updated song: {}", e);
            e
        })?;
        match song {
            Some(song) => {
                info!(id, "Updated song");
                Ok((StatusCode::OK, Json(to_extjson(song))).into_response())
            }
            None => Err(ApiError::NotFound),
        }
    }

    pub async fn delete(&self, id: i64) -> Result<Response, ApiError> {
        let exists = self.store.exists(id).await.map_err(|e| {
            error!(id, "Error checking song before delete: {}", e);
            e
        })?;
        if !exists {
            return Err(ApiError::NotFound);
        }
        self.store.delete(id).await.map_err(|e| {
            error!(id, "Error deleting song: {}", e);
            e
        })?;
        info!(id, "Deleted song");
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
