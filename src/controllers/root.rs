use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub struct RootController;

impl RootController {
    /// Liveness only; never touches the database.
    pub async fn health_check() -> impl IntoResponse {
        (StatusCode::OK, Json(json!({"status": "OK"})))
    }
}
