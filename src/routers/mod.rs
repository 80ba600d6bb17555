use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::SongController;

pub mod root;
pub mod song;

pub use root::health_check_route;
pub use song::{
    count_route, delete_song_route, get_song_route, insert_song_route, list_songs_route,
    update_song_route,
};

pub fn build_router(controller: SongController) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_route))
        .route("/count", get(count_route))
        .route("/song", get(list_songs_route).post(insert_song_route))
        .route(
            "/song/{id}",
            get(get_song_route)
                .put(update_song_route)
                .delete(delete_song_route),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(controller)
}
