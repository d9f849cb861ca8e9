use std::sync::Arc;

use axum::{
    routing::{delete, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn video_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/rooms", post(handlers::open_room))
        .route("/rooms/{room_id}/answer", post(handlers::submit_answer))
        .route("/rooms/{room_id}", delete(handlers::close_room))
        .with_state(state)
}
