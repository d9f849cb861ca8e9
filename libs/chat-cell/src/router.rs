use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn chat_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/messages",
            get(handlers::get_conversation).post(handlers::send_message),
        )
        .route("/messages/{message_id}", delete(handlers::delete_message))
        .route("/live", get(handlers::get_live_channel))
        .with_state(state)
}
