use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn ai_tool_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/classify", post(handlers::classify_image))
        .with_state(state)
}
