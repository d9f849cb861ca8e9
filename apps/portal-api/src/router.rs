use std::sync::Arc;

use axum::{routing::get, Router};

use account_cell::router::account_routes;
use ai_tool_cell::router::ai_tool_routes;
use chat_cell::router::chat_routes;
use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;
use video_cell::router::video_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "OncoLink portal gateway is running!" }))
        .nest("/api/account", account_routes(state.clone()))
        .nest("/api/schedule", schedule_routes(state.clone()))
        .nest("/api/chat", chat_routes(state.clone()))
        .nest("/api/ai-tool", ai_tool_routes(state.clone()))
        .nest("/api/video", video_routes(state.clone()))
}
