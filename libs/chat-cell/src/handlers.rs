use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ChatMessage, LiveChannelView, SendMessageRequest};
use crate::services::{chat::ChatService, live};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationQuery {
    pub peer_id: String,
}

pub async fn get_conversation(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ConversationQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let service = ChatService::new(&state);
    let messages = service.conversation(&query.peer_id, auth.token()).await?;
    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ChatService::new(&state);
    service
        .send(&body.receiver_id, &body.message, auth.token())
        .await?;
    Ok(Json(json!({ "sent": true })))
}

pub async fn delete_message(
    State(state): State<Arc<AppConfig>>,
    Path(message_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = ChatService::new(&state);
    service.delete(message_id, auth.token()).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// Hub location and reconnect schedule for the browser's live channel.
pub async fn get_live_channel(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<LiveChannelView>, AppError> {
    Ok(Json(live::channel_descriptor(&state)))
}
