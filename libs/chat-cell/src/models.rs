use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_backend::BackendError;
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    pub receiver_id: String,
    #[serde(default)]
    pub receiver_name: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub message: String,
}

/// Where the browser should attach for live delivery, and how stubbornly to
/// reconnect. The transport itself is owned by the external hub.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChannelView {
    pub hub_url: String,
    pub max_reconnect_attempts: u32,
    pub reconnect_delays_ms: Vec<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message text must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => AppError::ValidationError(err.to_string()),
            ChatError::Backend(inner) => inner.into(),
        }
    }
}
