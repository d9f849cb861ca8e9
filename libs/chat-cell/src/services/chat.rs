use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_backend::BackendClient;
use shared_config::AppConfig;
use shared_utils::retry::{retry_with_policy, RetryPolicy};

use crate::models::{ChatError, ChatMessage};

/// Initial conversation loads retry a few times before giving up; chatting
/// over a flaky connection should not require a manual reload.
const LOAD_RETRY_ATTEMPTS: u32 = 3;
const LOAD_RETRY_STEP: Duration = Duration::from_secs(2);

pub struct ChatService {
    backend: Arc<BackendClient>,
    load_retry: RetryPolicy,
}

impl ChatService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(Arc::new(BackendClient::new(config)))
    }

    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self {
            backend,
            load_retry: RetryPolicy::linear(LOAD_RETRY_ATTEMPTS, LOAD_RETRY_STEP),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.load_retry = policy;
        self
    }

    /// The message history with one peer, retried per the load policy.
    pub async fn conversation(
        &self,
        peer_id: &str,
        auth_token: &str,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        debug!("Loading conversation with {}", peer_id);
        let path = format!("/api/Chat/GetChat?receiverId={}", peer_id);

        let messages = retry_with_policy(self.load_retry, |_attempt| {
            let path = path.clone();
            async move {
                self.backend
                    .request::<Vec<ChatMessage>>(Method::GET, &path, Some(auth_token), None)
                    .await
            }
        })
        .await?;

        Ok(messages)
    }

    pub async fn send(
        &self,
        receiver_id: &str,
        message: &str,
        auth_token: &str,
    ) -> Result<(), ChatError> {
        let text = message.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.backend
            .request::<Value>(
                Method::POST,
                "/api/Chat/send",
                Some(auth_token),
                Some(json!({ "receiverId": receiver_id, "message": text })),
            )
            .await?;

        info!("Message sent to {}", receiver_id);
        Ok(())
    }

    pub async fn delete(&self, message_id: i64, auth_token: &str) -> Result<(), ChatError> {
        let path = format!("/api/Chat?MessageId={}", message_id);
        self.backend
            .request_no_content(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        info!("Message {} deleted", message_id);
        Ok(())
    }
}
