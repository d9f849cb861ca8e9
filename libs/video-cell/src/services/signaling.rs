use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{OpenRoomRequest, RoomSession, SessionDescription, VideoCallError};

/// Client for the peer-connection broker that pairs the two call sides.
/// Media never flows through the gateway; this is signaling glue only.
#[derive(Debug)]
pub struct PeerBrokerClient {
    client: Client,
    base_url: String,
    app_id: String,
    api_token: String,
}

impl PeerBrokerClient {
    pub fn new(config: &AppConfig) -> Result<Self, VideoCallError> {
        if !config.is_video_calling_configured() {
            return Err(VideoCallError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.video_broker_base_url.clone(),
            app_id: config.video_broker_app_id.clone(),
            api_token: config.video_broker_api_token.clone(),
        })
    }

    /// Open a room with the caller's SDP offer; the broker answers with the
    /// room handle, answer SDP and ICE servers.
    pub async fn open_room(&self, offer_sdp: String) -> Result<RoomSession, VideoCallError> {
        info!("Opening video call room");

        let url = format!("{}/apps/{}/rooms/new", self.base_url, self.app_id);
        let body = OpenRoomRequest {
            session_description: SessionDescription {
                sdp_type: "offer".to_string(),
                sdp: offer_sdp,
            },
        };

        let session = self.post_json(&url, &body).await?;
        self.check_session_errors(&session)?;

        info!("Opened video call room: {}", session.room_id);
        Ok(session)
    }

    /// Forward the callee's SDP answer into an open room.
    pub async fn submit_answer(
        &self,
        room_id: &str,
        answer_sdp: String,
    ) -> Result<RoomSession, VideoCallError> {
        info!("Submitting answer for room: {}", room_id);

        let url = format!("{}/apps/{}/rooms/{}/answer", self.base_url, self.app_id, room_id);
        let body = OpenRoomRequest {
            session_description: SessionDescription {
                sdp_type: "answer".to_string(),
                sdp: answer_sdp,
            },
        };

        let session = self.post_json(&url, &body).await?;
        self.check_session_errors(&session)?;
        Ok(session)
    }

    pub async fn close_room(&self, room_id: &str) -> Result<(), VideoCallError> {
        info!("Closing video call room: {}", room_id);

        let url = format!("{}/apps/{}/rooms/{}", self.base_url, self.app_id, room_id);
        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!("Closing room failed: {} - {}", status, response_text);
            return Err(VideoCallError::BrokerApi {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        Ok(())
    }

    async fn post_json(
        &self,
        url: &str,
        body: &OpenRoomRequest,
    ) -> Result<RoomSession, VideoCallError> {
        debug!("Sending broker request to: {}", url);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Broker response: {} - {}", status, response_text);

        if !status.is_success() {
            error!("Broker request failed: {} - {}", status, response_text);
            return Err(VideoCallError::BrokerApi {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| VideoCallError::BrokerApi {
            message: format!("Failed to parse broker response: {}", e),
        })
    }

    fn check_session_errors(&self, session: &RoomSession) -> Result<(), VideoCallError> {
        if let Some(code) = &session.error_code {
            let description = session
                .error_description
                .clone()
                .unwrap_or_else(|| "unknown broker error".to_string());
            return Err(VideoCallError::BrokerApi {
                message: format!("{}: {}", code, description),
            });
        }
        Ok(())
    }
}
