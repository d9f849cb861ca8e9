use serde::{Deserialize, Serialize};

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: String,
    pub sdp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceServer {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRoomRequest {
    pub session_description: SessionDescription,
}

/// Broker's answer to opening a room: the room handle, the (answer) SDP and
/// the STUN/TURN servers both peers should use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSession {
    pub room_id: String,
    #[serde(default)]
    pub session_description: Option<SessionDescription>,
    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBody {
    pub sdp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferBody {
    pub sdp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum VideoCallError {
    #[error("video calling is not configured")]
    NotConfigured,

    #[error("peer broker error: {message}")]
    BrokerApi { message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<VideoCallError> for AppError {
    fn from(err: VideoCallError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
