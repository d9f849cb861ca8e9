use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_base_url: String,
    pub chat_hub_url: String,
    pub ai_inference_url: String,
    pub video_broker_base_url: String,
    pub video_broker_app_id: String,
    pub video_broker_api_token: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            backend_base_url: env::var("PORTAL_BACKEND_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_BACKEND_URL not set, using empty value");
                    String::new()
                }),
            chat_hub_url: env::var("PORTAL_CHAT_HUB_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_CHAT_HUB_URL not set, using default");
                    "/chatHub".to_string()
                }),
            ai_inference_url: env::var("PORTAL_AI_INFERENCE_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_AI_INFERENCE_URL not set, using empty value");
                    String::new()
                }),
            video_broker_base_url: env::var("PORTAL_VIDEO_BROKER_URL")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_VIDEO_BROKER_URL not set, using empty value");
                    String::new()
                }),
            video_broker_app_id: env::var("PORTAL_VIDEO_BROKER_APP_ID")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_VIDEO_BROKER_APP_ID not set, using empty value");
                    String::new()
                }),
            video_broker_api_token: env::var("PORTAL_VIDEO_BROKER_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("PORTAL_VIDEO_BROKER_API_TOKEN not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_base_url.is_empty()
    }

    pub fn is_ai_tool_configured(&self) -> bool {
        !self.ai_inference_url.is_empty()
    }

    pub fn is_video_calling_configured(&self) -> bool {
        !self.video_broker_base_url.is_empty()
            && !self.video_broker_app_id.is_empty()
            && !self.video_broker_api_token.is_empty()
    }
}
