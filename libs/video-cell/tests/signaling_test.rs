use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use video_cell::models::VideoCallError;
use video_cell::services::signaling::PeerBrokerClient;

const APP_ID: &str = "test-app";

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        backend_base_url: "http://localhost:5000".to_string(),
        chat_hub_url: "/chatHub".to_string(),
        ai_inference_url: String::new(),
        video_broker_base_url: server.uri(),
        video_broker_app_id: APP_ID.to_string(),
        video_broker_api_token: "broker-token".to_string(),
    }
}

#[tokio::test]
async fn opening_a_room_returns_answer_and_ice_servers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/apps/{}/rooms/new", APP_ID)))
        .and(body_partial_json(json!({
            "sessionDescription": { "type": "offer" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roomId": "room-42",
            "sessionDescription": { "type": "answer", "sdp": "v=0 answer" },
            "iceServers": [{ "urls": ["stun:stun.example.com:3478"] }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let broker = PeerBrokerClient::new(&config_for(&server)).unwrap();
    let session = broker.open_room("v=0 offer".to_string()).await.unwrap();

    assert_eq!(session.room_id, "room-42");
    assert_eq!(
        session.session_description.as_ref().map(|d| d.sdp_type.as_str()),
        Some("answer")
    );
    assert_eq!(session.ice_servers.len(), 1);
}

#[tokio::test]
async fn broker_level_errors_are_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/apps/{}/rooms/new", APP_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roomId": "",
            "errorCode": "invalid_sdp",
            "errorDescription": "offer could not be parsed",
        })))
        .mount(&server)
        .await;

    let broker = PeerBrokerClient::new(&config_for(&server)).unwrap();
    let err = broker.open_room("garbage".to_string()).await.unwrap_err();

    assert_matches!(
        err,
        VideoCallError::BrokerApi { message } if message.contains("invalid_sdp")
    );
}

#[tokio::test]
async fn http_failures_become_broker_errors() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/apps/{}/rooms/room-42", APP_ID)))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let broker = PeerBrokerClient::new(&config_for(&server)).unwrap();
    let err = broker.close_room("room-42").await.unwrap_err();

    assert_matches!(err, VideoCallError::BrokerApi { message } if message.contains("500"));
}

#[tokio::test]
async fn closing_a_room_succeeds_quietly() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/apps/{}/rooms/room-42", APP_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let broker = PeerBrokerClient::new(&config_for(&server)).unwrap();
    broker.close_room("room-42").await.unwrap();
}

#[test]
fn missing_broker_settings_refuse_to_construct() {
    let config = AppConfig {
        backend_base_url: "http://localhost:5000".to_string(),
        chat_hub_url: "/chatHub".to_string(),
        ai_inference_url: String::new(),
        video_broker_base_url: String::new(),
        video_broker_app_id: String::new(),
        video_broker_api_token: String::new(),
    };

    let err = PeerBrokerClient::new(&config).unwrap_err();
    assert_matches!(err, VideoCallError::NotConfigured);
}
