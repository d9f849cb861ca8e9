use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ai_tool_cell::models::ClassifierError;
use ai_tool_cell::services::classifier::ClassifierService;

const SCAN_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0];

fn service_for(server: &MockServer) -> ClassifierService {
    ClassifierService::with_endpoint(format!("{}/predict", server.uri()))
}

#[tokio::test]
async fn classification_returns_the_probability_map() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "glioma": 0.82,
            "meningioma": 0.11,
            "no_tumor": 0.05,
            "pituitary": 0.02,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let classification = service_for(&server)
        .classify("scan.jpg", "image/jpeg", SCAN_BYTES.to_vec())
        .await
        .unwrap();

    assert_eq!(classification.scores.len(), 4);
    assert_eq!(classification.top(), Some(("glioma", 0.82)));
}

#[tokio::test]
async fn upstream_failure_is_reported_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .classify("scan.jpg", "image/jpeg", SCAN_BYTES.to_vec())
        .await
        .unwrap_err();

    assert_matches!(err, ClassifierError::Upstream(msg) if msg.contains("503"));
}

#[tokio::test]
async fn out_of_range_probability_breaks_the_contract() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "glioma": 1.7,
        })))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .classify("scan.jpg", "image/jpeg", SCAN_BYTES.to_vec())
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ClassifierError::InvalidProbability { label, .. } if label == "glioma"
    );
}

#[tokio::test]
async fn empty_upload_never_reaches_the_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = service_for(&server)
        .classify("scan.jpg", "image/jpeg", Vec::new())
        .await
        .unwrap_err();

    assert_matches!(err, ClassifierError::EmptyUpload);
}
