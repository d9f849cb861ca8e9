use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::models::{ScheduleError, SlotTime, WeeklyScheduleDraft};
use schedule_cell::services::worktime::WorkTimeService;
use shared_backend::BackendClient;
use shared_utils::test_utils::MockBackendResponses;

const DOCTOR_ID: &str = "6f2d9a51-0000-4000-8000-00000000abcd";
const DOCTOR_NAME: &str = "Sarah Hale";
const TOKEN: &str = "test-bearer-token";

fn service_for(server: &MockServer) -> WorkTimeService {
    WorkTimeService::with_client(Arc::new(BackendClient::from_base_url(server.uri())))
}

fn draft(day: &str, times: &[&str]) -> WeeklyScheduleDraft {
    let mut draft = WeeklyScheduleDraft::default();
    draft
        .slots
        .insert(day.to_string(), times.iter().map(|t| t.to_string()).collect());
    draft
}

#[tokio::test]
async fn replace_schedule_deletes_existing_then_recreates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::work_time(11, DOCTOR_ID, "Monday", "08:00", "08:30"),
            MockBackendResponses::work_time(12, DOCTOR_ID, "Tuesday", "10:00", "10:30"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::work_time(20, DOCTOR_ID, "Wednesday", "09:00", "09:30"),
        ))
        .expect(2)
        .mount(&server)
        .await;

    let saved = service_for(&server)
        .replace_schedule(
            DOCTOR_ID,
            DOCTOR_NAME,
            &draft("Wednesday", &["09:00", "09:30"]),
            TOKEN,
        )
        .await
        .unwrap();

    assert_eq!(saved, 2);
}

#[tokio::test]
async fn stale_windows_missing_on_delete_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::work_time(11, DOCTOR_ID, "Monday", "08:00", "08:30")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "gone" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/DoctorWorkTime"))
        .and(body_json(json!({
            "id": 0,
            "doctorId": DOCTOR_ID,
            "doctorName": DOCTOR_NAME,
            "day": "Friday",
            "startTime": "09:00",
            "endTime": "09:30",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::work_time(21, DOCTOR_ID, "Friday", "09:00", "09:30"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let saved = service_for(&server)
        .replace_schedule(DOCTOR_ID, DOCTOR_NAME, &draft("Friday", &["09:00"]), TOKEN)
        .await
        .unwrap();

    assert_eq!(saved, 1);
}

#[tokio::test]
async fn invalid_draft_aborts_before_any_deletion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = service_for(&server)
        .replace_schedule(DOCTOR_ID, DOCTOR_NAME, &draft("Monday", &["26:00"]), TOKEN)
        .await
        .unwrap_err();

    assert_matches!(err, ScheduleError::InvalidTime(raw) if raw == "26:00");
}

#[tokio::test]
async fn delete_slot_matches_windows_with_seconds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::work_time(5, DOCTOR_ID, "Monday", "08:00:00", "08:30:00")
        ])))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/DoctorWorkTime"))
        .and(body_json(json!({ "id": 5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    service_for(&server)
        .delete_slot(DOCTOR_ID, "Monday", SlotTime::parse("08:00").unwrap(), TOKEN)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_slot_without_matching_window_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .delete_slot(DOCTOR_ID, "Monday", SlotTime::parse("08:00").unwrap(), TOKEN)
        .await
        .unwrap_err();

    assert_matches!(err, ScheduleError::WindowNotFound { day, time } if day == "Monday" && time == "08:00");
}
