use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::models::{
    BookedSlot, BookingError, BookingState, CalendarDay, DoctorSchedule, WorkTimeWindow,
};
use schedule_cell::services::booking::BookingService;
use shared_backend::BackendClient;
use shared_utils::test_utils::MockBackendResponses;

const DOCTOR_ID: &str = "6f2d9a51-0000-4000-8000-00000000abcd";
const TOKEN: &str = "test-bearer-token";

fn service_for(server: &MockServer) -> BookingService {
    BookingService::with_client(Arc::new(BackendClient::from_base_url(server.uri())))
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 9)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// A Monday comfortably in the future relative to `now()`.
fn future_monday() -> CalendarDay {
    CalendarDay {
        day: "MON".to_string(),
        date: 7,
        full_name: "Monday".to_string(),
        full_date: NaiveDate::from_ymd_opt(2030, 1, 7).unwrap(),
    }
}

fn past_monday() -> CalendarDay {
    CalendarDay {
        day: "MON".to_string(),
        date: 2,
        full_name: "Monday".to_string(),
        full_date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
    }
}

fn window(start: &str, end: &str) -> WorkTimeWindow {
    WorkTimeWindow {
        id: 1,
        doctor_id: DOCTOR_ID.to_string(),
        doctor_name: Some("Sarah Hale".to_string()),
        day: "Monday".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn booked(time: &str) -> BookedSlot {
    BookedSlot {
        id: 77,
        doctor_id: DOCTOR_ID.to_string(),
        patient_id: Some("someone-else".to_string()),
        day_of_week: "Monday".to_string(),
        time: time.to_string(),
    }
}

fn working_schedule() -> DoctorSchedule {
    DoctorSchedule {
        work_times: vec![window("08:00", "12:00")],
        booked: vec![],
    }
}

// ==============================================================================
// VALIDATION LADDER — nothing below may touch the network
// ==============================================================================

#[tokio::test]
async fn incomplete_selection_fails_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    // no time selected

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::SelectionIncomplete);
    assert_matches!(flow.state(), BookingState::Failed(_));
}

#[tokio::test]
async fn selecting_a_day_resets_the_time() {
    let server = MockServer::start().await;
    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());

    flow.select_day(future_monday());
    flow.select_time("09:00");
    flow.select_day(future_monday());

    assert!(flow.selection().time.is_none());
}

#[tokio::test]
async fn past_slot_is_rejected() {
    let server = MockServer::start().await;
    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(past_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::TimeInPast);
}

#[tokio::test]
async fn missing_doctor_is_rejected() {
    let server = MockServer::start().await;
    let mut flow = service_for(&server).begin("", working_schedule());
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::InvalidDoctor);
}

#[tokio::test]
async fn missing_token_is_rejected_before_availability_checks() {
    let server = MockServer::start().await;
    // Empty schedule: if working-hours ran first this would fail differently.
    let mut flow = service_for(&server).begin(DOCTOR_ID, DoctorSchedule::default());
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(None, now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::NotAuthenticated);
}

#[tokio::test]
async fn slot_outside_working_hours_is_rejected() {
    let server = MockServer::start().await;
    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    flow.select_time("13:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::OutsideWorkingHours);
}

// ==============================================================================
// SCENARIO C — locally booked slot never reaches the wire
// ==============================================================================

#[tokio::test]
async fn locally_booked_slot_is_rejected_without_a_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let schedule = DoctorSchedule {
        work_times: vec![window("08:00", "12:00")],
        booked: vec![booked("09:00")],
    };
    let mut flow = service_for(&server).begin(DOCTOR_ID, schedule);
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::SlotTaken);
}

#[tokio::test]
async fn unconfirmed_booking_stays_off_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), false).await.unwrap_err();
    assert_matches!(err, BookingError::ConfirmationRequired);
    assert_eq!(*flow.state(), BookingState::Idle);
}

// ==============================================================================
// SCENARIO D — exact payload, then both stores refresh and selection clears
// ==============================================================================

#[tokio::test]
async fn successful_booking_posts_exact_payload_and_mirrors_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .and(body_json(json!({
            "id": 0,
            "doctorId": DOCTOR_ID,
            "dayOfWeek": "Monday",
            "time": "09:30",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::booked_slot(201, DOCTOR_ID, "Monday", "09:30"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::work_time(1, DOCTOR_ID, "Monday", "08:00", "12:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/Appointment/GetDoctorAppointment"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booked_slot(201, DOCTOR_ID, "Monday", "09:30")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/Appointment/GetPatientAppointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::patient_appointment(201, DOCTOR_ID, "Monday", "09:30"),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    flow.select_time("9:30"); // unpadded on purpose; the wire gets "09:30"

    let outcome = flow.submit(Some(TOKEN), now(), true).await.unwrap();

    assert_eq!(outcome.day_of_week, "Monday");
    assert_eq!(outcome.time, "09:30");
    assert_eq!(outcome.booked.len(), 1);
    assert_eq!(outcome.booked[0].time, "09:30");
    assert!(outcome.my_appointment.is_some());

    assert_eq!(*flow.state(), BookingState::Succeeded);
    assert!(flow.selection().day.is_none());
    assert!(flow.selection().time.is_none());
}

// ==============================================================================
// SCENARIO E — 409 refreshes the booked store only
// ==============================================================================

#[tokio::test]
async fn conflict_refreshes_booked_store_and_leaves_work_times_alone() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "message": "Appointment already booked" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/Appointment/GetDoctorAppointment"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booked_slot(300, DOCTOR_ID, "Monday", "09:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // The work-time store must not be re-fetched on conflict.
    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::Conflict);
    assert_eq!(*flow.state(), BookingState::Conflict);

    // The stale store now mirrors the server's verdict.
    assert_eq!(flow.schedule().booked.len(), 1);
    assert_eq!(flow.schedule().booked[0].time, "09:00");
    assert_eq!(flow.schedule().work_times.len(), 1);
}

#[tokio::test]
async fn expired_session_is_reported_as_such() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "token expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::SessionExpired);
}

#[tokio::test]
async fn other_backend_failures_surface_the_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/Appointment"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database offline" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = service_for(&server).begin(DOCTOR_ID, working_schedule());
    flow.select_day(future_monday());
    flow.select_time("09:00");

    let err = flow.submit(Some(TOKEN), now(), true).await.unwrap_err();
    assert_matches!(err, BookingError::Backend(msg) if msg.contains("database offline"));
}

// ==============================================================================
// STORE LOADING
// ==============================================================================

#[tokio::test]
async fn doctor_schedule_loads_both_stores() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/DoctorWorkTime"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::work_time(1, DOCTOR_ID, "Monday", "08:00", "12:00"),
            MockBackendResponses::work_time(2, DOCTOR_ID, "Wednesday", "14:00", "16:00"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/Appointment/GetDoctorAppointment"))
        .and(query_param("DoctorId", DOCTOR_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::booked_slot(300, DOCTOR_ID, "Monday", "09:00")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let schedule = service_for(&server)
        .doctor_schedule(DOCTOR_ID, TOKEN)
        .await
        .unwrap();

    assert_eq!(schedule.work_times.len(), 2);
    assert_eq!(schedule.booked.len(), 1);
}

#[tokio::test]
async fn my_appointment_peek_tolerates_null() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/Appointment/GetPatientAppointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let mine = service_for(&server).my_appointment(TOKEN).await.unwrap();
    assert!(mine.is_none());
}
