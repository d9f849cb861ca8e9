use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    BookedSlot, BookingOutcome, CalendarDay, Countdown, PatientAppointment, SlotStatus, SlotTime,
    WeeklyScheduleDraft, WorkTimeWindow,
};
use crate::services::{
    availability, calendar,
    booking::BookingService,
    worktime::WorkTimeService,
};

// ==============================================================================
// VIEW MODELS
// ==============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub time: String,
    pub status: SlotStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayScheduleView {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub has_work_time: bool,
    pub slots: Vec<SlotView>,
}

/// Everything the booking page needs in one response: the rolling week, the
/// raw stores, and the reconciled per-slot grid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub doctor_id: String,
    pub work_times: Vec<WorkTimeWindow>,
    pub booked: Vec<BookedSlot>,
    pub days: Vec<DayScheduleView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyAppointmentView {
    pub appointment: Option<PatientAppointment>,
    pub countdown: Option<Countdown>,
}

// ==============================================================================
// REQUEST BODIES / QUERIES
// ==============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentBody {
    pub doctor_id: String,
    pub day: Option<CalendarDay>,
    pub time: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAppointmentsQuery {
    pub patient_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimeQuery {
    pub doctor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveScheduleBody {
    pub doctor_id: String,
    pub doctor_name: String,
    #[serde(flatten)]
    pub draft: WeeklyScheduleDraft,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSlotBody {
    pub doctor_id: String,
    pub day: String,
    pub time: String,
}

// ==============================================================================
// HANDLERS — BOOKING PAGE
// ==============================================================================

/// The booking page payload: both stores fetched concurrently, then the
/// reconciler classifies every slot of the rolling week.
pub async fn get_doctor_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<ScheduleView>, AppError> {
    let service = BookingService::new(&state);
    let schedule = service.doctor_schedule(&doctor_id, auth.token()).await?;

    let days = calendar::rolling_week(Utc::now().date_naive())
        .into_iter()
        .map(|day| {
            let slots = availability::day_grid(&day, &schedule.work_times, &schedule.booked)
                .into_iter()
                .map(|(time, status)| SlotView {
                    time: time.to_string(),
                    status,
                })
                .collect();
            DayScheduleView {
                has_work_time: availability::day_has_work_time(
                    &schedule.work_times,
                    &day.full_name,
                ),
                day,
                slots,
            }
        })
        .collect();

    Ok(Json(ScheduleView {
        doctor_id,
        work_times: schedule.work_times,
        booked: schedule.booked,
        days,
    }))
}

pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Json(body): Json<BookAppointmentBody>,
) -> Result<Json<BookingOutcome>, AppError> {
    let token = auth.as_ref().map(|TypedHeader(a)| a.token());
    let service = BookingService::new(&state);

    // The stores can only be loaded with a token; without one the flow still
    // runs so the validation ladder reports failures in its documented order.
    let schedule = match token {
        Some(token) => service.doctor_schedule(&body.doctor_id, token).await?,
        None => Default::default(),
    };

    let mut flow = service.begin(body.doctor_id.clone(), schedule);
    if let Some(day) = body.day {
        flow.select_day(day);
    }
    if let Some(time) = body.time {
        flow.select_time(time);
    }

    let outcome = flow
        .submit(token, Utc::now().naive_utc(), body.confirmed)
        .await?;
    Ok(Json(outcome))
}

pub async fn get_my_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<MyAppointmentView>, AppError> {
    let service = BookingService::new(&state);
    let appointment = service.my_appointment(auth.token()).await?;

    let countdown = appointment.as_ref().and_then(|appt| {
        let time = SlotTime::parse(&appt.time)?;
        calendar::time_remaining(Utc::now().naive_utc(), &appt.day_of_week, time)
    });

    Ok(Json(MyAppointmentView {
        appointment,
        countdown,
    }))
}

pub async fn get_patient_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<PatientAppointmentsQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<PatientAppointment>>, AppError> {
    let service = BookingService::new(&state);
    let appointments = service
        .patient_appointments(&query.patient_id, auth.token())
        .await?;
    Ok(Json(appointments))
}

// ==============================================================================
// HANDLERS — DOCTOR SCHEDULE EDITOR
// ==============================================================================

pub async fn get_work_times(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<WorkTimeQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<WorkTimeWindow>>, AppError> {
    let service = WorkTimeService::new(&state);
    let work_times = service.work_times(&query.doctor_id, auth.token()).await?;
    Ok(Json(work_times))
}

pub async fn save_schedule(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(body): Json<SaveScheduleBody>,
) -> Result<Json<Value>, AppError> {
    let service = WorkTimeService::new(&state);
    let saved = service
        .replace_schedule(&body.doctor_id, &body.doctor_name, &body.draft, auth.token())
        .await?;

    Ok(Json(json!({
        "saved": saved,
        "message": "Work schedule saved successfully"
    })))
}

pub async fn delete_work_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(body): Json<DeleteSlotBody>,
) -> Result<Json<Value>, AppError> {
    let start = SlotTime::parse(&body.time)
        .ok_or_else(|| AppError::ValidationError(format!("invalid time of day: {}", body.time)))?;

    let service = WorkTimeService::new(&state);
    service
        .delete_slot(&body.doctor_id, &body.day, start, auth.token())
        .await?;

    Ok(Json(json!({ "deleted": true })))
}
