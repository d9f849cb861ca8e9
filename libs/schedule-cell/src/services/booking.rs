use std::sync::Arc;

use chrono::NaiveDateTime;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

use crate::models::{
    BookedSlot, BookingError, BookingOutcome, BookingState, CalendarDay, DoctorSchedule,
    NewAppointment, PatientAppointment, ScheduleError, SlotSelection, SlotTime, WorkTimeWindow,
};
use crate::services::availability;

/// Data access for the two per-doctor stores plus the patient's own
/// appointment view. All state is owned by the backend; this service only
/// fetches and submits.
pub struct BookingService {
    backend: Arc<BackendClient>,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: Arc::new(BackendClient::new(config)),
        }
    }

    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn work_times(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<WorkTimeWindow>, ScheduleError> {
        fetch_work_times(&self.backend, doctor_id, auth_token).await
    }

    pub async fn booked_appointments(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<Vec<BookedSlot>, ScheduleError> {
        fetch_booked(&self.backend, doctor_id, auth_token).await
    }

    /// Both stores, fetched concurrently — there is no ordering dependency
    /// between them, and the reconciler needs both before it can classify.
    pub async fn doctor_schedule(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<DoctorSchedule, ScheduleError> {
        debug!("Loading schedule for doctor: {}", doctor_id);

        let (work_times, booked) = futures::try_join!(
            fetch_work_times(&self.backend, doctor_id, auth_token),
            fetch_booked(&self.backend, doctor_id, auth_token),
        )?;

        Ok(DoctorSchedule { work_times, booked })
    }

    /// The calling patient's upcoming appointment, if any.
    pub async fn my_appointment(
        &self,
        auth_token: &str,
    ) -> Result<Option<PatientAppointment>, ScheduleError> {
        fetch_my_appointment(&self.backend, auth_token).await
    }

    pub async fn patient_appointments(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<Vec<PatientAppointment>, ScheduleError> {
        let path = format!(
            "/api/Appointment/GetPatientAppointment?PatientId={}",
            patient_id
        );
        let appointments = self
            .backend
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(appointments)
    }

    /// Start a booking flow against an already-loaded schedule.
    pub fn begin(&self, doctor_id: impl Into<String>, schedule: DoctorSchedule) -> BookingFlow {
        BookingFlow::new(Arc::clone(&self.backend), doctor_id, schedule)
    }
}

/// The booking submitter.
///
/// Drives `Idle -> Validating -> Submitting -> {Succeeded, Failed, Conflict}`
/// for one selection. The local availability pre-check is a UX short-circuit
/// only; the backend's uniqueness check (HTTP 409) is the authoritative
/// conflict resolution, and the flow mirrors backend state after every
/// mutation so the reconciler never works from stale stores.
pub struct BookingFlow {
    backend: Arc<BackendClient>,
    doctor_id: String,
    schedule: DoctorSchedule,
    my_appointment: Option<PatientAppointment>,
    selection: SlotSelection,
    state: BookingState,
}

impl BookingFlow {
    pub fn new(
        backend: Arc<BackendClient>,
        doctor_id: impl Into<String>,
        schedule: DoctorSchedule,
    ) -> Self {
        Self {
            backend,
            doctor_id: doctor_id.into(),
            schedule,
            my_appointment: None,
            selection: SlotSelection::default(),
            state: BookingState::Idle,
        }
    }

    /// Picking a day resets any previously picked time.
    pub fn select_day(&mut self, day: CalendarDay) {
        self.selection.day = Some(day);
        self.selection.time = None;
    }

    pub fn select_time(&mut self, time: impl Into<String>) {
        self.selection.time = Some(time.into());
    }

    pub fn selection(&self) -> &SlotSelection {
        &self.selection
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn schedule(&self) -> &DoctorSchedule {
        &self.schedule
    }

    pub fn my_appointment(&self) -> Option<&PatientAppointment> {
        self.my_appointment.as_ref()
    }

    /// The fail-fast validation ladder; the first failing check wins.
    fn validate(
        &self,
        auth_token: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<(CalendarDay, SlotTime), BookingError> {
        // 1. A complete selection.
        let (day, raw_time) = match (&self.selection.day, &self.selection.time) {
            (Some(day), Some(time)) => (day.clone(), time.clone()),
            _ => return Err(BookingError::SelectionIncomplete),
        };

        // 2. Not in the past relative to the caller's "now".
        let slot = SlotTime::parse(&raw_time).ok_or(BookingError::InvalidTime(raw_time))?;
        let target = day.full_date.and_time(slot.to_naive_time());
        if target < now {
            return Err(BookingError::TimeInPast);
        }

        // 3. A doctor to book against.
        if self.doctor_id.trim().is_empty() {
            return Err(BookingError::InvalidDoctor);
        }

        // 4. An authenticated session.
        if auth_token.map_or(true, |token| token.trim().is_empty()) {
            return Err(BookingError::NotAuthenticated);
        }

        // 5. Inside the doctor's declared hours for that weekday.
        if !availability::in_working_hours(&self.schedule.work_times, &day.full_name, slot) {
            return Err(BookingError::OutsideWorkingHours);
        }

        // 6. Not taken in the locally cached store (advisory; the server
        //    re-checks and may still answer 409).
        if availability::is_booked(&self.schedule.booked, &day.full_name, slot) {
            return Err(BookingError::SlotTaken);
        }

        Ok((day, slot))
    }

    /// Validate, honor the confirmation gate, submit, and reconcile.
    pub async fn submit(
        &mut self,
        auth_token: Option<&str>,
        now: NaiveDateTime,
        confirmed: bool,
    ) -> Result<BookingOutcome, BookingError> {
        if self.state == BookingState::Submitting {
            return Err(BookingError::SubmissionInFlight);
        }

        self.state = BookingState::Validating;
        let (day, slot) = match self.validate(auth_token, now) {
            Ok(validated) => validated,
            Err(err) => {
                self.state = BookingState::Failed(err.to_string());
                return Err(err);
            }
        };

        // 7. The human-in-the-loop gate: nothing reaches the wire without it.
        if !confirmed {
            self.state = BookingState::Idle;
            return Err(BookingError::ConfirmationRequired);
        }

        self.state = BookingState::Submitting;
        let token = auth_token.unwrap_or_default();
        let body = json!(NewAppointment {
            id: 0,
            doctor_id: self.doctor_id.clone(),
            day_of_week: day.full_name.clone(),
            time: slot.to_string(),
        });

        info!(
            "Booking appointment with doctor {} on {} at {}",
            self.doctor_id, day.full_name, slot
        );

        let result = self
            .backend
            .request::<Value>(Method::POST, "/api/Appointment", Some(token), Some(body))
            .await;

        match result {
            Ok(_) => {
                self.mirror_after_success(token).await;
                self.selection.clear();
                self.state = BookingState::Succeeded;
                info!(
                    "Appointment booked with doctor {} on {} at {}",
                    self.doctor_id, day.full_name, slot
                );
                Ok(BookingOutcome {
                    doctor_id: self.doctor_id.clone(),
                    day_of_week: day.full_name,
                    time: slot.to_string(),
                    work_times: self.schedule.work_times.clone(),
                    booked: self.schedule.booked.clone(),
                    my_appointment: self.my_appointment.clone(),
                })
            }
            Err(BackendError::Conflict(_)) => {
                // Someone else won the race; pull the authoritative booked
                // store so the stale slot shows as taken.
                warn!(
                    "Booking conflict for doctor {} on {} at {}",
                    self.doctor_id, day.full_name, slot
                );
                match fetch_booked(&self.backend, &self.doctor_id, token).await {
                    Ok(booked) => self.schedule.booked = booked,
                    Err(err) => warn!("failed to refresh booked appointments: {}", err),
                }
                self.state = BookingState::Conflict;
                Err(BookingError::Conflict)
            }
            Err(BackendError::Unauthorized(_)) => {
                self.state = BookingState::Failed("session expired".to_string());
                Err(BookingError::SessionExpired)
            }
            Err(err) => {
                let message = err.to_string();
                self.state = BookingState::Failed(message.clone());
                Err(BookingError::Backend(message))
            }
        }
    }

    /// After a successful POST, re-fetch everything the reconciler and the
    /// "my upcoming appointment" view depend on. The booking itself already
    /// succeeded, so a refresh failure is logged, not surfaced.
    async fn mirror_after_success(&mut self, token: &str) {
        let refreshed = futures::try_join!(
            fetch_work_times(&self.backend, &self.doctor_id, token),
            fetch_booked(&self.backend, &self.doctor_id, token),
            fetch_my_appointment(&self.backend, token),
        );

        match refreshed {
            Ok((work_times, booked, mine)) => {
                self.schedule = DoctorSchedule { work_times, booked };
                self.my_appointment = mine;
            }
            Err(err) => warn!("failed to refresh schedule after booking: {}", err),
        }
    }
}

async fn fetch_work_times(
    backend: &BackendClient,
    doctor_id: &str,
    auth_token: &str,
) -> Result<Vec<WorkTimeWindow>, ScheduleError> {
    let path = format!("/api/DoctorWorkTime?DoctorId={}", doctor_id);
    let work_times = backend
        .request(Method::GET, &path, Some(auth_token), None)
        .await?;
    Ok(work_times)
}

async fn fetch_booked(
    backend: &BackendClient,
    doctor_id: &str,
    auth_token: &str,
) -> Result<Vec<BookedSlot>, ScheduleError> {
    let path = format!("/api/Appointment/GetDoctorAppointment?DoctorId={}", doctor_id);
    let booked = backend
        .request(Method::GET, &path, Some(auth_token), None)
        .await?;
    Ok(booked)
}

async fn fetch_my_appointment(
    backend: &BackendClient,
    auth_token: &str,
) -> Result<Option<PatientAppointment>, ScheduleError> {
    let appointment = backend
        .request(
            Method::GET,
            "/api/Appointment/GetPatientAppointment",
            Some(auth_token),
            None,
        )
        .await?;
    Ok(appointment)
}
