use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use shared_backend::BackendError;
use shared_models::error::AppError;

// ==============================================================================
// TIME-OF-DAY
// ==============================================================================

/// A slot's time of day as minutes since midnight.
///
/// The backend transports times as "HH:MM" (sometimes "HH:MM:SS", sometimes
/// without the leading zero). Comparing the parsed integer makes interval
/// membership independent of string padding; both interval bounds are
/// inclusive, so a slot equal to a window's end time is still bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime {
    minutes: u16,
}

impl SlotTime {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: hour * 60 + minute,
            })
        } else {
            None
        }
    }

    /// Accepts "08:00", "8:00" and "08:00:00".
    pub fn parse(raw: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()?;
        Self::from_hm(time.hour() as u16, time.minute() as u16)
    }

    pub fn minutes_from_midnight(&self) -> u16 {
        self.minutes
    }

    pub fn plus_minutes(self, delta: u16) -> Option<Self> {
        let minutes = self.minutes + delta;
        if minutes < 24 * 60 {
            Some(Self { minutes })
        } else {
            None
        }
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.minutes / 60), u32::from(self.minutes % 60), 0)
            .unwrap_or_default()
    }
}

impl FromStr for SlotTime {
    type Err = ScheduleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| ScheduleError::InvalidTime(raw.to_string()))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

// ==============================================================================
// WIRE MODELS
// ==============================================================================

/// One contiguous availability window a doctor declared for a weekday.
/// Several windows per weekday are allowed; non-overlap is by convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimeWindow {
    pub id: i64,
    pub doctor_id: String,
    pub doctor_name: Option<String>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// A confirmed booking on a doctor's calendar, as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    pub id: i64,
    pub doctor_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub day_of_week: String,
    pub time: String,
}

/// The calling patient's own upcoming appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAppointment {
    pub id: i64,
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub day_of_week: String,
    pub time: String,
}

/// Body of `POST /api/Appointment`. The backend assigns the real id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub id: i64,
    pub doctor_id: String,
    pub day_of_week: String,
    pub time: String,
}

/// Body of `POST /api/DoctorWorkTime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkTimeWindow {
    pub id: i64,
    pub doctor_id: String,
    pub doctor_name: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

// ==============================================================================
// DERIVED CALENDAR VALUES
// ==============================================================================

/// One entry of the rolling 7-day window. Recomputed on every request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// Short upper-case label, e.g. "MON".
    pub day: String,
    /// Day of month.
    pub date: u32,
    /// Full weekday name, e.g. "Monday" — the key used against work times.
    pub full_name: String,
    /// ISO calendar date.
    pub full_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Unavailable,
    Available,
    Booked,
}

/// Countdown to the next occurrence of a weekly appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Countdown {
    Upcoming { days: i64, hours: i64, minutes: i64 },
    Passed,
}

// ==============================================================================
// BOOKING FLOW STATE
// ==============================================================================

/// The two per-doctor stores the reconciler runs against.
#[derive(Debug, Clone, Default)]
pub struct DoctorSchedule {
    pub work_times: Vec<WorkTimeWindow>,
    pub booked: Vec<BookedSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSelection {
    pub day: Option<CalendarDay>,
    pub time: Option<String>,
}

impl SlotSelection {
    pub fn clear(&mut self) {
        self.day = None;
        self.time = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(String),
    Conflict,
}

/// Returned after a successful submission, carrying the re-fetched
/// authoritative state so callers never render from stale stores.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    pub doctor_id: String,
    pub day_of_week: String,
    pub time: String,
    pub work_times: Vec<WorkTimeWindow>,
    pub booked: Vec<BookedSlot>,
    pub my_appointment: Option<PatientAppointment>,
}

/// A doctor's full weekly draft: weekday full name to selected start times.
/// Saving replaces the stored schedule with one 30-minute window per entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyScheduleDraft {
    pub slots: std::collections::BTreeMap<String, Vec<String>>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("unknown weekday: {0}")]
    UnknownDay(String),

    #[error("no work-time window found for {day} at {time}")]
    WindowNotFound { day: String, time: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidTime(_) | ScheduleError::UnknownDay(_) => {
                AppError::ValidationError(err.to_string())
            }
            ScheduleError::WindowNotFound { .. } => AppError::NotFound(err.to_string()),
            ScheduleError::Backend(inner) => inner.into(),
        }
    }
}

/// Booking failures, ordered the way the submitter checks them. The local
/// `SlotTaken` pre-check is advisory; `Conflict` is the server's verdict.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("please choose a day and a time slot")]
    SelectionIncomplete,

    #[error("cannot book an appointment in the past")]
    TimeInPast,

    #[error("doctor information is invalid")]
    InvalidDoctor,

    #[error("please log in before booking an appointment")]
    NotAuthenticated,

    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("the selected time is outside the doctor's working hours")]
    OutsideWorkingHours,

    #[error("this slot is already booked, please pick another")]
    SlotTaken,

    #[error("booking requires explicit confirmation")]
    ConfirmationRequired,

    #[error("another booking attempt is still in flight")]
    SubmissionInFlight,

    #[error("session expired, please log in again")]
    SessionExpired,

    #[error("this slot was just booked by someone else, please pick another")]
    Conflict,

    #[error("booking failed: {0}")]
    Backend(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotAuthenticated | BookingError::SessionExpired => {
                AppError::Auth(err.to_string())
            }
            BookingError::Conflict => AppError::Conflict(err.to_string()),
            BookingError::Backend(msg) => AppError::ExternalService(msg),
            BookingError::SubmissionInFlight => AppError::BadRequest(err.to_string()),
            _ => AppError::ValidationError(err.to_string()),
        }
    }
}
