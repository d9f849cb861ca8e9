use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;

use crate::models::{
    NewWorkTimeWindow, ScheduleError, SlotTime, WeeklyScheduleDraft, WorkTimeWindow,
};
use crate::services::calendar;

const WINDOW_LENGTH_MINUTES: u16 = 30;

/// The doctor-side schedule editor: each selected start slot becomes one
/// 30-minute work-time window, and saving replaces the stored schedule
/// wholesale (delete everything, then recreate).
pub struct WorkTimeService {
    backend: Arc<BackendClient>,
}

impl WorkTimeService {
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
        let path = format!("/api/DoctorWorkTime?DoctorId={}", doctor_id);
        let work_times = self
            .backend
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(work_times)
    }

    /// Replace the doctor's stored schedule with the draft. Existing windows
    /// are deleted first; a 404 on an individual delete means the window is
    /// already gone and is skipped, any other failure aborts the save.
    /// Returns how many windows were created.
    pub async fn replace_schedule(
        &self,
        doctor_id: &str,
        doctor_name: &str,
        draft: &WeeklyScheduleDraft,
        auth_token: &str,
    ) -> Result<usize, ScheduleError> {
        debug!("Replacing schedule for doctor: {}", doctor_id);

        let windows = build_windows(doctor_id, doctor_name, draft)?;

        let existing = self.work_times(doctor_id, auth_token).await?;
        for window in &existing {
            match self.delete_window(window.id, auth_token).await {
                Ok(()) => {}
                Err(ScheduleError::Backend(BackendError::NotFound(_))) => {
                    warn!("work-time window {} already deleted, continuing", window.id);
                }
                Err(err) => return Err(err),
            }
        }

        for window in &windows {
            self.backend
                .request::<Value>(
                    Method::POST,
                    "/api/DoctorWorkTime",
                    Some(auth_token),
                    Some(json!(window)),
                )
                .await
                .map_err(|err| {
                    warn!(
                        "failed to save window {} {}: {}",
                        window.day, window.start_time, err
                    );
                    err
                })?;
        }

        info!(
            "Saved {} work-time windows for doctor {}",
            windows.len(),
            doctor_id
        );
        Ok(windows.len())
    }

    /// Remove the single window matching (`day_name`, `start`). The backend
    /// may report stored times with seconds, so matching goes through
    /// normalized times, not raw strings.
    pub async fn delete_slot(
        &self,
        doctor_id: &str,
        day_name: &str,
        start: SlotTime,
        auth_token: &str,
    ) -> Result<(), ScheduleError> {
        let existing = self.work_times(doctor_id, auth_token).await?;

        let window = existing
            .iter()
            .find(|wt| wt.day == day_name && SlotTime::parse(&wt.start_time) == Some(start))
            .ok_or_else(|| ScheduleError::WindowNotFound {
                day: day_name.to_string(),
                time: start.to_string(),
            })?;

        self.delete_window(window.id, auth_token).await?;
        info!(
            "Deleted work-time window for doctor {} on {} at {}",
            doctor_id, day_name, start
        );
        Ok(())
    }

    async fn delete_window(&self, id: i64, auth_token: &str) -> Result<(), ScheduleError> {
        self.backend
            .request_no_content(
                Method::DELETE,
                "/api/DoctorWorkTime",
                Some(auth_token),
                Some(json!({ "id": id })),
            )
            .await?;
        Ok(())
    }
}

/// Expand a weekly draft into wire-ready windows: per weekday, start times
/// are sorted and each becomes a [start, start + 30min) window.
fn build_windows(
    doctor_id: &str,
    doctor_name: &str,
    draft: &WeeklyScheduleDraft,
) -> Result<Vec<NewWorkTimeWindow>, ScheduleError> {
    let mut windows = Vec::new();

    for (day_name, times) in &draft.slots {
        if times.is_empty() {
            continue;
        }
        if calendar::weekday_from_name(day_name).is_none() {
            return Err(ScheduleError::UnknownDay(day_name.clone()));
        }

        let mut starts = times
            .iter()
            .map(|raw| {
                SlotTime::parse(raw).ok_or_else(|| ScheduleError::InvalidTime(raw.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        starts.sort();
        starts.dedup();

        for start in starts {
            let end = start
                .plus_minutes(WINDOW_LENGTH_MINUTES)
                .ok_or_else(|| ScheduleError::InvalidTime(start.to_string()))?;

            windows.push(NewWorkTimeWindow {
                id: 0,
                doctor_id: doctor_id.to_string(),
                doctor_name: doctor_name.to_string(),
                day: day_name.clone(),
                start_time: start.to_string(),
                end_time: end.to_string(),
            });
        }
    }

    Ok(windows)
}
