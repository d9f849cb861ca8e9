use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/doctors/{doctor_id}/schedule", get(handlers::get_doctor_schedule))
        .route("/appointments", post(handlers::book_appointment))
        .route("/appointments/mine", get(handlers::get_my_appointment))
        .route("/appointments/patient", get(handlers::get_patient_appointments))
        .route(
            "/worktime",
            get(handlers::get_work_times)
                .put(handlers::save_schedule)
                .delete(handlers::delete_work_slot),
        )
        .with_state(state)
}
