use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn account_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/register/doctor", post(handlers::register_doctor))
        .route("/register/patient", post(handlers::register_patient))
        .route("/users/{user_id}", get(handlers::get_user))
        .route("/doctors", get(handlers::get_all_doctors))
        .with_state(state)
}
