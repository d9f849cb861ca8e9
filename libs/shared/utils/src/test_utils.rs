use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Session, UserProfile};

pub struct TestConfig {
    pub backend_url: String,
    pub chat_hub_url: String,
    pub ai_inference_url: String,
    pub video_broker_url: String,
    pub video_broker_app_id: String,
    pub video_broker_api_token: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            chat_hub_url: "/chatHub".to_string(),
            ai_inference_url: "http://localhost:7860/predict".to_string(),
            video_broker_url: "http://localhost:8787/v1".to_string(),
            video_broker_app_id: "test-app".to_string(),
            video_broker_api_token: "test-broker-token".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_backend_url(url: impl Into<String>) -> Self {
        Self {
            backend_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            backend_base_url: self.backend_url.clone(),
            chat_hub_url: self.chat_hub_url.clone(),
            ai_inference_url: self.ai_inference_url.clone(),
            video_broker_base_url: self.video_broker_url.clone(),
            video_broker_app_id: self.video_broker_app_id.clone(),
            video_broker_api_token: self.video_broker_api_token.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl TestUser {
    pub fn doctor(email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: "Doctor".to_string(),
        }
    }

    pub fn patient(email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: "Patient".to_string(),
        }
    }

    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            user_name: Some(self.email.clone()),
            first_name: Some("Test".to_string()),
            last_name: Some(self.role.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            photo_url: None,
            website_url: None,
            department_id: None,
            about: None,
            appointment_fee: None,
        }
    }

    pub fn to_session(&self, token: &str) -> Session {
        Session::hydrate(token.to_string(), self.to_profile())
    }
}

/// Canned backend payloads, shaped like the wire format the portal backend
/// actually emits (camelCase, GUID-string ids).
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn doctor_response(id: &str, email: &str, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "userName": email,
            "firstName": first_name,
            "lastName": last_name,
            "email": email,
            "role": "Doctor",
            "photoURL": null,
            "departmentId": 2
        })
    }

    pub fn login_response(user: &TestUser, token: &str) -> Value {
        json!({
            "id": user.id,
            "userName": user.email,
            "firstName": "Test",
            "lastName": user.role,
            "email": user.email,
            "role": user.role,
            "photoURL": null,
            "token": token
        })
    }

    pub fn work_time(id: i64, doctor_id: &str, day: &str, start: &str, end: &str) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "doctorName": "Test Doctor",
            "day": day,
            "startTime": start,
            "endTime": end
        })
    }

    pub fn booked_slot(id: i64, doctor_id: &str, day_of_week: &str, time: &str) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "patientId": Uuid::new_v4().to_string(),
            "dayOfWeek": day_of_week,
            "time": time
        })
    }

    pub fn patient_appointment(id: i64, doctor_id: &str, day_of_week: &str, time: &str) -> Value {
        json!({
            "id": id,
            "doctorId": doctor_id,
            "doctorName": "Test Doctor",
            "dayOfWeek": day_of_week,
            "time": time
        })
    }

    pub fn chat_message(id: i64, sender_id: &str, receiver_id: &str, message: &str) -> Value {
        json!({
            "id": id,
            "senderId": sender_id,
            "senderName": "Sender",
            "receiverId": receiver_id,
            "receiverName": "Receiver",
            "message": message,
            "timestamp": "2026-02-10T09:30:00Z"
        })
    }
}
