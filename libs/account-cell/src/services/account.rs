use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;
use shared_models::auth::{Session, UserProfile};

use crate::models::{
    AccountError, AuthResponse, RegistrationForm, EMAIL_IN_USE_MESSAGE,
};

/// Login, registration and directory lookups. Token issuance itself belongs
/// to the backend; this service only hydrates a [`Session`] from what the
/// backend hands back.
pub struct AccountService {
    backend: Arc<BackendClient>,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: Arc::new(BackendClient::new(config)),
        }
    }

    pub fn with_client(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AccountError> {
        debug!("Logging in: {}", email);

        let response: AuthResponse = self
            .backend
            .request(
                Method::POST,
                "/api/Account/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await
            .map_err(|err| match err {
                BackendError::Unauthorized(msg) => AccountError::InvalidCredentials(msg),
                other => AccountError::Backend(other),
            })?;

        info!("Login succeeded for {}", email);
        Ok(response.into_session())
    }

    pub async fn register_doctor(&self, form: RegistrationForm) -> Result<Session, AccountError> {
        self.register("/api/Account/DoctorRegister", form).await
    }

    pub async fn register_patient(&self, form: RegistrationForm) -> Result<Session, AccountError> {
        self.register("/api/Account/PatientRegister", form).await
    }

    /// Registration is multipart so the photo can ride along with the form
    /// fields.
    async fn register(&self, path: &str, form: RegistrationForm) -> Result<Session, AccountError> {
        debug!("Registering account: {}", form.email);

        let multipart = build_registration_form(form)?;
        let response: AuthResponse = self
            .backend
            .post_multipart(path, None, multipart)
            .await
            .map_err(map_registration_error)?;

        info!("Registration succeeded for {}", response.id);
        Ok(response.into_session())
    }

    pub async fn user_by_id(
        &self,
        user_id: &str,
        auth_token: &str,
    ) -> Result<UserProfile, AccountError> {
        let path = format!("/api/Account/GetUserById?userId={}", user_id);
        let profile = self
            .backend
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;
        Ok(profile)
    }

    /// The public doctor directory; the only unauthenticated read.
    pub async fn all_doctors(&self) -> Result<Vec<UserProfile>, AccountError> {
        let doctors = self
            .backend
            .request(Method::GET, "/api/Account/GetAllDoctors", None, None)
            .await?;
        Ok(doctors)
    }
}

fn build_registration_form(form: RegistrationForm) -> Result<Form, AccountError> {
    let mut multipart = Form::new()
        .text("firstName", form.first_name)
        .text("lastName", form.last_name)
        .text("email", form.email)
        .text("password", form.password);

    if let Some(user_name) = form.user_name {
        multipart = multipart.text("userName", user_name);
    }
    if let Some(phone_number) = form.phone_number {
        multipart = multipart.text("phoneNumber", phone_number);
    }
    if let Some(gender) = form.gender {
        multipart = multipart.text("gender", gender);
    }
    if let Some(birth_date) = form.birth_date {
        multipart = multipart.text("birthDate", birth_date);
    }
    if let Some(department_id) = form.department_id {
        multipart = multipart.text("departmentId", department_id.to_string());
    }
    if let Some(about) = form.about {
        multipart = multipart.text("about", about);
    }
    if let Some(website_url) = form.website_url {
        multipart = multipart.text("websiteURL", website_url);
    }
    if let Some(photo) = form.photo {
        let part = Part::bytes(photo.bytes)
            .file_name(photo.file_name)
            .mime_str(&photo.content_type)
            .map_err(BackendError::from)?;
        multipart = multipart.part("Photo", part);
    }

    Ok(multipart)
}

/// Registration failures carry their reason in the response body; the
/// duplicate-email sentinel gets its own variant so callers can treat it as
/// a conflict rather than a generic rejection.
fn map_registration_error(err: BackendError) -> AccountError {
    match err {
        BackendError::BadRequest(msg) | BackendError::Conflict(msg) => {
            if msg == EMAIL_IN_USE_MESSAGE {
                AccountError::EmailInUse
            } else {
                AccountError::Rejected(msg)
            }
        }
        other => AccountError::Backend(other),
    }
}
