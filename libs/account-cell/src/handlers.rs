use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use shared_config::AppConfig;
use shared_models::auth::UserProfile;
use shared_models::error::AppError;

use crate::models::{LoginRequest, PhotoUpload, RegistrationForm, SessionView};
use crate::services::account::AccountService;

pub async fn login(
    State(state): State<Arc<AppConfig>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionView>, AppError> {
    let service = AccountService::new(&state);
    let session = service.login(&body.email, &body.password).await?;
    Ok(Json(session.into()))
}

pub async fn register_doctor(
    State(state): State<Arc<AppConfig>>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let form = collect_registration_form(multipart).await?;
    let service = AccountService::new(&state);
    let session = service.register_doctor(form).await?;
    Ok(Json(session.into()))
}

pub async fn register_patient(
    State(state): State<Arc<AppConfig>>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let form = collect_registration_form(multipart).await?;
    let service = AccountService::new(&state);
    let session = service.register_patient(form).await?;
    Ok(Json(session.into()))
}

pub async fn get_user(
    State(state): State<Arc<AppConfig>>,
    Path(user_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<UserProfile>, AppError> {
    let service = AccountService::new(&state);
    let profile = service.user_by_id(&user_id, auth.token()).await?;
    Ok(Json(profile))
}

pub async fn get_all_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let service = AccountService::new(&state);
    let doctors = service.all_doctors().await?;
    Ok(Json(doctors))
}

/// Fold the multipart stream into a typed registration form. Field names
/// match the backend's contract; the photo arrives under "Photo".
async fn collect_registration_form(mut multipart: Multipart) -> Result<RegistrationForm, AppError> {
    let mut form = RegistrationForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name.eq_ignore_ascii_case("photo") {
            let file_name = field.file_name().unwrap_or("photo").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.photo = Some(PhotoUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match name.as_str() {
            "userName" => form.user_name = Some(value),
            "firstName" => form.first_name = value,
            "lastName" => form.last_name = value,
            "email" => form.email = value,
            "password" => form.password = value,
            "phoneNumber" => form.phone_number = Some(value),
            "gender" => form.gender = Some(value),
            "birthDate" => form.birth_date = Some(value),
            "departmentId" => {
                form.department_id = Some(value.parse().map_err(|_| {
                    AppError::ValidationError(format!("invalid department id: {}", value))
                })?)
            }
            "about" => form.about = Some(value),
            "websiteURL" => form.website_url = Some(value),
            other => {
                tracing::debug!("ignoring unknown registration field: {}", other);
            }
        }
    }

    if form.first_name.is_empty()
        || form.last_name.is_empty()
        || form.email.is_empty()
        || form.password.is_empty()
    {
        return Err(AppError::ValidationError(
            "firstName, lastName, email and password are required".to_string(),
        ));
    }

    Ok(form)
}
