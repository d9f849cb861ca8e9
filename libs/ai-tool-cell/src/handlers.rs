use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ClassificationView, ClassifierError};
use crate::services::classifier::ClassifierService;

/// Accepts one multipart image field named `file` and relays it to the
/// external classifier.
pub async fn classify_image(
    State(state): State<Arc<AppConfig>>,
    mut multipart: Multipart,
) -> Result<Json<ClassificationView>, AppError> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        upload = Some((file_name, content_type, bytes.to_vec()));
    }

    let (file_name, content_type, bytes) =
        upload.ok_or(ClassifierError::EmptyUpload).map_err(AppError::from)?;

    let service = ClassifierService::new(&state)?;
    let classification = service.classify(&file_name, &content_type, bytes).await?;

    Ok(Json(classification.into()))
}
