use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// Failure modes of a backend round-trip, keyed by the status codes the
/// portal reacts to. 409 is the authoritative double-booking signal; 401
/// means the caller's session is no longer valid.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("authentication required: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("backend error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized(msg) | BackendError::Forbidden(msg) => AppError::Auth(msg),
            BackendError::NotFound(msg) => AppError::NotFound(msg),
            BackendError::Conflict(msg) => AppError::Conflict(msg),
            BackendError::BadRequest(msg) => AppError::BadRequest(msg),
            BackendError::Upstream { status, message } => {
                AppError::ExternalService(format!("backend returned {}: {}", status, message))
            }
            BackendError::Transport(e) => AppError::ExternalService(e.to_string()),
        }
    }
}

/// Typed client for the remote portal backend. Every cell talks to the
/// backend through this one client so bearer-token injection and the
/// status-to-error mapping live in a single place.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::from_base_url(config.backend_base_url.clone())
    }

    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, auth_token, body).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Variant for endpoints that answer with an empty body (deletes).
    pub async fn request_no_content(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(), BackendError> {
        self.send(method, path, auth_token, body).await?;
        Ok(())
    }

    /// Multipart POST, used by the registration endpoints (photo upload).
    pub async fn post_multipart<T>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        form: reqwest::multipart::Form,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making multipart request to {}", url);

        let mut req = self.client.post(&url).multipart(form);
        if let Some(token) = auth_token {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = req.send().await?;
        let response = Self::check_status(response).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<reqwest::Response, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token);

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;
        Self::check_status(response).await
    }

    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        error!("Backend error ({}): {}", status, error_text);
        let message = extract_message(&error_text);

        Err(match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized(message),
            StatusCode::FORBIDDEN => BackendError::Forbidden(message),
            StatusCode::NOT_FOUND => BackendError::NotFound(message),
            StatusCode::CONFLICT => BackendError::Conflict(message),
            StatusCode::BAD_REQUEST => BackendError::BadRequest(message),
            _ => BackendError::Upstream {
                status: status.as_u16(),
                message,
            },
        })
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// The backend reports failures either as `{"message": ...}` or as a
/// model-state `{"errors": ...}` payload (array, or map of field to list).
/// Flatten whichever shape arrives into one line for the caller.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(errors) = value.get("errors") {
            let collected: Vec<String> = match errors {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                Value::Object(map) => map
                    .values()
                    .flat_map(|v| match v {
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                        Value::String(s) => vec![s.clone()],
                        _ => Vec::new(),
                    })
                    .collect(),
                Value::String(s) => vec![s.clone()],
                _ => Vec::new(),
            };
            if !collected.is_empty() {
                return collected.join(", ");
            }
        }
    }

    if body.is_empty() {
        "request failed".to_string()
    } else {
        body.to_string()
    }
}
