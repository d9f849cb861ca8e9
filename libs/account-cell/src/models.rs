use serde::{Deserialize, Serialize};

use shared_backend::BackendError;
use shared_models::auth::{Session, UserProfile};
use shared_models::error::AppError;

/// The duplicate-email sentinel the backend returns verbatim.
pub const EMAIL_IN_USE_MESSAGE: &str = "Email Is Already in Used";

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account payload returned by login and both registration endpoints:
/// the profile plus the freshly minted bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: String,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub token: String,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        let user = UserProfile {
            id: self.id,
            user_name: self.user_name,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            photo_url: self.photo_url,
            website_url: None,
            department_id: None,
            about: None,
            appointment_fee: None,
        };
        Session::hydrate(self.token, user)
    }
}

#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fields collected by the registration forms. Doctors additionally carry a
/// department; everything optional mirrors what the original forms sent
/// only when filled in.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub user_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub department_id: Option<i32>,
    pub about: Option<String>,
    pub website_url: Option<String>,
    pub photo: Option<PhotoUpload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub token: String,
    pub user: UserProfile,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("This email is already registered")]
    EmailInUse,

    #[error("registration rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidCredentials(msg) => AppError::Auth(msg),
            AccountError::EmailInUse => {
                AppError::Conflict("This email is already registered".to_string())
            }
            AccountError::Rejected(msg) => AppError::ValidationError(msg),
            AccountError::Backend(inner) => inner.into(),
        }
    }
}
