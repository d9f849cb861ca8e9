use serde::{Deserialize, Serialize};

/// Profile shape returned by the backend's account endpoints. Ids are the
/// opaque identity strings the backend mints; they are never parsed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub user_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(rename = "websiteURL")]
    pub website_url: Option<String>,
    pub department_id: Option<i32>,
    pub about: Option<String>,
    pub appointment_fee: Option<f64>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn is_doctor(&self) -> bool {
        self.role.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("doctor"))
    }
}

/// The authenticated session: bearer token plus the profile it belongs to.
///
/// Replaces the browser-local-storage pair the original portal kept. The
/// lifecycle is explicit: `hydrate` after a successful login/registration,
/// drop (or `clear` a stored slot) on logout or when the backend answers 401.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

impl Session {
    pub fn hydrate(token: String, user: UserProfile) -> Self {
        Self { token, user }
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }

    pub fn clear(slot: &mut Option<Session>) {
        *slot = None;
    }
}
