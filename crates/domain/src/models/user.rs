//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dashboard account, optionally bound to a Telegram chat identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub telegram_id: Option<i64>,
    #[serde(skip_serializing)]
    pub linking_token: Option<String>,
    #[serde(skip_serializing)]
    pub linking_token_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown to the user in bot replies: username if set, else email.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }

    pub fn is_telegram_linked(&self) -> bool {
        self.telegram_id.is_some()
    }
}

/// Public profile returned by `GET /users/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub telegram_id: Option<i64>,
    pub telegram_linked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            telegram_linked: user.is_telegram_linked(),
            id: user.id,
            email: user.email,
            username: user.username,
            telegram_id: user.telegram_id,
            created_at: user.created_at,
        }
    }
}
