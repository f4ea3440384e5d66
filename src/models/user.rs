//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role names carried in the access token claims
pub mod roles {
    pub const LANDLORD: &str = "Landlord";
    pub const TENANT: &str = "Tenant";
}

/// User account
///
/// `refresh_token` is the whole session state: NULL means no session,
/// a value with a future expiry means an active session. There is at
/// most one live refresh token per account; login and refresh overwrite
/// it, logout clears it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub roles: Vec<String>,

    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// True while the stored refresh token exists and has not expired
    pub fn has_active_session(&self, now: DateTime<Utc>) -> bool {
        match (&self.refresh_token, self.refresh_token_expires_at) {
            (Some(_), Some(expires_at)) => expires_at > now,
            _ => false,
        }
    }
}

/// User response (without sensitive data)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            roles: user.roles,
            created_at: user.created_at,
        }
    }
}
