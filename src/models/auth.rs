//! Authentication-related models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::user::roles;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "User Name is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,

    #[validate(custom(function = "validate_role"))]
    pub role: String,
}

/// Role must be one of the two known role names
fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role == roles::LANDLORD || role == roles::TENANT {
        Ok(())
    } else {
        Err(ValidationError::new("role")
            .with_message("Role must be either 'Tenant' or 'Landlord'".into()))
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token refresh request: the (possibly expired) access token plus the
/// opaque refresh token issued with it
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokensRequest {
    #[validate(length(min = 1))]
    pub access_token: String,

    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// One half of a token pair as exposed to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenView {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// The access/refresh pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: TokenView,
    pub refresh: TokenView,
}
