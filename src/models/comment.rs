//! Comment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A tenant's comment on a property they rented
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i32,
    pub tenant_id: Uuid,
    pub property_id: i32,
    pub message: String,
    pub rate: i16,
    pub created_at: DateTime<Utc>,
}

/// Add comment request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    pub property_id: i32,

    #[validate(length(min = 1, max = 400))]
    pub message: String,

    /// 1 (worst) to 5 (best)
    #[validate(range(min = 1, max = 5))]
    pub rate: i16,
}

/// Comment view with the author's username
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: i32,
    pub username: String,
    pub message: String,
    pub rate: i16,
}
