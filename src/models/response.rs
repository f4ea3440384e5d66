//! Rental application (response) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A tenant's response to a property listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Response {
    pub id: i32,
    pub tenant_id: Uuid,
    pub property_id: i32,
    pub message: String,
    pub status: String, // not_reviewed, approved_to_dialog, approved_to_rent, rejected
    pub created_at: DateTime<Utc>,
}

/// Response processing status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    NotReviewed,
    ApprovedToDialog,
    ApprovedToRent,
    Rejected,
}

impl From<String> for ResponseStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "approved_to_dialog" => ResponseStatus::ApprovedToDialog,
            "approved_to_rent" => ResponseStatus::ApprovedToRent,
            "rejected" => ResponseStatus::Rejected,
            _ => ResponseStatus::NotReviewed,
        }
    }
}

impl From<ResponseStatus> for String {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::NotReviewed => "not_reviewed".to_string(),
            ResponseStatus::ApprovedToDialog => "approved_to_dialog".to_string(),
            ResponseStatus::ApprovedToRent => "approved_to_rent".to_string(),
            ResponseStatus::Rejected => "rejected".to_string(),
        }
    }
}

/// Tenant-submitted response; new responses always start not_reviewed
#[derive(Debug, Deserialize, Validate)]
pub struct AddResponseRequest {
    pub property_id: i32,

    #[validate(length(min = 1, max = 400))]
    pub message: String,
}

/// Landlord's processing decision for a response
#[derive(Debug, Deserialize)]
pub struct ProcessResponseRequest {
    pub response_id: i32,
    pub status: ResponseStatus,
}

/// Response view shown to the landlord: includes the tenant's contact
/// details so the landlord can follow up outside the platform
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ResponseView {
    pub id: i32,
    pub email: String,
    pub phone_number: String,
    pub message: String,
    pub status: String,
}
