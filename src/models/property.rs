//! Property domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Property listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: i32,
    pub landlord_id: Uuid,
    pub city_id: i32,
    pub address: String,
    pub description: String,
    pub price: i32,
    pub status: String, // available, rented
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Property status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Rented,
}

impl From<String> for PropertyStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "rented" => PropertyStatus::Rented,
            _ => PropertyStatus::Available,
        }
    }
}

impl From<PropertyStatus> for String {
    fn from(status: PropertyStatus) -> Self {
        match status {
            PropertyStatus::Available => "available".to_string(),
            PropertyStatus::Rented => "rented".to_string(),
        }
    }
}

/// Photo row; the id doubles as the storage file id
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: String,
    pub property_id: i32,
}

/// A photo file sent by the client, content base64-encoded
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content: String,
}

/// Create property request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    pub city_id: i32,

    #[validate(length(min = 1, max = 100))]
    pub address: String,

    #[validate(length(min = 1, max = 500))]
    pub description: String,

    #[validate(range(min = 1))]
    pub price: i32,

    #[serde(default)]
    pub photos: Vec<PhotoUpload>,
}

/// Edit property request (partial update)
#[derive(Debug, Deserialize, Validate)]
pub struct EditPropertyRequest {
    pub city_id: Option<i32>,

    #[validate(length(min = 1, max = 100))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,

    #[validate(range(min = 1))]
    pub price: Option<i32>,

    pub status: Option<PropertyStatus>,

    #[serde(default)]
    pub photo_ids_to_delete: Vec<String>,

    #[serde(default)]
    pub photos: Vec<PhotoUpload>,
}

/// Listing row view: enough to render a search result card
#[derive(Debug, Serialize)]
pub struct PropertyView {
    pub id: i32,
    pub city_name: String,
    pub address: String,
    pub price: i32,
    pub photo_url: Option<String>,
}

/// Photo view with a resolvable URL
#[derive(Debug, Serialize)]
pub struct PhotoView {
    pub id: String,
    pub url: String,
}

/// Full property details
#[derive(Debug, Serialize)]
pub struct PropertyDetailView {
    pub id: i32,
    pub city_id: i32,
    pub city_name: String,
    pub address: String,
    pub description: String,
    pub price: i32,
    pub status: PropertyStatus,
    pub photos: Vec<PhotoView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_status_round_trip() {
        assert_eq!(PropertyStatus::from("available".to_string()), PropertyStatus::Available);
        assert_eq!(PropertyStatus::from("rented".to_string()), PropertyStatus::Rented);
        // 未知状态回退为 available
        assert_eq!(PropertyStatus::from("garbage".to_string()), PropertyStatus::Available);

        assert_eq!(String::from(PropertyStatus::Rented), "rented");
    }

    #[test]
    fn test_create_property_request_validation() {
        let req = CreatePropertyRequest {
            city_id: 1,
            address: "1 Main St".to_string(),
            description: "Cozy flat".to_string(),
            price: 1200,
            photos: vec![],
        };
        assert!(req.validate().is_ok());

        let req = CreatePropertyRequest {
            city_id: 1,
            address: "".to_string(),
            description: "Cozy flat".to_string(),
            price: 0,
            photos: vec![],
        };
        assert!(req.validate().is_err());
    }
}
