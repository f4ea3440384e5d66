//! 房源管理的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::property::*,
    models::user::roles,
    storage::is_photo_file_name,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 检查上传的文件都是照片
fn ensure_photos(photos: &[PhotoUpload]) -> Result<(), AppError> {
    if photos.iter().any(|photo| !is_photo_file_name(&photo.file_name)) {
        return Err(AppError::BadRequest(
            "An unsupported file type was detected".to_string(),
        ));
    }
    Ok(())
}

/// 新增房源（房东）
pub async fn add_property(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::LANDLORD)?;
    req.validate()?;
    ensure_photos(&req.photos)?;

    state.property_service.add(auth_context.user_id, req).await?;

    Ok(Json(json!({"message": "Added successfully!"})))
}

/// 编辑房源（房东本人）
pub async fn edit_property(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(property_id): Path<i32>,
    Json(req): Json<EditPropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::LANDLORD)?;
    req.validate()?;
    ensure_photos(&req.photos)?;

    state
        .property_service
        .edit(property_id, req, auth_context.user_id)
        .await?;

    Ok(Json(json!({"message": "Edited successfully!"})))
}

/// 按城市查询房源（租客）
pub async fn get_properties_by_city_id(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(city_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::TENANT)?;

    let views = state.property_service.get_properties_by_city_id(city_id).await?;

    Ok(Json(views))
}

/// 查询自己的房源（房东）
pub async fn get_my_properties(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::LANDLORD)?;

    let views = state
        .property_service
        .get_properties_by_landlord_id(auth_context.user_id)
        .await?;

    Ok(Json(views))
}

/// 房源详情（任意已认证用户）
pub async fn get_property_full_info(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.property_service.get_full_info_by_id(property_id).await?;

    Ok(Json(view))
}

/// 删除房源（房东本人）
pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::LANDLORD)?;

    state
        .property_service
        .delete(property_id, auth_context.user_id)
        .await?;

    Ok(Json(json!({"message": "Deleted successfully!"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_photos() {
        let ok = vec![PhotoUpload {
            file_name: "room.jpg".to_string(),
            content: String::new(),
        }];
        assert!(ensure_photos(&ok).is_ok());

        let bad = vec![
            PhotoUpload { file_name: "room.jpg".to_string(), content: String::new() },
            PhotoUpload { file_name: "contract.pdf".to_string(), content: String::new() },
        ];
        assert!(ensure_photos(&bad).is_err());
    }
}
