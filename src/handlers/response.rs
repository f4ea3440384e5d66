//! 租房申请的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::response::{AddResponseRequest, ProcessResponseRequest},
    models::user::roles,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 租客提交申请
pub async fn add_response(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<AddResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::TENANT)?;
    req.validate()?;

    state.response_service.add(auth_context.user_id, req).await?;

    Ok(Json(json!({"message": "Added successfully!"})))
}

/// 房东查看某房源的申请
pub async fn get_responses_by_property_id(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::LANDLORD)?;

    let views = state
        .response_service
        .get_all_responses_by_property_id(property_id, auth_context.user_id)
        .await?;

    Ok(Json(views))
}

/// 房东处理申请
pub async fn process_response(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<ProcessResponseRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::LANDLORD)?;

    state.response_service.process(auth_context.user_id, req).await?;

    Ok(Json(json!({"message": "Status updated successfully!"})))
}
