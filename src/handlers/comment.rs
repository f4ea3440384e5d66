//! 评论的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::comment::AddCommentRequest,
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

/// 租客新增评论
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<AddCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::TENANT)?;
    req.validate()?;

    state.comment_service.add(auth_context.user_id, req).await?;

    Ok(Json(json!({"message": "Added successfully!"})))
}

/// 列出某房源的评论（任意已认证用户）
pub async fn get_comments_by_property_id(
    State(state): State<Arc<AppState>>,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let views = state
        .comment_service
        .get_comments_by_property_id(property_id)
        .await?;

    Ok(Json(views))
}

/// 删除评论（作者本人）
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(comment_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_role(roles::TENANT)?;

    state
        .comment_service
        .delete(comment_id, auth_context.user_id)
        .await?;

    Ok(Json(json!({"message": "Deleted successfully!"})))
}
