//! 认证相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState, models::auth::*,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    state.auth_service.register(req).await?;

    Ok(Json(json!({"message": "User created successfully!"})))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth_service.login(req).await?;

    Ok(Json(tokens))
}

/// 刷新令牌
pub async fn refresh_tokens(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshTokensRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|_| AppError::InvalidToken)?;

    let tokens = state.auth_service.refresh_tokens(req).await?;

    Ok(Json(tokens))
}

/// 登出
///
/// 用户名取自已通过认证中间件的访问令牌，而不是请求体。
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&auth_context.username).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// 获取当前用户信息
pub async fn get_current_user(auth_context: AuthContext) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "id": auth_context.user_id,
        "username": auth_context.username,
        "roles": auth_context.roles,
    })))
}
