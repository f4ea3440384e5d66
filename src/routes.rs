//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::AppState;

/// 请求体上限：照片以 base64 随请求体提交
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需已有令牌）
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh_tokens));

    // 公开的只读业务端点
    let open_routes =
        Router::new().route("/api/v1/cities", get(handlers::city::get_all_cities));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        // 会话
        .route("/api/v1/auth/me", get(handlers::auth::get_current_user))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))

        // 房源
        .route("/api/v1/properties", post(handlers::property::add_property))
        .route("/api/v1/properties/mine", get(handlers::property::get_my_properties))
        .route(
            "/api/v1/properties/{property_id}",
            get(handlers::property::get_property_full_info)
                .patch(handlers::property::edit_property)
                .delete(handlers::property::delete_property),
        )
        .route(
            "/api/v1/properties/{property_id}/responses",
            get(handlers::response::get_responses_by_property_id),
        )
        .route(
            "/api/v1/properties/{property_id}/comments",
            get(handlers::comment::get_comments_by_property_id),
        )
        .route(
            "/api/v1/properties/city/{city_id}",
            get(handlers::property::get_properties_by_city_id),
        )

        // 申请
        .route("/api/v1/responses", post(handlers::response::add_response))
        .route("/api/v1/responses/process", patch(handlers::response::process_response))

        // 评论
        .route("/api/v1/comments", post(handlers::comment::add_comment))
        .route("/api/v1/comments/{comment_id}", delete(handlers::comment::delete_comment))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(open_routes)
        .merge(authenticated_routes)
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
