//! HTTP 中间件与应用状态
//! 请求追踪、指标记录

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::JwtService,
    config::AppConfig,
    error::AppError,
    services::{AuthService, CityService, CommentService, PropertyService, ResponseService},
    storage::FileStorage,
};

/// 应用状态
///
/// 服务使用 Arc 包装，多个请求共享同一实例，Clone 成本低廉。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub storage: Arc<FileStorage>,
    pub auth_service: Arc<AuthService>,
    pub city_service: Arc<CityService>,
    pub property_service: Arc<PropertyService>,
    pub response_service: Arc<ResponseService>,
    pub comment_service: Arc<CommentService>,
}

impl AppState {
    /// 构建全部服务
    ///
    /// 签名密钥与令牌有效期在这里注入各服务，之后只读。
    pub fn build(config: AppConfig, db: PgPool) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config)?);
        let storage = Arc::new(FileStorage::from_config(&config));
        let shared_config = Arc::new(config.clone());

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                db.clone(),
                jwt_service.clone(),
                shared_config,
            )),
            city_service: Arc::new(CityService::new(db.clone())),
            property_service: Arc::new(PropertyService::new(db.clone(), storage.clone())),
            response_service: Arc::new(ResponseService::new(db.clone())),
            comment_service: Arc::new(CommentService::new(db.clone())),
            jwt_service,
            storage,
            config,
            db,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    // 生成或提取 trace_id/request_id
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().to_string();

    // 创建 span
    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        // 记录指标 - 标签使用静态字符串
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            409 => "409",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        // 记录日志
        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中添加 trace_id
        let mut response = response;
        if let Ok(value) = trace_id.parse() {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_or_generate_trace_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace-id", "test-trace-123".parse().unwrap());

        let trace_id = extract_or_generate_trace_id(&headers);
        assert_eq!(trace_id, "test-trace-123");

        let headers = HeaderMap::new();
        let trace_id = extract_or_generate_trace_id(&headers);
        assert!(!trace_id.is_empty());
        assert_ne!(trace_id, "test-trace-123");
    }
}
