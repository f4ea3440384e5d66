//! JWT 认证中间件

use crate::{auth::jwt::JwtService, error::AppError, models::user::roles};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthContext {
    /// 要求调用者持有指定角色
    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.roles.iter().any(|r| r == role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Access denied. This operation requires the {} role.",
                role
            )))
        }
    }

    pub fn is_landlord(&self) -> bool {
        self.roles.iter().any(|r| r == roles::LANDLORD)
    }

    pub fn is_tenant(&self) -> bool {
        self.roles.iter().any(|r| r == roles::TENANT)
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .ok_or(AppError::Unauthorized)
}

/// JWT 认证中间件 - 必须认证
///
/// 这里只接受 verify_live 通过的令牌：过期令牌一律 401，
/// 宽松校验仅存在于刷新流程内部。
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Authorization 头提取令牌
    let token = extract_token(req.headers())?;

    // 验证令牌
    let claims = jwt_service.verify_live(&token)?;

    // 创建认证上下文
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
    let auth_context =
        AuthContext { user_id, username: claims.username, roles: claims.roles };

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        let token = extract_token(&headers).unwrap();
        assert_eq!(token, "test_token_123");
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn test_extract_token_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "InvalidFormat".parse().unwrap());

        assert!(extract_token(&headers).is_err());
    }

    #[test]
    fn test_require_role() {
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
            username: "testuser".to_string(),
            roles: vec![roles::TENANT.to_string()],
        };

        assert!(ctx.require_role(roles::TENANT).is_ok());
        assert!(ctx.require_role(roles::LANDLORD).is_err());
        assert!(ctx.is_tenant());
        assert!(!ctx.is_landlord());
    }
}
