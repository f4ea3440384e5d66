//! 认证服务：注册、登录、令牌刷新、登出
//!
//! 会话状态完全由 users.refresh_token 表达：NULL 为无会话，
//! 未过期的值为活跃会话。每个账户同时只有一个会话。

use crate::{
    auth::jwt::JwtService,
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::auth::{LoginRequest, RefreshTokensRequest, RegisterRequest, TokenPair, TokenView},
    repository::user_repo::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_service: Arc<JwtService>, config: Arc<AppConfig>) -> Self {
        Self { db, jwt_service, config }
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        // 用户名唯一（大小写不敏感）
        if user_repo.find_by_username(&req.username).await?.is_some() {
            return Err(AppError::Conflict("User already exists!".to_string()));
        }

        // 账户创建阶段的密码策略失败保持粗粒度的 500 语义，
        // 不返回逐字段的校验错误
        if let Err(e) =
            PasswordHasher::validate_password_policy(&req.password, &self.config.security)
        {
            return Err(AppError::Internal(format!("User creation failed: {}", e)));
        }

        let hasher = PasswordHasher::new();
        let password_hash = hasher.hash(&req.password)?;

        let user = user_repo.create(&req, &password_hash).await?;

        tracing::info!(username = %user.username, role = %req.role, "User registered");
        Ok(())
    }

    /// 用户登录
    ///
    /// 未知用户名和错误密码返回同一个错误，不暴露账户是否存在。
    /// 登录总是签发并覆盖刷新令牌：同一账户先前的会话随之失效。
    pub async fn login(&self, req: LoginRequest) -> Result<TokenPair, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_username(&req.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hasher = PasswordHasher::new();
        hasher.verify(&req.password, &user.password_hash)?;

        // 生成令牌对
        let access = self.jwt_service.sign_access_token(
            &user.id.to_string(),
            &user.username,
            user.roles.clone(),
        )?;
        let (refresh_token, refresh_expires_at) = self.jwt_service.generate_refresh_token();

        // 存储刷新令牌（无条件覆盖）
        user_repo
            .set_refresh_token(user.id, &refresh_token, refresh_expires_at)
            .await?;

        tracing::info!(username = %user.username, "Login succeeded");

        Ok(TokenPair {
            access: TokenView { token: access.token, expires_at: access.expires_at },
            refresh: TokenView { token: refresh_token, expires_at: refresh_expires_at },
        })
    }

    /// 刷新令牌对
    ///
    /// 访问令牌允许已过期但签名必须有效；刷新令牌必须与存储值完全一致
    /// 且未过期。任何一步失败都返回同一个错误，不暴露是哪一半出了问题。
    /// 成功即轮换：旧刷新令牌立刻作废。
    pub async fn refresh_tokens(&self, req: RefreshTokensRequest) -> Result<TokenPair, AppError> {
        let claims = self.jwt_service.verify_for_refresh(&req.access_token)?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo
            .find_by_username(&claims.username)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // 出示的刷新令牌必须正是存储的那一个，且仍然有效。
        // 被轮换掉的旧令牌在这里失败，即重放检测。
        match (&user.refresh_token, user.refresh_token_expires_at) {
            (Some(stored), Some(expires_at))
                if *stored == req.refresh_token && expires_at > chrono::Utc::now() => {}
            _ => return Err(AppError::InvalidToken),
        }

        // 从出示令牌的声明重新签发（jti 总是新的）
        let access =
            self.jwt_service
                .sign_access_token(&claims.sub, &claims.username, claims.roles)?;
        let (new_refresh_token, refresh_expires_at) = self.jwt_service.generate_refresh_token();

        // 条件更新：并发刷新时只有一方能赢，输家拿到统一错误
        let rotated = user_repo
            .rotate_refresh_token(
                user.id,
                &req.refresh_token,
                &new_refresh_token,
                refresh_expires_at,
            )
            .await?;

        if !rotated {
            return Err(AppError::InvalidToken);
        }

        tracing::debug!(username = %claims.username, "Tokens refreshed");

        Ok(TokenPair {
            access: TokenView { token: access.token, expires_at: access.expires_at },
            refresh: TokenView { token: new_refresh_token, expires_at: refresh_expires_at },
        })
    }

    /// 登出：清除刷新令牌
    ///
    /// 幂等：对已无会话的账户重复登出仍然成功。
    pub async fn logout(&self, username: &str) -> Result<(), AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid access token".to_string()))?;

        user_repo.clear_refresh_token(user.id).await?;

        tracing::info!(username = %username, "Logged out");
        Ok(())
    }
}
