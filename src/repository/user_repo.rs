//! User repository (数据库访问层)

use crate::{error::AppError, models::auth::RegisterRequest, models::user::User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户（大小写不敏感）
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 创建用户，初始无会话（refresh_token 为 NULL）
    pub async fn create(
        &self,
        req: &RegisterRequest,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, phone, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(password_hash)
        .bind(vec![req.role.clone()])
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 存储刷新令牌（登录时的无条件覆盖）
    pub async fn set_refresh_token(
        &self,
        id: Uuid,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET
                refresh_token = $2,
                refresh_token_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 轮换刷新令牌：仅当存储的令牌仍是调用者出示的那一个时才写入。
    /// 并发刷新中输掉的一方会得到 rows_affected = 0。
    pub async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                refresh_token = $3,
                refresh_token_expires_at = $4,
                updated_at = NOW()
            WHERE id = $1 AND refresh_token = $2
            "#,
        )
        .bind(id)
        .bind(current_token)
        .bind(new_token)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 清除刷新令牌（登出）。对已无会话的账户重复执行仍然成功。
    pub async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET
                refresh_token = NULL,
                refresh_token_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
