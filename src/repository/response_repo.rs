//! Response repository (数据库访问层)

use crate::{
    error::AppError,
    models::response::{Response, ResponseStatus, ResponseView},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ResponseRepository {
    db: PgPool,
}

impl ResponseRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找申请
    pub async fn find(&self, id: i32) -> Result<Option<Response>, AppError> {
        let response = sqlx::query_as::<_, Response>("SELECT * FROM responses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(response)
    }

    /// 创建申请，初始状态 not_reviewed
    pub async fn create(
        &self,
        tenant_id: Uuid,
        property_id: i32,
        message: &str,
    ) -> Result<Response, AppError> {
        let response = sqlx::query_as::<_, Response>(
            r#"
            INSERT INTO responses (tenant_id, property_id, message, status)
            VALUES ($1, $2, $3, 'not_reviewed')
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(message)
        .fetch_one(&self.db)
        .await?;

        Ok(response)
    }

    /// 查找某租客对某房源的申请（评论权限检查用）
    pub async fn find_by_property_and_tenant(
        &self,
        property_id: i32,
        tenant_id: Uuid,
    ) -> Result<Option<Response>, AppError> {
        let response = sqlx::query_as::<_, Response>(
            r#"
            SELECT * FROM responses
            WHERE property_id = $1 AND tenant_id = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(property_id)
        .bind(tenant_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(response)
    }

    /// 列出某房源的全部申请（带租客联系方式）
    pub async fn list_views_by_property(
        &self,
        property_id: i32,
    ) -> Result<Vec<ResponseView>, AppError> {
        let views = sqlx::query_as::<_, ResponseView>(
            r#"
            SELECT
                r.id,
                u.email,
                u.phone AS phone_number,
                r.message,
                r.status
            FROM responses r
            JOIN users u ON u.id = r.tenant_id
            WHERE r.property_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.db)
        .await?;

        Ok(views)
    }

    /// 更新申请状态
    pub async fn update_status(
        &self,
        id: i32,
        status: ResponseStatus,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE responses SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(String::from(status))
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
