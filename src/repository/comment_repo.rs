//! Comment repository (数据库访问层)

use crate::{
    error::AppError,
    models::comment::{Comment, CommentView},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentRepository {
    db: PgPool,
}

impl CommentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找评论
    pub async fn find(&self, id: i32) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(comment)
    }

    /// 创建评论
    pub async fn create(
        &self,
        tenant_id: Uuid,
        property_id: i32,
        message: &str,
        rate: i16,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (tenant_id, property_id, message, rate)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(property_id)
        .bind(message)
        .bind(rate)
        .fetch_one(&self.db)
        .await?;

        Ok(comment)
    }

    /// 列出某房源的全部评论（带作者用户名）
    pub async fn list_views_by_property(
        &self,
        property_id: i32,
    ) -> Result<Vec<CommentView>, AppError> {
        let views = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT
                c.id,
                u.username,
                c.message,
                c.rate
            FROM comments c
            JOIN users u ON u.id = c.tenant_id
            WHERE c.property_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(property_id)
        .fetch_all(&self.db)
        .await?;

        Ok(views)
    }

    /// 删除评论
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
