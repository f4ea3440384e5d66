//! 评论服务
//!
//! 只有拿到 approved_to_rent 申请的租客才能评论对应房源。

use crate::{
    error::AppError,
    models::comment::{AddCommentRequest, CommentView},
    models::response::ResponseStatus,
    repository::{
        comment_repo::CommentRepository, property_repo::PropertyRepository,
        response_repo::ResponseRepository,
    },
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct CommentService {
    db: PgPool,
}

impl CommentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 租客评论租过的房源
    pub async fn add(&self, tenant_id: Uuid, req: AddCommentRequest) -> Result<(), AppError> {
        let response_repo = ResponseRepository::new(self.db.clone());
        let response = response_repo
            .find_by_property_and_tenant(req.property_id, tenant_id)
            .await?;

        let approved = response
            .map(|r| ResponseStatus::from(r.status) == ResponseStatus::ApprovedToRent)
            .unwrap_or(false);

        if !approved {
            return Err(AppError::Forbidden(
                "Access denied. You do not have permission to comment this property.".to_string(),
            ));
        }

        let comment_repo = CommentRepository::new(self.db.clone());
        let comment = comment_repo
            .create(tenant_id, req.property_id, &req.message, req.rate)
            .await?;

        tracing::info!(comment_id = comment.id, property_id = req.property_id, "Comment added");
        Ok(())
    }

    /// 列出某房源的全部评论
    pub async fn get_comments_by_property_id(
        &self,
        property_id: i32,
    ) -> Result<Vec<CommentView>, AppError> {
        let property_repo = PropertyRepository::new(self.db.clone());
        if property_repo.find(property_id).await?.is_none() {
            return Err(AppError::NotFound("Property not found.".to_string()));
        }

        let comment_repo = CommentRepository::new(self.db.clone());
        comment_repo.list_views_by_property(property_id).await
    }

    /// 删除评论（仅限作者本人）
    pub async fn delete(&self, comment_id: i32, tenant_id: Uuid) -> Result<(), AppError> {
        let comment_repo = CommentRepository::new(self.db.clone());
        let comment = comment_repo
            .find(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found.".to_string()))?;

        if comment.tenant_id != tenant_id {
            return Err(AppError::Forbidden(
                "Access denied. You do not have permission to delete this comment.".to_string(),
            ));
        }

        comment_repo.delete(comment_id).await?;

        tracing::info!(comment_id, "Comment deleted");
        Ok(())
    }
}
