//! 租房申请服务

use crate::{
    error::AppError,
    models::response::{AddResponseRequest, ProcessResponseRequest, ResponseView},
    repository::{property_repo::PropertyRepository, response_repo::ResponseRepository},
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ResponseService {
    db: PgPool,
}

impl ResponseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 租客提交申请
    pub async fn add(&self, tenant_id: Uuid, req: AddResponseRequest) -> Result<(), AppError> {
        let property_repo = PropertyRepository::new(self.db.clone());
        if property_repo.find(req.property_id).await?.is_none() {
            return Err(AppError::NotFound("Property not found.".to_string()));
        }

        let response_repo = ResponseRepository::new(self.db.clone());
        let response = response_repo.create(tenant_id, req.property_id, &req.message).await?;

        tracing::info!(
            response_id = response.id,
            property_id = req.property_id,
            "Response added"
        );
        Ok(())
    }

    /// 房东查看某房源的全部申请（仅限房东本人）
    pub async fn get_all_responses_by_property_id(
        &self,
        property_id: i32,
        landlord_id: Uuid,
    ) -> Result<Vec<ResponseView>, AppError> {
        let property_repo = PropertyRepository::new(self.db.clone());
        let property = property_repo
            .find(property_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found.".to_string()))?;

        if property.landlord_id != landlord_id {
            return Err(AppError::Forbidden(
                "Access denied. You do not have permission to get responses for this property."
                    .to_string(),
            ));
        }

        let response_repo = ResponseRepository::new(self.db.clone());
        response_repo.list_views_by_property(property_id).await
    }

    /// 房东处理申请（仅限该房源的房东）
    pub async fn process(
        &self,
        landlord_id: Uuid,
        req: ProcessResponseRequest,
    ) -> Result<(), AppError> {
        let response_repo = ResponseRepository::new(self.db.clone());
        let response = response_repo
            .find(req.response_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Response not found.".to_string()))?;

        let property_repo = PropertyRepository::new(self.db.clone());
        let property = property_repo
            .find(response.property_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found.".to_string()))?;

        if property.landlord_id != landlord_id {
            return Err(AppError::Forbidden(
                "Access denied. You do not have permission to process this response.".to_string(),
            ));
        }

        response_repo.update_status(response.id, req.status).await?;

        tracing::info!(response_id = response.id, status = ?req.status, "Response processed");
        Ok(())
    }
}
