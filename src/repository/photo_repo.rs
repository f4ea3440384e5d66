//! Photo repository (数据库访问层)

use crate::{error::AppError, models::property::Photo};
use sqlx::PgPool;

pub struct PhotoRepository {
    db: PgPool,
}

impl PhotoRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 批量登记照片
    pub async fn add_range(&self, photos: &[Photo]) -> Result<(), AppError> {
        for photo in photos {
            sqlx::query("INSERT INTO photos (id, property_id) VALUES ($1, $2)")
                .bind(&photo.id)
                .bind(photo.property_id)
                .execute(&self.db)
                .await?;
        }

        Ok(())
    }

    /// 根据 ID 集合查找照片
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Photo>, AppError> {
        let photos = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.db)
            .await?;

        Ok(photos)
    }

    /// 列出某房源的全部照片
    pub async fn find_by_property(&self, property_id: i32) -> Result<Vec<Photo>, AppError> {
        let photos = sqlx::query_as::<_, Photo>(
            "SELECT * FROM photos WHERE property_id = $1 ORDER BY id",
        )
        .bind(property_id)
        .fetch_all(&self.db)
        .await?;

        Ok(photos)
    }

    /// 批量删除照片记录
    pub async fn delete_by_ids(&self, ids: &[String]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM photos WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
