//! City repository (数据库访问层)

use crate::{error::AppError, models::city::City};
use sqlx::PgPool;

pub struct CityRepository {
    db: PgPool,
}

impl CityRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找城市
    pub async fn find(&self, id: i32) -> Result<Option<City>, AppError> {
        let city = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(city)
    }

    /// 列出所有城市
    pub async fn list(&self) -> Result<Vec<City>, AppError> {
        let cities = sqlx::query_as::<_, City>("SELECT * FROM cities ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(cities)
    }
}
