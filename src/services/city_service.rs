//! 城市目录服务

use crate::{error::AppError, models::city::CityView, repository::city_repo::CityRepository};
use sqlx::PgPool;

pub struct CityService {
    db: PgPool,
}

impl CityService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出所有城市
    pub async fn get_all_cities(&self) -> Result<Vec<CityView>, AppError> {
        let city_repo = CityRepository::new(self.db.clone());
        let cities = city_repo.list().await?;

        Ok(cities.into_iter().map(CityView::from).collect())
    }
}
