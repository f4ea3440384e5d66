//! Property repository (数据库访问层)

use crate::{
    error::AppError,
    models::property::{EditPropertyRequest, Property},
};
use sqlx::PgPool;
use uuid::Uuid;

/// 列表查询行：房源 + 城市名 + 首张照片
#[derive(Debug, sqlx::FromRow)]
pub struct PropertyListRow {
    #[sqlx(flatten)]
    pub property: Property,
    pub city_name: String,
    pub first_photo_id: Option<String>,
}

pub struct PropertyRepository {
    db: PgPool,
}

impl PropertyRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找房源
    pub async fn find(&self, id: i32) -> Result<Option<Property>, AppError> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(property)
    }

    /// 创建房源，初始状态 available
    pub async fn create(
        &self,
        landlord_id: Uuid,
        city_id: i32,
        address: &str,
        description: &str,
        price: i32,
    ) -> Result<Property, AppError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (landlord_id, city_id, address, description, price, status)
            VALUES ($1, $2, $3, $4, $5, 'available')
            RETURNING *
            "#,
        )
        .bind(landlord_id)
        .bind(city_id)
        .bind(address)
        .bind(description)
        .bind(price)
        .fetch_one(&self.db)
        .await?;

        Ok(property)
    }

    /// 部分更新房源
    pub async fn update(
        &self,
        id: i32,
        req: &EditPropertyRequest,
    ) -> Result<Option<Property>, AppError> {
        let status: Option<String> = req.status.map(String::from);

        let property = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET
                city_id = COALESCE($2, city_id),
                address = COALESCE($3, address),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.city_id)
        .bind(&req.address)
        .bind(&req.description)
        .bind(req.price)
        .bind(status)
        .fetch_optional(&self.db)
        .await?;

        Ok(property)
    }

    /// 删除房源（照片行级联删除）
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按城市列出房源
    pub async fn list_by_city(&self, city_id: i32) -> Result<Vec<PropertyListRow>, AppError> {
        let rows = sqlx::query_as::<_, PropertyListRow>(
            r#"
            SELECT
                p.*,
                c.name AS city_name,
                (SELECT ph.id FROM photos ph WHERE ph.property_id = p.id ORDER BY ph.id LIMIT 1)
                    AS first_photo_id
            FROM properties p
            JOIN cities c ON c.id = p.city_id
            WHERE p.city_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(city_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// 按房东列出房源
    pub async fn list_by_landlord(
        &self,
        landlord_id: Uuid,
    ) -> Result<Vec<PropertyListRow>, AppError> {
        let rows = sqlx::query_as::<_, PropertyListRow>(
            r#"
            SELECT
                p.*,
                c.name AS city_name,
                (SELECT ph.id FROM photos ph WHERE ph.property_id = p.id ORDER BY ph.id LIMIT 1)
                    AS first_photo_id
            FROM properties p
            JOIN cities c ON c.id = p.city_id
            WHERE p.landlord_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(landlord_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
