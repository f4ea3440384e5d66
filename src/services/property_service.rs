//! 房源服务：创建、编辑、查询、删除

use crate::{
    error::AppError,
    models::property::{
        CreatePropertyRequest, EditPropertyRequest, Photo, PhotoView, PropertyDetailView,
        PropertyStatus, PropertyView,
    },
    repository::{
        city_repo::CityRepository, photo_repo::PhotoRepository,
        property_repo::PropertyRepository, user_repo::UserRepository,
    },
    storage::FileStorage,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct PropertyService {
    db: PgPool,
    storage: Arc<FileStorage>,
}

impl PropertyService {
    pub fn new(db: PgPool, storage: Arc<FileStorage>) -> Self {
        Self { db, storage }
    }

    /// 创建房源并上传照片
    pub async fn add(
        &self,
        landlord_id: Uuid,
        req: CreatePropertyRequest,
    ) -> Result<(), AppError> {
        let city_repo = CityRepository::new(self.db.clone());
        if city_repo.find(req.city_id).await?.is_none() {
            return Err(AppError::NotFound("City not found.".to_string()));
        }

        let property_repo = PropertyRepository::new(self.db.clone());
        let property = property_repo
            .create(landlord_id, req.city_id, &req.address, &req.description, req.price)
            .await?;

        if !req.photos.is_empty() {
            let file_ids = self.storage.store_files(&req.photos).await?;

            let photos: Vec<Photo> = file_ids
                .into_iter()
                .map(|id| Photo { id, property_id: property.id })
                .collect();

            let photo_repo = PhotoRepository::new(self.db.clone());
            photo_repo.add_range(&photos).await?;
        }

        tracing::info!(property_id = property.id, landlord_id = %landlord_id, "Property added");
        Ok(())
    }

    /// 编辑房源（仅限房东本人），可增删照片
    pub async fn edit(
        &self,
        property_id: i32,
        req: EditPropertyRequest,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        let property_repo = PropertyRepository::new(self.db.clone());
        let property = property_repo
            .find(property_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found.".to_string()))?;

        if property.landlord_id != user_id {
            return Err(AppError::Forbidden(
                "Access denied. You do not have permission to edit this property.".to_string(),
            ));
        }

        if let Some(city_id) = req.city_id {
            let city_repo = CityRepository::new(self.db.clone());
            if city_repo.find(city_id).await?.is_none() {
                return Err(AppError::NotFound("City not found.".to_string()));
            }
        }

        let photo_repo = PhotoRepository::new(self.db.clone());

        // 先校验待删除的照片，避免字段更新后中途失败
        let photos_to_delete = if req.photo_ids_to_delete.is_empty() {
            vec![]
        } else {
            let photos = photo_repo.find_by_ids(&req.photo_ids_to_delete).await?;
            if photos.len() != req.photo_ids_to_delete.len()
                || photos.iter().any(|p| p.property_id != property.id)
            {
                return Err(AppError::NotFound("Photo not found.".to_string()));
            }
            photos
        };

        property_repo.update(property_id, &req).await?;

        if !photos_to_delete.is_empty() {
            let ids: Vec<String> = photos_to_delete.iter().map(|p| p.id.clone()).collect();
            photo_repo.delete_by_ids(&ids).await?;
            self.storage.delete_files(&ids).await?;
        }

        if !req.photos.is_empty() {
            let file_ids = self.storage.store_files(&req.photos).await?;

            let photos: Vec<Photo> = file_ids
                .into_iter()
                .map(|id| Photo { id, property_id: property.id })
                .collect();

            photo_repo.add_range(&photos).await?;
        }

        tracing::info!(property_id, "Property edited");
        Ok(())
    }

    /// 按城市查询房源
    pub async fn get_properties_by_city_id(
        &self,
        city_id: i32,
    ) -> Result<Vec<PropertyView>, AppError> {
        let city_repo = CityRepository::new(self.db.clone());
        if city_repo.find(city_id).await?.is_none() {
            return Err(AppError::NotFound("City not found.".to_string()));
        }

        let property_repo = PropertyRepository::new(self.db.clone());
        let rows = property_repo.list_by_city(city_id).await?;

        Ok(rows.into_iter().map(|row| self.to_view(row)).collect())
    }

    /// 查询房东自己的房源
    pub async fn get_properties_by_landlord_id(
        &self,
        landlord_id: Uuid,
    ) -> Result<Vec<PropertyView>, AppError> {
        let user_repo = UserRepository::new(self.db.clone());
        if user_repo.find_by_id(&landlord_id).await?.is_none() {
            return Err(AppError::NotFound("User not found.".to_string()));
        }

        let property_repo = PropertyRepository::new(self.db.clone());
        let rows = property_repo.list_by_landlord(landlord_id).await?;

        Ok(rows.into_iter().map(|row| self.to_view(row)).collect())
    }

    /// 房源详情（含全部照片）
    pub async fn get_full_info_by_id(
        &self,
        property_id: i32,
    ) -> Result<PropertyDetailView, AppError> {
        let property_repo = PropertyRepository::new(self.db.clone());
        let property = property_repo
            .find(property_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found.".to_string()))?;

        let city_repo = CityRepository::new(self.db.clone());
        let city = city_repo
            .find(property.city_id)
            .await?
            .ok_or_else(|| AppError::NotFound("City not found.".to_string()))?;

        let photo_repo = PhotoRepository::new(self.db.clone());
        let photos = photo_repo
            .find_by_property(property.id)
            .await?
            .into_iter()
            .map(|photo| PhotoView {
                url: self.storage.public_url(&photo.id),
                id: photo.id,
            })
            .collect();

        Ok(PropertyDetailView {
            id: property.id,
            city_id: property.city_id,
            city_name: city.name,
            address: property.address,
            description: property.description,
            price: property.price,
            status: PropertyStatus::from(property.status),
            photos,
        })
    }

    /// 删除房源（仅限房东本人），连同照片文件
    pub async fn delete(&self, property_id: i32, user_id: Uuid) -> Result<(), AppError> {
        let property_repo = PropertyRepository::new(self.db.clone());
        let property = property_repo
            .find(property_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found.".to_string()))?;

        if property.landlord_id != user_id {
            return Err(AppError::Forbidden(
                "Access denied. You do not have permission to delete this property.".to_string(),
            ));
        }

        let photo_repo = PhotoRepository::new(self.db.clone());
        let photo_ids: Vec<String> = photo_repo
            .find_by_property(property.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        // 照片行随房源级联删除，文件在行删除之后清理
        property_repo.delete(property_id).await?;
        self.storage.delete_files(&photo_ids).await?;

        tracing::info!(property_id, "Property deleted");
        Ok(())
    }

    fn to_view(&self, row: crate::repository::property_repo::PropertyListRow) -> PropertyView {
        PropertyView {
            id: row.property.id,
            city_name: row.city_name,
            address: row.property.address,
            price: row.property.price,
            photo_url: row.first_photo_id.map(|id| self.storage.public_url(&id)),
        }
    }
}
