//! 照片文件存储
//! 本地磁盘后端：按生成的 ID 存放文件，通过配置的公共 URL 对外暴露

use crate::{config::AppConfig, error::AppError, models::property::PhotoUpload};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::PathBuf;
use uuid::Uuid;

/// 允许上传的照片扩展名
const PHOTO_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// 判断文件名是否是支持的照片类型
pub fn is_photo_file_name(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| PHOTO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 文件存储服务
pub struct FileStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl FileStorage {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_path: PathBuf::from(&config.storage.base_path),
            public_base_url: config.storage.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 保存一批照片，返回生成的文件 ID
    pub async fn store_files(&self, files: &[PhotoUpload]) -> Result<Vec<String>, AppError> {
        tokio::fs::create_dir_all(&self.base_path).await.map_err(|e| {
            tracing::error!("Failed to create storage directory: {}", e);
            AppError::Internal(format!("Failed to create storage directory: {}", e))
        })?;

        let mut ids = Vec::with_capacity(files.len());

        for file in files {
            let bytes = BASE64.decode(&file.content).map_err(|_| {
                AppError::BadRequest(format!("Photo '{}' is not valid base64", file.file_name))
            })?;

            let id = Uuid::new_v4().to_string();
            let path = self.base_path.join(&id);

            tokio::fs::write(&path, &bytes).await.map_err(|e| {
                tracing::error!(photo_id = %id, "Failed to write photo: {}", e);
                AppError::Internal(format!("Failed to store photo: {}", e))
            })?;

            tracing::debug!(photo_id = %id, size = bytes.len(), "Photo stored");
            ids.push(id);
        }

        Ok(ids)
    }

    /// 删除一批照片文件。文件缺失不视为错误。
    pub async fn delete_files(&self, ids: &[String]) -> Result<(), AppError> {
        for id in ids {
            // ID 由本服务生成，形如 UUID；拒绝任何可疑路径成分
            if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(AppError::BadRequest("Invalid photo id".to_string()));
            }

            let path = self.base_path.join(id);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(photo_id = %id, "Photo deleted"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(photo_id = %id, "Photo file already gone");
                }
                Err(e) => {
                    tracing::error!(photo_id = %id, "Failed to delete photo: {}", e);
                    return Err(AppError::Internal(format!("Failed to delete photo: {}", e)));
                }
            }
        }

        Ok(())
    }

    /// 照片的对外访问 URL
    pub fn public_url(&self, id: &str) -> String {
        format!("{}/{}", self.public_base_url, id)
    }
}
