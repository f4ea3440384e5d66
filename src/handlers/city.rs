//! 城市目录的 HTTP 处理器

use crate::{error::AppError, middleware::AppState};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 列出所有城市
pub async fn get_all_cities(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let cities = state.city_service.get_all_cities().await?;

    Ok(Json(cities))
}
