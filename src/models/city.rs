//! City catalog models

use serde::{Deserialize, Serialize};

/// City row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: i32,
    pub name: String,
}

/// City view
#[derive(Debug, Serialize)]
pub struct CityView {
    pub id: i32,
    pub name: String,
}

impl From<City> for CityView {
    fn from(city: City) -> Self {
        Self { id: city.id, name: city.name }
    }
}
