//! Business logic services layer

pub mod auth_service;
pub mod city_service;
pub mod comment_service;
pub mod property_service;
pub mod response_service;

pub use auth_service::AuthService;
pub use city_service::CityService;
pub use comment_service::CommentService;
pub use property_service::PropertyService;
pub use response_service::ResponseService;
