//! 租房业务流程集成测试
//!
//! 房源 CRUD、申请处理、评论权限

use rent_system::{
    error::AppError,
    models::comment::AddCommentRequest,
    models::property::{CreatePropertyRequest, EditPropertyRequest},
    models::response::{AddResponseRequest, ProcessResponseRequest, ResponseStatus},
    models::user::roles,
    services::{CityService, CommentService, PropertyService, ResponseService},
    storage::FileStorage,
};
use std::sync::Arc;

mod common;
use common::{
    create_auth_service, create_test_city, create_test_config, create_test_property,
    register_test_user, setup_test_db,
};

fn property_service(pool: &sqlx::PgPool) -> PropertyService {
    let config = create_test_config();
    PropertyService::new(pool.clone(), Arc::new(FileStorage::from_config(&config)))
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_city_listing() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_city(&pool, "Lviv").await;
    create_test_city(&pool, "Kyiv").await;

    let city_service = CityService::new(pool.clone());
    let cities = city_service.get_all_cities().await.unwrap();

    assert_eq!(cities.len(), 2);
    // 按名称排序
    assert_eq!(cities[0].name, "Kyiv");
    assert_eq!(cities[1].name, "Lviv");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_add_property_requires_existing_city() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let auth_service = create_auth_service(&pool, &config);

    let landlord_id =
        register_test_user(&auth_service, &pool, "landlord", "Pw!23456", roles::LANDLORD).await;

    let service = property_service(&pool);
    let result = service
        .add(
            landlord_id,
            CreatePropertyRequest {
                city_id: 9999,
                address: "1 Main St".to_string(),
                description: "Nice flat".to_string(),
                price: 1200,
                photos: vec![],
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_property_lifecycle() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let auth_service = create_auth_service(&pool, &config);

    let landlord_id =
        register_test_user(&auth_service, &pool, "landlord", "Pw!23456", roles::LANDLORD).await;
    let city_id = create_test_city(&pool, "Lviv").await;

    let service = property_service(&pool);
    service
        .add(
            landlord_id,
            CreatePropertyRequest {
                city_id,
                address: "1 Main St".to_string(),
                description: "Nice flat".to_string(),
                price: 1200,
                photos: vec![],
            },
        )
        .await
        .unwrap();

    // 城市查询能看到新房源
    let views = service.get_properties_by_city_id(city_id).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].city_name, "Lviv");
    assert_eq!(views[0].price, 1200);
    let property_id = views[0].id;

    // 房东自己的列表
    let mine = service.get_properties_by_landlord_id(landlord_id).await.unwrap();
    assert_eq!(mine.len(), 1);

    // 详情
    let detail = service.get_full_info_by_id(property_id).await.unwrap();
    assert_eq!(detail.address, "1 Main St");
    assert_eq!(detail.city_name, "Lviv");

    // 编辑
    service
        .edit(
            property_id,
            EditPropertyRequest {
                city_id: None,
                address: None,
                description: None,
                price: Some(1500),
                status: None,
                photo_ids_to_delete: vec![],
                photos: vec![],
            },
            landlord_id,
        )
        .await
        .unwrap();

    let detail = service.get_full_info_by_id(property_id).await.unwrap();
    assert_eq!(detail.price, 1500);
    // 未提供的字段保持不变
    assert_eq!(detail.address, "1 Main St");

    // 删除后详情不可见
    service.delete(property_id, landlord_id).await.unwrap();
    let result = service.get_full_info_by_id(property_id).await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_property_edit_and_delete_are_owner_only() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let auth_service = create_auth_service(&pool, &config);

    let owner_id =
        register_test_user(&auth_service, &pool, "owner", "Pw!23456", roles::LANDLORD).await;
    let other_id =
        register_test_user(&auth_service, &pool, "other", "Pw!23456", roles::LANDLORD).await;
    let city_id = create_test_city(&pool, "Lviv").await;
    let property_id = create_test_property(&pool, owner_id, city_id).await;

    let service = property_service(&pool);

    let edit = EditPropertyRequest {
        city_id: None,
        address: None,
        description: None,
        price: Some(9999),
        status: None,
        photo_ids_to_delete: vec![],
        photos: vec![],
    };

    let result = service.edit(property_id, edit, other_id).await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    let result = service.delete(property_id, other_id).await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    // 房东本人可以删除
    service.delete(property_id, owner_id).await.unwrap();
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_response_flow_and_landlord_visibility() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let auth_service = create_auth_service(&pool, &config);

    let landlord_id =
        register_test_user(&auth_service, &pool, "landlord", "Pw!23456", roles::LANDLORD).await;
    let other_landlord =
        register_test_user(&auth_service, &pool, "other", "Pw!23456", roles::LANDLORD).await;
    let tenant_id =
        register_test_user(&auth_service, &pool, "tenant", "Pw!23456", roles::TENANT).await;
    let city_id = create_test_city(&pool, "Lviv").await;
    let property_id = create_test_property(&pool, landlord_id, city_id).await;

    let response_service = ResponseService::new(pool.clone());

    // 租客申请
    response_service
        .add(
            tenant_id,
            AddResponseRequest {
                property_id,
                message: "I would like to rent this".to_string(),
            },
        )
        .await
        .unwrap();

    // 对不存在的房源申请
    let result = response_service
        .add(tenant_id, AddResponseRequest { property_id: 9999, message: "hi".to_string() })
        .await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));

    // 房东看到申请及租客联系方式
    let views = response_service
        .get_all_responses_by_property_id(property_id, landlord_id)
        .await
        .unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].email, "tenant@example.com");
    assert_eq!(views[0].status, "not_reviewed");

    // 其他房东无权查看
    let result = response_service
        .get_all_responses_by_property_id(property_id, other_landlord)
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    // 处理申请：仅限房源的房东
    let response_id = views[0].id;
    let result = response_service
        .process(
            other_landlord,
            ProcessResponseRequest { response_id, status: ResponseStatus::ApprovedToRent },
        )
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    response_service
        .process(
            landlord_id,
            ProcessResponseRequest { response_id, status: ResponseStatus::ApprovedToRent },
        )
        .await
        .unwrap();

    let views = response_service
        .get_all_responses_by_property_id(property_id, landlord_id)
        .await
        .unwrap();
    assert_eq!(views[0].status, "approved_to_rent");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_comment_requires_approved_to_rent() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let auth_service = create_auth_service(&pool, &config);

    let landlord_id =
        register_test_user(&auth_service, &pool, "landlord", "Pw!23456", roles::LANDLORD).await;
    let tenant_id =
        register_test_user(&auth_service, &pool, "tenant", "Pw!23456", roles::TENANT).await;
    let stranger_id =
        register_test_user(&auth_service, &pool, "stranger", "Pw!23456", roles::TENANT).await;
    let city_id = create_test_city(&pool, "Lviv").await;
    let property_id = create_test_property(&pool, landlord_id, city_id).await;

    let response_service = ResponseService::new(pool.clone());
    let comment_service = CommentService::new(pool.clone());

    // 没有任何申请的租客不能评论
    let result = comment_service
        .add(
            stranger_id,
            AddCommentRequest { property_id, message: "Nice!".to_string(), rate: 5 },
        )
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    // 有申请但尚未批准，同样不能评论
    response_service
        .add(tenant_id, AddResponseRequest { property_id, message: "rent me".to_string() })
        .await
        .unwrap();

    let result = comment_service
        .add(
            tenant_id,
            AddCommentRequest { property_id, message: "Nice!".to_string(), rate: 5 },
        )
        .await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    // 批准到 approved_to_rent 后可以评论
    let views = response_service
        .get_all_responses_by_property_id(property_id, landlord_id)
        .await
        .unwrap();
    response_service
        .process(
            landlord_id,
            ProcessResponseRequest {
                response_id: views[0].id,
                status: ResponseStatus::ApprovedToRent,
            },
        )
        .await
        .unwrap();

    comment_service
        .add(
            tenant_id,
            AddCommentRequest { property_id, message: "Great landlord".to_string(), rate: 5 },
        )
        .await
        .unwrap();

    let comments = comment_service.get_comments_by_property_id(property_id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].username, "tenant");
    assert_eq!(comments[0].rate, 5);

    // 只有作者能删除
    let comment_id = comments[0].id;
    let result = comment_service.delete(comment_id, stranger_id).await;
    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));

    comment_service.delete(comment_id, tenant_id).await.unwrap();
    let comments = comment_service.get_comments_by_property_id(property_id).await.unwrap();
    assert!(comments.is_empty());
}
