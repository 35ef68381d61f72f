use crate::error::{AppError, AppResult};
use crate::models::CategoryModel;
use crate::response::ApiResponse;
use crate::services::cache::CacheService;
use crate::services::category::CategoryService;
use axum::{extract::Path, http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn make_category_service(db: DatabaseConnection, cache: Option<CacheService>) -> CategoryService {
    let service = CategoryService::new(db);
    match cache {
        Some(cache) => service.with_cache(cache),
        None => service,
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryModel>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
) -> AppResult<impl IntoResponse> {
    let service = make_category_service(db, cache.map(|c| c.0));
    let categories = service.list().await?;
    Ok(ApiResponse::ok(categories))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryModel),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn get_category(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = CategoryService::new(db);
    let category = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    security(("jwt_token" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryModel),
        (status = 400, description = "Validation error or duplicate name", body = AppError),
    ),
    tag = "categories"
)]
pub async fn create_category(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Category name is required".to_string()))?;
    let description = payload
        .description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Category description is required".to_string()))?;

    if name.len() < 3 || name.len() > 50 {
        return Err(AppError::Validation(
            "Category name must be 3-50 characters".to_string(),
        ));
    }
    if description.len() > 255 {
        return Err(AppError::Validation(
            "Category description must be at most 255 characters".to_string(),
        ));
    }

    let service = make_category_service(db, cache.map(|c| c.0));
    let category = service.create(&name, &description).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryModel),
        (status = 400, description = "Duplicate name", body = AppError),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn update_category(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let service = make_category_service(db, cache.map(|c| c.0));
    let category = service.update(id, payload.name, payload.description).await?;
    Ok(ApiResponse::ok(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category soft-deleted", body = CategoryModel),
        (status = 404, description = "Category not found", body = AppError),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    Extension(db): Extension<DatabaseConnection>,
    cache: Option<Extension<CacheService>>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = make_category_service(db, cache.map(|c| c.0));
    let category = service.soft_delete(id).await?;
    Ok(ApiResponse::ok(category))
}
