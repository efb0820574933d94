use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::handlers::error::ApiError;
use crate::handlers::extract::ValidatedJson;
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::response::{self, ApiResponse, ErrorResponse};
use crate::services::category_service::CategoryService;
use crate::validation::validate_id;

const RESOURCE_ID: &str = "category ID";

/// Handler for listing categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "All categories in the success envelope", body = [Category]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn list_categories_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = category_service.get_all().await?;
    Ok(Json(response::success(categories)))
}

/// Handler for fetching one category
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "The category in the success envelope", body = Category),
        (status = 400, description = "Invalid category ID", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn get_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = validate_id(&id, RESOURCE_ID)?;
    let category = category_service.get_by_id(id).await?;
    Ok(Json(response::success(category)))
}

/// Handler for creating a category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Name is empty or longer than 100 characters", body = ErrorResponse),
        (status = 409, description = "Category with this name already exists", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn create_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let category = category_service.create(&request.name).await?;
    Ok((StatusCode::CREATED, Json(response::created(category))))
}

/// Handler for renaming a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = Category),
        (status = 400, description = "Invalid ID or name", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Another category already has this name", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn update_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = validate_id(&id, RESOURCE_ID)?;
    let category = category_service.update(id, &request.name).await?;
    Ok(Json(response::updated(category)))
}

/// Handler for deleting a category
///
/// Transactions in the category are kept and reported under "Unknown".
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 400, description = "Invalid category ID", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    tag = "categories"
)]
pub async fn delete_category_handler(
    State(category_service): State<Arc<dyn CategoryService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id(&id, RESOURCE_ID)?;
    category_service.delete(id).await?;
    Ok(Json(response::deleted()))
}
