//! Category handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{ROOT_LEVEL, ROOT_PARENT_ID};
use crate::domain::{Category, CategoryNode, CategoryResponse, CategoryStatus};
use crate::errors::{AppResult, OptionExt};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// Category creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    /// Category display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Documentation")]
    pub name: String,
    /// Unique category code
    #[validate(length(min = 1, message = "Code cannot be empty"))]
    #[schema(example = "DOC")]
    pub code: String,
    /// Parent category id (0 = root)
    #[serde(default)]
    #[schema(example = 0)]
    pub parent_id: i64,
    /// Hierarchy depth hint (1 = root)
    #[serde(default = "default_level")]
    #[schema(example = 1)]
    pub level: i32,
    /// Display order among siblings
    #[serde(default)]
    pub sort: i32,
    /// Optional free-form description
    pub description: Option<String>,
    /// Status: 1 = enabled, 0 = disabled
    #[serde(default = "default_status")]
    #[schema(value_type = i16, example = 1)]
    pub status: CategoryStatus,
}

fn default_level() -> i32 {
    ROOT_LEVEL
}

fn default_status() -> CategoryStatus {
    CategoryStatus::Enabled
}

impl CreateCategoryRequest {
    fn into_category(self) -> Category {
        let now = Utc::now();
        Category {
            id: 0,
            name: self.name,
            code: self.code,
            parent_id: self.parent_id,
            level: self.level,
            sort: self.sort,
            description: self.description,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Category update request (full replace of business fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    /// Category display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Documentation")]
    pub name: String,
    /// Unique category code
    #[validate(length(min = 1, message = "Code cannot be empty"))]
    #[schema(example = "DOC")]
    pub code: String,
    /// Parent category id (0 = root)
    #[serde(default)]
    #[schema(example = 0)]
    pub parent_id: i64,
    /// Hierarchy depth hint (1 = root)
    #[serde(default = "default_level")]
    #[schema(example = 1)]
    pub level: i32,
    /// Display order among siblings
    #[serde(default)]
    pub sort: i32,
    /// Optional free-form description
    pub description: Option<String>,
    /// Status: 1 = enabled, 0 = disabled
    #[serde(default = "default_status")]
    #[schema(value_type = i16, example = 1)]
    pub status: CategoryStatus,
}

impl UpdateCategoryRequest {
    fn into_category(self, id: i64) -> Category {
        let now = Utc::now();
        Category {
            id,
            name: self.name,
            code: self.code,
            parent_id: self.parent_id,
            level: self.level,
            sort: self.sort,
            description: self.description,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/tree", get(get_category_tree))
        .route("/code/:code", get(get_category_by_code))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category code already exists")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<CategoryResponse>> {
    let category = state
        .category_service
        .create(payload.into_category())
        .await?;

    Ok(Created(CategoryResponse::from(category)))
}

/// List categories with pagination
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page number"),
        ("page_size" = Option<u64>, Query, description = "Items per page (capped)")
    ),
    responses(
        (status = 200, description = "Page of categories with unfiltered total")
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<CategoryResponse>>> {
    let page = params.page.max(1);
    let page_size = params.limit();

    let (categories, total) = state.category_service.list(page, page_size).await?;
    let data = categories.into_iter().map(CategoryResponse::from).collect();

    Ok(Json(Paginated::new(data, page, page_size, total)))
}

/// Get the category forest
#[utoipa::path(
    get,
    path = "/categories/tree",
    tag = "Categories",
    responses(
        (status = 200, description = "Enabled categories assembled into a forest")
    )
)]
pub async fn get_category_tree(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryNode>>> {
    let forest = state.category_service.get_tree().await?;
    Ok(Json(forest))
}

/// Get category by id
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.category_service.get(id).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Get category by code
#[utoipa::path(
    get,
    path = "/categories/code/{code}",
    tag = "Categories",
    params(
        ("code" = String, Path, description = "Category code")
    ),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .category_service
        .get_by_code(&code)
        .await?
        .ok_or_not_found()?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Update a category (full replace of business fields)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated successfully", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category code already exists")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state
        .category_service
        .update(payload.into_category(id))
        .await?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Delete a category without children
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted successfully"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has children")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.category_service.delete(id).await?;
    Ok(NoContent)
}
