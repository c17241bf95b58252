//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::category_handler;
use crate::domain::CategoryResponse;

/// OpenAPI documentation for the Resource Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resource Catalog API",
        version = "0.1.0",
        description = "Hierarchical category catalog with pluggable persistence backends",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
        (url = "https://api.example.com", description = "Production server")
    ),
    paths(
        category_handler::create_category,
        category_handler::list_categories,
        category_handler::get_category_tree,
        category_handler::get_category,
        category_handler::get_category_by_code,
        category_handler::update_category,
        category_handler::delete_category,
    ),
    components(
        schemas(
            CategoryResponse,
            category_handler::CreateCategoryRequest,
            category_handler::UpdateCategoryRequest,
        )
    ),
    tags(
        (name = "Categories", description = "Hierarchical category catalog operations")
    )
)]
pub struct ApiDoc;
