use axum::Json;
use utoipa::OpenApi;

use crate::errors::{ErrorCode, ErrorResponse};
use crate::models::{CreateItemRequest, Item, PageInfo};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Global Errors API",
        version = "0.1.0",
        description = "Demo service for the global error envelope. Every failed request is answered with a single JSON ErrorResponse carrying a stable error code.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::list_items,
        crate::api::handlers::get_item,
        crate::api::handlers::create_item,
    ),
    components(
        schemas(
            ErrorCode,
            ErrorResponse,
            PageInfo,
            Item,
            CreateItemRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Paged item catalog"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
