use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use super::extract::ValidatedJson;
use crate::catalog::ItemCatalog;
use crate::config::PaginationConfig;
use crate::errors::{ErrorCode, Failure, GlobalException};
use crate::models::{ApiResponse, CreateItemRequest, Item, PageResponse};
use crate::utils;

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub catalog: ItemCatalog,
    pub pagination: PaginationConfig,
    pub instance_id: String,
}

/// Pagination query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page number (default: 0)
    pub page: Option<i32>,
    /// Number of items per page (default: 20, capped at the configured maximum)
    pub size: Option<i32>,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "global-errors",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "items": state.catalog.len().await,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// List items page by page
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "items",
    params(PageParams),
    responses(
        (status = 200, description = "One page of items", body = serde_json::Value),
        (status = 400, description = "Invalid paging arguments", body = ErrorResponse)
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<ApiResponse<PageResponse<Item>>>, Failure> {
    let Query(params) = params.map_err(|rejection| {
        GlobalException::with_message(ErrorCode::BadRequest, rejection.body_text())
    })?;

    let page = params.page.unwrap_or(0);
    let size = params
        .size
        .unwrap_or(state.pagination.default_page_size)
        .min(state.pagination.max_page_size);

    let result = state.catalog.page(page, size).await?;
    info!(
        page,
        size,
        returned = result.content().len(),
        total = result.page_info().total_elements(),
        "Listed items"
    );

    Ok(Json(ApiResponse::success(result)))
}

/// Get one item by id
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    tag = "items",
    params(
        ("id" = String, Path, description = "Item UUID")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Item>>, Failure> {
    let Path(id) = id.map_err(|rejection| {
        GlobalException::with_message(ErrorCode::BadRequest, rejection.body_text())
    })?;
    if !utils::uuid::is_valid(Some(&id)) {
        return Err(GlobalException::with_message(
            ErrorCode::InvalidInputValue,
            format!("'{}' is not a valid item id", id),
        )
        .into());
    }
    let id = Uuid::parse_str(&id)?;

    let item = state.catalog.find(id).await.ok_or_else(|| {
        GlobalException::with_message(
            ErrorCode::ResourceNotFound,
            format!("Item not found: {}", id),
        )
    })?;

    Ok(Json(ApiResponse::success(item)))
}

/// Create an item
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateItemRequest>,
) -> Result<impl IntoResponse, Failure> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(GlobalException::with_message(
            ErrorCode::InvalidInputValue,
            "name must not be blank",
        )
        .into());
    }

    let item = state.catalog.insert(name).await?;
    info!(id = %item.id, name = %item.name, "Created item");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(item, "Item created")),
    ))
}

/// Fallback for unknown routes
pub async fn not_found() -> Failure {
    GlobalException::new(ErrorCode::ResourceNotFound).into()
}
