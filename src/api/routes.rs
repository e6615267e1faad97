use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{create_item, get_item, health, list_items, not_found, AppState};
use super::openapi::openapi_json;
use crate::errors::{handler, GlobalExceptionHandler};
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health check
        .route("/health", get(health))
        // Item catalog
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/:id", get(get_item))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
        .with_state(state);

    // Order matters: failures are rendered before metrics, cors and trace see the response
    handler::install(router, GlobalExceptionHandler::new())
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
