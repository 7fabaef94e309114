//! HTTP handlers for the StockLink API

pub mod auth;
pub mod health;
pub mod locations;
pub mod movements;
pub mod products;
pub mod warehouses;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde_json::{json, Value};

pub use auth::{login, register};
pub use health::{database_health, health_check};
pub use locations::{bin_exists, create_location, get_bin, get_location, replace_location};
pub use movements::{create_movement, list_movements};
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use warehouses::{
    create_warehouse, delete_warehouse, get_warehouse, list_warehouses, update_warehouse,
};

/// Fallback for unknown routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found", "code": "NOT_FOUND" })),
    )
}

/// Gives axum's bodiless 405 the JSON error shape, keeping its `Allow` header
pub async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let body = json!({ "error": "Method not allowed", "code": "METHOD_NOT_ALLOWED" });
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(body.to_string()))
}
