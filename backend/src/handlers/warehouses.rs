//! HTTP handlers for warehouse endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use stocklink_shared::validate_not_blank;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppResult, ErrorResponse, ValidationErrorResponse};
use crate::extract::{ApiJson, ApiPath};
use crate::services::warehouses::{CreateWarehouseInput, Warehouse, WarehousePatch};
use crate::services::WarehouseService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub location: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub location: Option<String>,
}

impl From<UpdateWarehouseRequest> for WarehousePatch {
    fn from(body: UpdateWarehouseRequest) -> Self {
        Self {
            name: body.name.map(|name| name.trim().to_string()),
            location: body.location.map(|location| location.trim().to_string()),
        }
    }
}

/// List all warehouses
#[utoipa::path(
    get,
    path = "/warehouses",
    tag = "warehouses",
    responses((status = 200, description = "All warehouses", body = [Warehouse]))
)]
pub async fn list_warehouses(State(state): State<AppState>) -> AppResult<Json<Vec<Warehouse>>> {
    let warehouses = WarehouseService::new(state.db.clone()).list().await?;
    Ok(Json(warehouses))
}

/// Get a warehouse by ID
#[utoipa::path(
    get,
    path = "/warehouses/{id}",
    tag = "warehouses",
    params(("id" = i32, Path, description = "Warehouse ID")),
    responses(
        (status = 200, description = "The warehouse", body = Warehouse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    )
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Warehouse>> {
    let warehouse = WarehouseService::new(state.db.clone()).get(id).await?;
    Ok(Json(warehouse))
}

/// Create a warehouse
#[utoipa::path(
    post,
    path = "/warehouses",
    tag = "warehouses",
    request_body = CreateWarehouseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Warehouse created", body = Warehouse),
        (status = 400, description = "Invalid input", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateWarehouseRequest>,
) -> AppResult<(StatusCode, Json<Warehouse>)> {
    body.validate()?;

    let input = CreateWarehouseInput {
        name: body.name.trim().to_string(),
        location: body.location.trim().to_string(),
    };

    let warehouse = WarehouseService::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// Update a warehouse's name or location
#[utoipa::path(
    put,
    path = "/warehouses/{id}",
    tag = "warehouses",
    params(("id" = i32, Path, description = "Warehouse ID")),
    request_body = UpdateWarehouseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Warehouse updated", body = Warehouse),
        (status = 400, description = "Invalid input", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    )
)]
pub async fn update_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<UpdateWarehouseRequest>,
) -> AppResult<Json<Warehouse>> {
    body.validate()?;

    let warehouse = WarehouseService::new(state.db.clone())
        .update(id, body.into())
        .await?;
    Ok(Json(warehouse))
}

/// Delete a warehouse that no longer holds products (admin only)
#[utoipa::path(
    delete,
    path = "/warehouses/{id}",
    tag = "warehouses",
    params(("id" = i32, Path, description = "Warehouse ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Warehouse deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse),
        (status = 409, description = "Warehouse still holds products", body = ErrorResponse)
    )
)]
pub async fn delete_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    WarehouseService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
