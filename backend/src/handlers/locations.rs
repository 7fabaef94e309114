//! HTTP handlers for warehouse storage layouts

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use stocklink_shared::{Bin, LocationTree};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult, ErrorResponse};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::services::locations::Location;
use crate::services::{LocationService, WarehouseService};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BinExistsQuery {
    /// Warehouse whose layout is searched
    pub warehouse_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BinExistsResponse {
    pub exists: bool,
    #[serde(rename = "binCode")]
    pub bin_code: String,
    pub warehouse_id: i32,
}

/// Get the layout document of a warehouse
#[utoipa::path(
    get,
    path = "/warehouses/{id}/locations",
    tag = "locations",
    params(("id" = i32, Path, description = "Warehouse ID")),
    responses(
        (status = 200, description = "The layout", body = Location),
        (status = 404, description = "Warehouse or layout not found", body = ErrorResponse)
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<i32>,
) -> AppResult<Json<Location>> {
    let location = LocationService::new(state.db.clone())
        .get_location(warehouse_id)
        .await?;
    Ok(Json(location))
}

/// Create the layout document of a warehouse
#[utoipa::path(
    post,
    path = "/warehouses/{id}/locations",
    tag = "locations",
    params(("id" = i32, Path, description = "Warehouse ID")),
    request_body = LocationTree,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Layout created", body = Location),
        (status = 400, description = "Malformed layout", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse),
        (status = 409, description = "Warehouse already has a layout", body = ErrorResponse)
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<i32>,
    ApiJson(layout): ApiJson<LocationTree>,
) -> AppResult<(StatusCode, Json<Location>)> {
    let location = LocationService::new(state.db.clone())
        .create_location(warehouse_id, layout)
        .await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// Replace the layout document of a warehouse, creating it if missing
#[utoipa::path(
    put,
    path = "/warehouses/{id}/locations",
    tag = "locations",
    params(("id" = i32, Path, description = "Warehouse ID")),
    request_body = LocationTree,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Layout replaced", body = Location),
        (status = 400, description = "Malformed layout", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    )
)]
pub async fn replace_location(
    State(state): State<AppState>,
    ApiPath(warehouse_id): ApiPath<i32>,
    ApiJson(layout): ApiJson<LocationTree>,
) -> AppResult<Json<Location>> {
    let location = LocationService::new(state.db.clone())
        .replace_location(warehouse_id, layout)
        .await?;
    Ok(Json(location))
}

/// Get a single bin of a warehouse by its exact code
#[utoipa::path(
    get,
    path = "/warehouses/{id}/locations/bins/{bin_code}",
    tag = "locations",
    params(
        ("id" = i32, Path, description = "Warehouse ID"),
        ("bin_code" = String, Path, description = "Bin code")
    ),
    responses(
        (status = 200, description = "The bin", body = Bin),
        (status = 404, description = "Warehouse or bin not found", body = ErrorResponse)
    )
)]
pub async fn get_bin(
    State(state): State<AppState>,
    ApiPath((warehouse_id, bin_code)): ApiPath<(i32, String)>,
) -> AppResult<Json<Bin>> {
    WarehouseService::new(state.db.clone())
        .ensure_exists(warehouse_id)
        .await?;

    let bin = LocationService::new(state.db.clone())
        .find_bin(warehouse_id, &bin_code)
        .await?;
    Ok(Json(bin))
}

/// Check whether a bin code exists in a warehouse
#[utoipa::path(
    get,
    path = "/locations/{bin_code}/exists",
    tag = "locations",
    params(
        ("bin_code" = String, Path, description = "Bin code"),
        BinExistsQuery
    ),
    responses(
        (status = 200, description = "Lookup result", body = BinExistsResponse),
        (status = 400, description = "warehouse_id missing", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse)
    )
)]
pub async fn bin_exists(
    State(state): State<AppState>,
    ApiPath(bin_code): ApiPath<String>,
    ApiQuery(query): ApiQuery<BinExistsQuery>,
) -> AppResult<Json<BinExistsResponse>> {
    let warehouse_id = query
        .warehouse_id
        .ok_or_else(|| AppError::validation("warehouse_id", "warehouse_id is required"))?;

    WarehouseService::new(state.db.clone())
        .ensure_exists(warehouse_id)
        .await?;

    let exists = LocationService::new(state.db.clone())
        .bin_exists(warehouse_id, &bin_code)
        .await?;

    Ok(Json(BinExistsResponse {
        exists,
        bin_code,
        warehouse_id,
    }))
}
