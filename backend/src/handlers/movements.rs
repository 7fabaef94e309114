//! HTTP handlers for the stock movement ledger

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use stocklink_shared::MovementType;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppResult, ErrorResponse};
use crate::extract::{ApiJson, ApiQuery};
use crate::services::movements::{Movement, MovementReceipt, RecordMovementInput};
use crate::services::MovementService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMovementRequest {
    #[validate(range(min = 1, message = "product_id must be a positive integer"))]
    pub product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be greater than 0"))]
    pub quantity: i32,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovementFilter {
    /// Only movements of this product
    pub product_id: Option<i32>,
}

/// List ledger entries, newest first
#[utoipa::path(
    get,
    path = "/movements",
    tag = "movements",
    params(MovementFilter),
    responses((status = 200, description = "Ledger entries", body = [Movement]))
)]
pub async fn list_movements(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<MovementFilter>,
) -> AppResult<Json<Vec<Movement>>> {
    let service = MovementService::new(state.db.clone());
    let movements = match filter.product_id {
        Some(product_id) => service.list_for_product(product_id).await?,
        None => service.list_movements().await?,
    };
    Ok(Json(movements))
}

/// Record a movement and apply it to the product's stock
#[utoipa::path(
    post,
    path = "/movements",
    tag = "movements",
    request_body = CreateMovementRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Movement recorded", body = MovementReceipt),
        (status = 400, description = "Invalid input or insufficient stock", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn create_movement(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateMovementRequest>,
) -> AppResult<(StatusCode, Json<MovementReceipt>)> {
    body.validate()?;

    let input = RecordMovementInput {
        product_id: body.product_id,
        quantity: body.quantity,
        movement_type: body.movement_type,
    };

    let receipt = MovementService::new(state.db.clone())
        .apply_movement(input)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}
