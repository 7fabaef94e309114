//! HTTP handlers for product endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use stocklink_shared::validate_not_blank;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult, ErrorResponse, ValidationErrorResponse};
use crate::extract::{ApiJson, ApiPath};
use crate::services::products::{CreateProductInput, Product, ProductPatch};
use crate::services::ProductService;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub reference: String,
    /// Opening stock, defaults to 0
    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 1, message = "warehouse_id must be a positive integer"))]
    pub warehouse_id: i32,
}

/// Descriptive product fields. Stock only changes through `POST /movements`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub reference: Option<String>,
    #[validate(range(min = 1, message = "warehouse_id must be a positive integer"))]
    pub warehouse_id: Option<i32>,
    /// Always rejected
    pub quantity: Option<i32>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(body: UpdateProductRequest) -> Self {
        Self {
            name: body.name.map(|name| name.trim().to_string()),
            reference: body.reference.map(|reference| reference.trim().to_string()),
            warehouse_id: body.warehouse_id,
        }
    }
}

/// List all products
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses((status = 200, description = "All products", body = [Product]))
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = ProductService::new(state.db.clone()).list().await?;
    Ok(Json(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Product>> {
    let product = ProductService::new(state.db.clone()).get(id).await?;
    Ok(Json(product))
}

/// Create a product with its opening stock
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse),
        (status = 409, description = "Reference already in use", body = ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    body.validate()?;

    let input = CreateProductInput {
        name: body.name.trim().to_string(),
        reference: body.reference.trim().to_string(),
        quantity: body.quantity.unwrap_or(0),
        warehouse_id: body.warehouse_id,
    };

    let product = ProductService::new(state.db.clone()).create(input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update descriptive product fields
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid input or quantity given", body = ValidationErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Product or warehouse not found", body = ErrorResponse),
        (status = 409, description = "Reference already in use", body = ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    if body.quantity.is_some() {
        return Err(AppError::validation(
            "quantity",
            "Quantity cannot be updated directly; record a movement with POST /movements",
        ));
    }
    body.validate()?;

    let product = ProductService::new(state.db.clone())
        .update(id, body.into())
        .await?;
    Ok(Json(product))
}

/// Delete a product (admin only)
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    ProductService::new(state.db.clone()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
