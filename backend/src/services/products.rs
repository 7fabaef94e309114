//! Product records
//!
//! Stock quantity is set once at creation; afterwards it only changes through
//! [`crate::services::MovementService::apply_movement`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::WarehouseService;

#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// A stocked product
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Unique reference code
    pub reference: String,
    /// Units in stock, never negative
    pub quantity: i32,
    pub warehouse_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CreateProductInput {
    pub name: String,
    pub reference: String,
    pub quantity: i32,
    pub warehouse_id: i32,
}

/// Descriptive fields to change on a product; `None` leaves the stored value untouched
#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub reference: Option<String>,
    pub warehouse_id: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.reference.is_none() && self.warehouse_id.is_none()
    }
}

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, reference, quantity, warehouse_id, created_at, updated_at";

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    pub async fn get(&self, id: i32) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))
    }

    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        if input.quantity < 0 {
            return Err(AppError::validation(
                "quantity",
                "Quantity must be zero or greater",
            ));
        }

        WarehouseService::new(self.db.clone())
            .ensure_exists(input.warehouse_id)
            .await?;

        // Duplicate references surface as a unique violation -> Conflict
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, reference, quantity, warehouse_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.reference)
        .bind(input.quantity)
        .bind(input.warehouse_id)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            product_id = product.id,
            warehouse_id = product.warehouse_id,
            quantity = product.quantity,
            "product created"
        );
        Ok(product)
    }

    pub async fn update(&self, id: i32, patch: ProductPatch) -> AppResult<Product> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        if let Some(warehouse_id) = patch.warehouse_id {
            WarehouseService::new(self.db.clone())
                .ensure_exists(warehouse_id)
                .await?;
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($1, name),
                reference = COALESCE($2, reference),
                warehouse_id = COALESCE($3, warehouse_id),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(patch.name)
        .bind(patch.reference)
        .bind(patch.warehouse_id)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

        tracing::info!(product_id = product.id, "product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Product"));
        }

        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }
}
