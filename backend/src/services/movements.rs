//! Stock movement ledger and reconciliation
//!
//! A movement is appended to the ledger and applied to its product's quantity
//! inside one transaction. The product row is locked with `FOR UPDATE` before
//! the stock check, so concurrent movements on the same product serialize and
//! each one is checked against the quantity left by the previous one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use stocklink_shared::{reconcile, MovementType};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::products::{Product, PRODUCT_COLUMNS};

#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

/// An immutable ledger entry
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Movement {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub movement_type: MovementType,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a movement
#[derive(Debug, Clone)]
pub struct RecordMovementInput {
    pub product_id: i32,
    pub quantity: i32,
    pub movement_type: MovementType,
}

/// The ledger entry written and the product as it stands afterwards
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MovementReceipt {
    pub movement: Movement,
    pub product: Product,
}

const MOVEMENT_COLUMNS: &str = "id, product_id, quantity, movement_type, created_at";

impl MovementService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Validate a movement against current stock, record it and apply it
    pub async fn apply_movement(&self, input: RecordMovementInput) -> AppResult<MovementReceipt> {
        if input.quantity <= 0 {
            return Err(AppError::validation(
                "quantity",
                "Quantity must be greater than 0",
            ));
        }

        let mut tx = self.db.begin().await?;

        let current = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;

        // Dropping `tx` on the error path rolls back and releases the lock
        let new_quantity = reconcile(current, input.movement_type, input.quantity)?;

        let movement = sqlx::query_as::<_, Movement>(&format!(
            r#"
            INSERT INTO movements (product_id, quantity, movement_type)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.movement_type.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET quantity = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(new_quantity)
        .bind(input.product_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            movement_id = movement.id,
            product_id = product.id,
            movement_type = %movement.movement_type,
            quantity = movement.quantity,
            previous_quantity = current,
            new_quantity = product.quantity,
            "movement applied"
        );

        Ok(MovementReceipt { movement, product })
    }

    /// All movements, newest first
    pub async fn list_movements(&self) -> AppResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(&format!(
            "SELECT {} FROM movements ORDER BY created_at DESC, id DESC",
            MOVEMENT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Movements of one product, newest first. Entries remain after the
    /// product itself is deleted.
    pub async fn list_for_product(&self, product_id: i32) -> AppResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(&format!(
            r#"
            SELECT {}
            FROM movements
            WHERE product_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
            MOVEMENT_COLUMNS
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
