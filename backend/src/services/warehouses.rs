//! Warehouse records

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// A physical warehouse
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Warehouse {
    pub id: i32,
    pub name: String,
    /// Free-text address or site label
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CreateWarehouseInput {
    pub name: String,
    pub location: String,
}

/// Fields to change on a warehouse; `None` leaves the stored value untouched
#[derive(Debug, Default)]
pub struct WarehousePatch {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl WarehousePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none()
    }
}

impl WarehouseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(
            "SELECT id, name, location, created_at, updated_at FROM warehouses ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    pub async fn get(&self, id: i32) -> AppResult<Warehouse> {
        sqlx::query_as::<_, Warehouse>(
            "SELECT id, name, location, created_at, updated_at FROM warehouses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Warehouse"))
    }

    /// Fail with NotFound unless the warehouse exists
    pub async fn ensure_exists(&self, id: i32) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found("Warehouse"))
        }
    }

    pub async fn create(&self, input: CreateWarehouseInput) -> AppResult<Warehouse> {
        let warehouse = sqlx::query_as::<_, Warehouse>(
            r#"
            INSERT INTO warehouses (name, location)
            VALUES ($1, $2)
            RETURNING id, name, location, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.location)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(warehouse_id = warehouse.id, "warehouse created");
        Ok(warehouse)
    }

    pub async fn update(&self, id: i32, patch: WarehousePatch) -> AppResult<Warehouse> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        sqlx::query_as::<_, Warehouse>(
            r#"
            UPDATE warehouses
            SET name = COALESCE($1, name),
                location = COALESCE($2, location),
                updated_at = NOW()
            WHERE id = $3
            RETURNING id, name, location, created_at, updated_at
            "#,
        )
        .bind(patch.name)
        .bind(patch.location)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Warehouse"))
    }

    /// Delete a warehouse; refused while products still belong to it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict("Warehouse still holds products".to_string())
                }
                other => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Warehouse"));
        }

        tracing::info!(warehouse_id = id, "warehouse deleted");
        Ok(())
    }
}
