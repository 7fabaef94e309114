//! Warehouse storage layouts
//!
//! Each warehouse owns at most one layout document, stored as a JSONB zone
//! tree. Documents are created once and then replaced wholesale; there is no
//! single-bin update.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use stocklink_shared::{Bin, LocationTree, Zone};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::WarehouseService;

#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

/// The layout document of one warehouse
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Location {
    /// Document identity
    pub id: Uuid,
    pub warehouse_id: i32,
    #[serde(flatten)]
    pub layout: LocationTree,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct LocationRow {
    id: Uuid,
    warehouse_id: i32,
    zones: Json<Vec<Zone>>,
    updated_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            warehouse_id: row.warehouse_id,
            layout: LocationTree::new(row.zones.0),
            updated_at: row.updated_at,
        }
    }
}

impl LocationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_location(&self, warehouse_id: i32) -> AppResult<Option<Location>> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT id, warehouse_id, zones, updated_at FROM locations WHERE warehouse_id = $1",
        )
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Location::from))
    }

    /// The layout of an existing warehouse
    pub async fn get_location(&self, warehouse_id: i32) -> AppResult<Location> {
        WarehouseService::new(self.db.clone())
            .ensure_exists(warehouse_id)
            .await?;

        self.find_location(warehouse_id)
            .await?
            .ok_or_else(|| AppError::not_found("Location structure for this warehouse"))
    }

    /// Store the first layout of a warehouse; a second create is a Conflict
    pub async fn create_location(
        &self,
        warehouse_id: i32,
        layout: LocationTree,
    ) -> AppResult<Location> {
        layout.validate()?;

        WarehouseService::new(self.db.clone())
            .ensure_exists(warehouse_id)
            .await?;

        if self.find_location(warehouse_id).await?.is_some() {
            return Err(AppError::Conflict(
                "A location structure already exists for this warehouse. Use PUT to replace it."
                    .to_string(),
            ));
        }

        // A concurrent create loses on locations_warehouse_id_key -> Conflict
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations (id, warehouse_id, zones)
            VALUES ($1, $2, $3)
            RETURNING id, warehouse_id, zones, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(warehouse_id)
        .bind(Json(&layout.zones))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            warehouse_id,
            location_id = %row.id,
            bins = layout.bin_count(),
            "location structure created"
        );
        Ok(row.into())
    }

    /// Replace the whole zone tree, creating the document if it is missing
    pub async fn replace_location(
        &self,
        warehouse_id: i32,
        layout: LocationTree,
    ) -> AppResult<Location> {
        layout.validate()?;

        WarehouseService::new(self.db.clone())
            .ensure_exists(warehouse_id)
            .await?;

        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations (id, warehouse_id, zones)
            VALUES ($1, $2, $3)
            ON CONFLICT (warehouse_id)
            DO UPDATE SET zones = EXCLUDED.zones, updated_at = NOW()
            RETURNING id, warehouse_id, zones, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(warehouse_id)
        .bind(Json(&layout.zones))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            warehouse_id,
            location_id = %row.id,
            bins = layout.bin_count(),
            "location structure replaced"
        );
        Ok(row.into())
    }

    /// Whether a bin with exactly this code exists in the warehouse. A
    /// warehouse without a layout has no bins.
    pub async fn bin_exists(&self, warehouse_id: i32, bin_code: &str) -> AppResult<bool> {
        Ok(self
            .find_location(warehouse_id)
            .await?
            .is_some_and(|location| location.layout.contains_bin(bin_code)))
    }

    /// The bin with exactly this code
    pub async fn find_bin(&self, warehouse_id: i32, bin_code: &str) -> AppResult<Bin> {
        self.find_location(warehouse_id)
            .await?
            .and_then(|location| location.layout.find_bin(bin_code).cloned())
            .ok_or_else(|| AppError::not_found("Bin"))
    }
}
