//! Warehouse service: registration with derived codes, status toggles,
//! and search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use minierp_core::{PageRequest, PageResponse, Warehouse, WarehouseStatus};
use minierp_db::repository::warehouse::WarehouseSearch;
use minierp_db::Database;

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWarehouseRequest {
    pub name: String,
    pub location: String,
    pub status: WarehouseStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseResponse {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub location: String,
    pub status: WarehouseStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Warehouse> for WarehouseResponse {
    fn from(w: Warehouse) -> Self {
        WarehouseResponse {
            id: w.id,
            name: w.name,
            code: w.code,
            location: w.location,
            status: w.status,
            created_at: w.created_at,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct WarehouseService {
    db: Database,
}

impl WarehouseService {
    pub fn new(db: Database) -> Self {
        WarehouseService { db }
    }

    /// Registers a new warehouse; the `WH` code is derived from the
    /// assigned id inside the insert transaction.
    pub async fn add_warehouse(
        &self,
        request: AddWarehouseRequest,
    ) -> ApiResult<WarehouseResponse> {
        let warehouse = Warehouse::create(request.name, request.location, request.status)?;
        let saved = self.db.warehouses().insert(&warehouse).await?;
        Ok(saved.into())
    }

    /// INACTIVE -> ACTIVE.
    pub async fn activate(&self, warehouse_id: i64) -> ApiResult<()> {
        let mut warehouse = self.load(warehouse_id).await?;
        warehouse.activate();
        self.db.warehouses().update_status(&warehouse).await?;
        Ok(())
    }

    /// ACTIVE -> INACTIVE.
    pub async fn deactivate(&self, warehouse_id: i64) -> ApiResult<()> {
        let mut warehouse = self.load(warehouse_id).await?;
        warehouse.deactivate();
        self.db.warehouses().update_status(&warehouse).await?;
        Ok(())
    }

    /// Paginated search by name/location prefix and status.
    pub async fn search(
        &self,
        filter: WarehouseSearch,
        page: PageRequest,
    ) -> ApiResult<PageResponse<WarehouseResponse>> {
        let (rows, total) = self.db.warehouses().search(&filter, page).await?;
        let content = rows.into_iter().map(WarehouseResponse::from).collect();
        Ok(PageResponse::new(content, page, total))
    }

    async fn load(&self, warehouse_id: i64) -> ApiResult<Warehouse> {
        self.db
            .warehouses()
            .get_by_id(warehouse_id)
            .await?
            .ok_or_else(|| ApiError::not_found("warehouse"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
