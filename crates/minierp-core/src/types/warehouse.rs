//! Warehouse master data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_name;
use crate::WAREHOUSE_CODE_PREFIX;

// =============================================================================
// Warehouse Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarehouseStatus {
    Active,
    Inactive,
}

// =============================================================================
// Warehouse
// =============================================================================

/// A physical stock location.
///
/// Like partners, the business code (`WH000001`) is derived from the id
/// after insert, so `code` is `None` on a fresh warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Warehouse {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub location: String,
    pub status: WarehouseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Warehouse {
    /// Creates a new, unsaved warehouse.
    pub fn create(
        name: impl Into<String>,
        location: impl Into<String>,
        status: WarehouseStatus,
    ) -> CoreResult<Warehouse> {
        let name = name.into();
        let location = location.into();

        validate_name("name", &name, 50)?;
        validate_name("location", &location, 255)?;

        let now = Utc::now();
        Ok(Warehouse {
            id: 0,
            name,
            code: None,
            location,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Derives the business code (`WH` + zero-padded id) from the assigned
    /// id. Must run after insert.
    pub fn generate_code(&mut self) -> CoreResult<()> {
        if self.id == 0 {
            return Err(CoreError::CodeBeforeId);
        }

        self.code = Some(format!("{}{:06}", WAREHOUSE_CODE_PREFIX, self.id));
        Ok(())
    }

    /// ACTIVE if currently INACTIVE; no-op otherwise.
    pub fn activate(&mut self) {
        if self.status == WarehouseStatus::Inactive {
            self.status = WarehouseStatus::Active;
            self.updated_at = Utc::now();
        }
    }

    /// INACTIVE if currently ACTIVE; no-op otherwise.
    pub fn deactivate(&mut self) {
        if self.status == WarehouseStatus::Active {
            self.status = WarehouseStatus::Inactive;
            self.updated_at = Utc::now();
        }
    }

    /// Fails unless the warehouse is ACTIVE.
    pub fn ensure_available(&self) -> CoreResult<()> {
        if self.status != WarehouseStatus::Active {
            return Err(CoreError::Inactive {
                entity: "warehouse",
                id: self.id,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code() {
        let mut wh = Warehouse::create("Central", "12 Dock Road", WarehouseStatus::Active).unwrap();
        assert!(wh.generate_code().is_err());

        wh.id = 3;
        wh.generate_code().unwrap();
        assert_eq!(wh.code.as_deref(), Some("WH000003"));
    }

    #[test]
    fn test_status_transitions() {
        let mut wh = Warehouse::create("Central", "12 Dock Road", WarehouseStatus::Active).unwrap();

        wh.deactivate();
        assert_eq!(wh.status, WarehouseStatus::Inactive);
        assert!(wh.ensure_available().is_err());

        wh.activate();
        assert_eq!(wh.status, WarehouseStatus::Active);
        assert!(wh.ensure_available().is_ok());
    }
}
