//! Purchase orders (inbound trade with suppliers).
//!
//! ## Status Lifecycle
//! ```text
//! CREATED ──► ORDERED ──► RECEIVED
//!    │            │
//!    └────────────┴─────► CANCELLED
//!
//! Lines are mutable only while CREATED. Receiving an ORDERED purchase
//! order books the inbound stock movements.
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_price_cents, validate_quantity};

// =============================================================================
// Purchase Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    Created,
    Ordered,
    Received,
    Cancelled,
}

// =============================================================================
// Purchase Order
// =============================================================================

/// Purchase order header. Lines live in their own table and are loaded
/// separately by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseOrder {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub supplier_id: i64,
    pub status: PurchaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Creates a new, unsaved order in CREATED status.
    pub fn create(supplier_id: i64) -> PurchaseOrder {
        let now = Utc::now();
        PurchaseOrder {
            id: 0,
            supplier_id,
            status: PurchaseStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails unless lines may still be edited (status CREATED).
    pub fn ensure_created(&self) -> CoreResult<()> {
        if self.status != PurchaseStatus::Created {
            return Err(self.invalid_status("modify lines of"));
        }
        Ok(())
    }

    /// Fails if the (item, warehouse) pair already has a line.
    pub fn ensure_no_duplicate_line(
        &self,
        lines: &[PurchaseOrderLine],
        item_id: i64,
        warehouse_id: i64,
    ) -> CoreResult<()> {
        if lines
            .iter()
            .any(|l| l.item_id == item_id && l.warehouse_id == warehouse_id)
        {
            return Err(CoreError::DuplicateLine {
                item_id,
                warehouse_id,
            });
        }
        Ok(())
    }

    /// CREATED -> ORDERED. Requires at least one line.
    pub fn mark_as_ordered(&mut self, line_count: usize) -> CoreResult<()> {
        self.ensure_created()?;

        if line_count == 0 {
            return Err(CoreError::EmptyOrder);
        }

        self.status = PurchaseStatus::Ordered;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// ORDERED -> RECEIVED.
    pub fn mark_as_received(&mut self) -> CoreResult<()> {
        if self.status != PurchaseStatus::Ordered {
            return Err(self.invalid_status("receive"));
        }

        self.status = PurchaseStatus::Received;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// CREATED/ORDERED -> CANCELLED. Received goods cannot be un-received.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if matches!(
            self.status,
            PurchaseStatus::Received | PurchaseStatus::Cancelled
        ) {
            return Err(self.invalid_status("cancel"));
        }

        self.status = PurchaseStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn invalid_status(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidStatus {
            entity: "purchase order",
            status: format!("{:?}", self.status),
            operation,
        }
    }
}

// =============================================================================
// Purchase Order Line
// =============================================================================

/// One (item, warehouse) position on a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseOrderLine {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub purchase_order_id: i64,
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub unit_cost_cents: i64,
}

impl PurchaseOrderLine {
    /// Creates a new, unsaved line. Quantity must be positive, unit cost
    /// non-negative.
    pub fn create(
        purchase_order_id: i64,
        item_id: i64,
        warehouse_id: i64,
        qty: i64,
        unit_cost_cents: i64,
    ) -> CoreResult<PurchaseOrderLine> {
        validate_quantity(qty)?;
        validate_price_cents(unit_cost_cents)?;

        Ok(PurchaseOrderLine {
            id: 0,
            purchase_order_id,
            item_id,
            warehouse_id,
            qty,
            unit_cost_cents,
        })
    }

    /// Line total (unit cost × qty).
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_cost_cents).times(self.qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item_id: i64, warehouse_id: i64) -> PurchaseOrderLine {
        PurchaseOrderLine::create(1, item_id, warehouse_id, 5, 1000).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let mut po = PurchaseOrder::create(7);
        assert_eq!(po.status, PurchaseStatus::Created);

        // Cannot place an empty order.
        assert!(matches!(po.mark_as_ordered(0), Err(CoreError::EmptyOrder)));

        po.mark_as_ordered(2).unwrap();
        assert_eq!(po.status, PurchaseStatus::Ordered);

        // Lines are frozen once placed.
        assert!(po.ensure_created().is_err());

        po.mark_as_received().unwrap();
        assert_eq!(po.status, PurchaseStatus::Received);

        // Received orders cannot be cancelled or re-received.
        assert!(po.cancel().is_err());
        assert!(po.mark_as_received().is_err());
    }

    #[test]
    fn test_cancel_before_receipt() {
        let mut po = PurchaseOrder::create(7);
        po.mark_as_ordered(1).unwrap();
        po.cancel().unwrap();
        assert_eq!(po.status, PurchaseStatus::Cancelled);
        assert!(po.cancel().is_err());
    }

    #[test]
    fn test_receive_requires_ordered() {
        let mut po = PurchaseOrder::create(7);
        assert!(po.mark_as_received().is_err());
    }

    #[test]
    fn test_duplicate_line_detection() {
        let po = PurchaseOrder::create(7);
        let lines = vec![line(1, 1), line(1, 2)];

        assert!(po.ensure_no_duplicate_line(&lines, 1, 1).is_err());
        assert!(po.ensure_no_duplicate_line(&lines, 2, 1).is_ok());
    }

    #[test]
    fn test_line_validation_and_total() {
        assert!(PurchaseOrderLine::create(1, 1, 1, 0, 1000).is_err());
        assert!(PurchaseOrderLine::create(1, 1, 1, 5, -1).is_err());

        let l = line(1, 1);
        assert_eq!(l.line_total().cents(), 5000);
    }
}
