//! Inventory transaction journal.
//!
//! Every stock movement appends exactly one row here. Rows are immutable
//! once written; the journal is the audit trail for stock balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Transaction Type / Reference Type
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Inbound,
    Outbound,
    Adjust,
}

/// What kind of document a movement refers back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefType {
    PurchaseOrder,
    SalesOrder,
}

// =============================================================================
// Inventory Transaction
// =============================================================================

/// One journal row. `qty_delta` is signed: inbound rows are positive,
/// outbound rows negative, adjustments either.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryTransaction {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub item_id: i64,
    pub warehouse_id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub qty_delta: i64,
    pub ref_type: Option<RefType>,
    pub ref_id: Option<i64>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InventoryTransaction {
    fn new(
        item_id: i64,
        warehouse_id: i64,
        tx_type: TransactionType,
        qty_delta: i64,
        ref_type: Option<RefType>,
        ref_id: Option<i64>,
        reason: Option<String>,
    ) -> InventoryTransaction {
        InventoryTransaction {
            id: 0,
            item_id,
            warehouse_id,
            tx_type,
            qty_delta,
            ref_type,
            ref_id,
            reason,
            created_at: Utc::now(),
        }
    }

    /// Inbound movement from receiving a purchase order.
    pub fn purchase_inbound(
        item_id: i64,
        warehouse_id: i64,
        qty: i64,
        purchase_order_id: i64,
    ) -> CoreResult<InventoryTransaction> {
        if qty <= 0 {
            return Err(CoreError::NonPositiveQuantity(qty));
        }
        if purchase_order_id <= 0 {
            return Err(CoreError::MissingReference("purchase order"));
        }

        Ok(Self::new(
            item_id,
            warehouse_id,
            TransactionType::Inbound,
            qty,
            Some(RefType::PurchaseOrder),
            Some(purchase_order_id),
            None,
        ))
    }

    /// Inbound movement from cancelling an already-placed sales order.
    pub fn cancel_sales_inbound(
        item_id: i64,
        warehouse_id: i64,
        qty: i64,
        sales_order_id: i64,
    ) -> CoreResult<InventoryTransaction> {
        if qty <= 0 {
            return Err(CoreError::NonPositiveQuantity(qty));
        }
        if sales_order_id <= 0 {
            return Err(CoreError::MissingReference("sales order"));
        }

        Ok(Self::new(
            item_id,
            warehouse_id,
            TransactionType::Inbound,
            qty,
            Some(RefType::SalesOrder),
            Some(sales_order_id),
            None,
        ))
    }

    /// Outbound movement from placing a sales order. Recorded with a
    /// negative delta.
    pub fn sales_outbound(
        item_id: i64,
        warehouse_id: i64,
        qty: i64,
        sales_order_id: i64,
    ) -> CoreResult<InventoryTransaction> {
        if qty <= 0 {
            return Err(CoreError::NonPositiveQuantity(qty));
        }
        if sales_order_id <= 0 {
            return Err(CoreError::MissingReference("sales order"));
        }

        Ok(Self::new(
            item_id,
            warehouse_id,
            TransactionType::Outbound,
            -qty,
            Some(RefType::SalesOrder),
            Some(sales_order_id),
            None,
        ))
    }

    /// Stocktake correction. Requires a non-zero delta and a reason.
    pub fn adjust(
        item_id: i64,
        warehouse_id: i64,
        delta: i64,
        reason: impl Into<String>,
    ) -> CoreResult<InventoryTransaction> {
        if delta == 0 {
            return Err(CoreError::ZeroAdjustment);
        }

        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(CoreError::Validation(
                crate::error::ValidationError::Required { field: "reason" },
            ));
        }

        Ok(Self::new(
            item_id,
            warehouse_id,
            TransactionType::Adjust,
            delta,
            None,
            None,
            Some(reason),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_inbound() {
        let tx = InventoryTransaction::purchase_inbound(1, 2, 10, 99).unwrap();
        assert_eq!(tx.tx_type, TransactionType::Inbound);
        assert_eq!(tx.qty_delta, 10);
        assert_eq!(tx.ref_type, Some(RefType::PurchaseOrder));
        assert_eq!(tx.ref_id, Some(99));

        assert!(InventoryTransaction::purchase_inbound(1, 2, 0, 99).is_err());
        assert!(InventoryTransaction::purchase_inbound(1, 2, 10, 0).is_err());
    }

    #[test]
    fn test_sales_outbound_negates_delta() {
        let tx = InventoryTransaction::sales_outbound(1, 2, 4, 55).unwrap();
        assert_eq!(tx.tx_type, TransactionType::Outbound);
        assert_eq!(tx.qty_delta, -4);
        assert_eq!(tx.ref_type, Some(RefType::SalesOrder));
    }

    #[test]
    fn test_adjust_requires_reason_and_delta() {
        assert!(InventoryTransaction::adjust(1, 2, 0, "stocktake").is_err());
        assert!(InventoryTransaction::adjust(1, 2, 5, "  ").is_err());

        let tx = InventoryTransaction::adjust(1, 2, -3, "damaged goods").unwrap();
        assert_eq!(tx.tx_type, TransactionType::Adjust);
        assert_eq!(tx.qty_delta, -3);
        assert_eq!(tx.reason.as_deref(), Some("damaged goods"));
        assert!(tx.ref_type.is_none());
    }
}
