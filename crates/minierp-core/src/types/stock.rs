//! Stock balances and the (item, warehouse) composite key.
//!
//! ## Stock Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Stock Balance Model                            │
//! │                                                                     │
//! │  One row per (item, warehouse) pair:                                │
//! │                                                                     │
//! │    StockKey { item_id: 3, warehouse_id: 1 } ──► Stock { qty: 120 }  │
//! │    StockKey { item_id: 3, warehouse_id: 2 } ──► Stock { qty:   7 }  │
//! │                                                                     │
//! │  Movements never write qty directly from the outside:              │
//! │    increase(qty)  - inbound (purchase receipt, sales cancel)        │
//! │    decrease(qty)  - outbound (sales shipment), fails if short       │
//! │    adjust(delta)  - stocktake correction, signed                    │
//! │                                                                     │
//! │  Every movement also appends an InventoryTransaction row.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Stock Key
// =============================================================================

/// Composite key pairing an item with a warehouse.
///
/// Value-equal keys are interchangeable as map keys. The `Ord` order
/// (item_id, then warehouse_id) is the canonical lock order: multi-line
/// stock operations always touch rows in this order so that two concurrent
/// orders over the same keys cannot deadlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub item_id: i64,
    pub warehouse_id: i64,
}

impl StockKey {
    pub fn new(item_id: i64, warehouse_id: i64) -> Self {
        StockKey {
            item_id,
            warehouse_id,
        }
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Quantity of one item held in one warehouse. Never negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Stock {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stock {
    /// Creates a new, unsaved balance row with qty 0.
    pub fn create(key: StockKey) -> Stock {
        let now = Utc::now();
        Stock {
            id: 0,
            item_id: key.item_id,
            warehouse_id: key.warehouse_id,
            qty: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The composite key of this row.
    pub fn key(&self) -> StockKey {
        StockKey::new(self.item_id, self.warehouse_id)
    }

    /// Adds inbound quantity. Rejects non-positive amounts.
    pub fn increase(&mut self, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            return Err(CoreError::NonPositiveQuantity(qty));
        }

        self.qty += qty;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes outbound quantity. Rejects non-positive amounts and
    /// anything beyond the current balance.
    pub fn decrease(&mut self, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            return Err(CoreError::NonPositiveQuantity(qty));
        }

        if qty > self.qty {
            return Err(CoreError::InsufficientStock {
                available: self.qty,
                requested: qty,
            });
        }

        self.qty -= qty;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Applies a signed stocktake delta.
    pub fn adjust(&mut self, delta_qty: i64) {
        self.qty += delta_qty;
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_stock_key_equality_and_map_use() {
        let a = StockKey::new(3, 1);
        let b = StockKey::new(3, 1);
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, 10i64);
        // The value-equal key reads back the same entry.
        assert_eq!(map.get(&b), Some(&10));
    }

    #[test]
    fn test_stock_key_lock_order() {
        let mut keys = vec![
            StockKey::new(2, 9),
            StockKey::new(1, 5),
            StockKey::new(2, 1),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                StockKey::new(1, 5),
                StockKey::new(2, 1),
                StockKey::new(2, 9),
            ]
        );
    }

    #[test]
    fn test_increase_and_decrease() {
        let mut stock = Stock::create(StockKey::new(1, 1));
        stock.increase(10).unwrap();
        stock.decrease(4).unwrap();
        assert_eq!(stock.qty, 6);

        assert!(stock.increase(0).is_err());
        assert!(stock.decrease(-1).is_err());
    }

    #[test]
    fn test_decrease_beyond_balance_fails() {
        let mut stock = Stock::create(StockKey::new(1, 1));
        stock.increase(3).unwrap();

        let err = stock.decrease(5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5
            }
        ));
        // Balance untouched after the failed decrease.
        assert_eq!(stock.qty, 3);
    }

    #[test]
    fn test_adjust_is_signed() {
        let mut stock = Stock::create(StockKey::new(1, 1));
        stock.adjust(12);
        stock.adjust(-2);
        assert_eq!(stock.qty, 10);
    }
}
