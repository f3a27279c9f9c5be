//! Item master data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{validate_code, validate_name, validate_price_cents};
use crate::{CoreError, ITEM_CODE_PREFIX};

// =============================================================================
// Item Status
// =============================================================================

/// Whether an item can take part in new orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Active,
    Inactive,
}

// =============================================================================
// Item
// =============================================================================

/// A sellable/purchasable item.
///
/// The business `code` is generated from [`item_code`] with a value drawn
/// from the `item_code_sequence` table; it is unique across all items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub name: String,
    pub code: String,
    /// Base selling price in cents.
    pub base_price_cents: i64,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Creates a new, unsaved item.
    ///
    /// Enforces the required fields at construction time: non-empty name
    /// (≤ 100 chars), well-formed code, non-negative price.
    pub fn create(
        name: impl Into<String>,
        code: impl Into<String>,
        base_price_cents: i64,
        status: ItemStatus,
    ) -> CoreResult<Item> {
        let name = name.into();
        let code = code.into();

        validate_name("name", &name, 100)?;
        validate_code(&code)?;
        validate_price_cents(base_price_cents)?;

        let now = Utc::now();
        Ok(Item {
            id: 0,
            name,
            code,
            base_price_cents,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the base price as Money.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Marks the item INACTIVE. Idempotent.
    pub fn deactivate(&mut self) {
        self.status = ItemStatus::Inactive;
        self.updated_at = Utc::now();
    }

    /// Changes the base price.
    pub fn change_price(&mut self, base_price_cents: i64) -> CoreResult<()> {
        validate_price_cents(base_price_cents)?;
        self.base_price_cents = base_price_cents;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Fails unless the item is ACTIVE (order lines require active items).
    pub fn ensure_available(&self) -> CoreResult<()> {
        if self.status != ItemStatus::Active {
            return Err(CoreError::Inactive {
                entity: "item",
                id: self.id,
            });
        }
        Ok(())
    }
}

/// Formats a sequence value as an item code: `1` -> `"IC000001"`.
pub fn item_code(sequence: i64) -> String {
    format!("{}{:06}", ITEM_CODE_PREFIX, sequence)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_validates_fields() {
        let item = Item::create("Steel Bolt M8", "IC000001", 1500, ItemStatus::Active).unwrap();
        assert_eq!(item.id, 0);
        assert_eq!(item.name, "Steel Bolt M8");
        assert_eq!(item.code, "IC000001");
        assert_eq!(item.base_price_cents, 1500);

        assert!(Item::create("", "IC000001", 1500, ItemStatus::Active).is_err());
        assert!(Item::create("Bolt", "bad code", 1500, ItemStatus::Active).is_err());
        assert!(Item::create("Bolt", "IC000001", -1, ItemStatus::Active).is_err());
    }

    #[test]
    fn test_deactivate() {
        let mut item = Item::create("Bolt", "IC000001", 1500, ItemStatus::Active).unwrap();
        item.deactivate();
        assert_eq!(item.status, ItemStatus::Inactive);
        assert!(item.ensure_available().is_err());
    }

    #[test]
    fn test_change_price() {
        let mut item = Item::create("Bolt", "IC000001", 1500, ItemStatus::Active).unwrap();
        item.change_price(1800).unwrap();
        assert_eq!(item.base_price().cents(), 1800);
        assert!(item.change_price(-10).is_err());
    }

    #[test]
    fn test_item_code_format() {
        assert_eq!(item_code(1), "IC000001");
        assert_eq!(item_code(123456), "IC123456");
    }
}
