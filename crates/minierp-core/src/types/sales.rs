//! Sales orders (outbound trade with customers).
//!
//! ## Status Lifecycle
//! ```text
//! CREATED ──► ORDERED ──► SHIPPED
//!    │            │
//!    └────────────┴─────► CANCELLED
//!
//! Placing an order books the outbound stock movements; cancelling an
//! ORDERED order books them back in.
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_name, validate_price_cents, validate_quantity};

// =============================================================================
// Sales Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesStatus {
    Created,
    Ordered,
    Shipped,
    Cancelled,
}

// =============================================================================
// Embedded Value Types
// =============================================================================

/// Contact snapshot of the ordering person, frozen on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderCustomerInfo {
    pub customer_name: String,
    pub customer_phone: String,
}

impl OrderCustomerInfo {
    pub fn new(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
    ) -> CoreResult<OrderCustomerInfo> {
        let customer_name = customer_name.into();
        let customer_phone = customer_phone.into();

        validate_name("customer_name", &customer_name, 50)?;
        validate_name("customer_phone", &customer_phone, 30)?;

        Ok(OrderCustomerInfo {
            customer_name,
            customer_phone,
        })
    }
}

/// Delivery address, frozen on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShippingAddress {
    pub zipcode: String,
    pub address1: String,
    pub address2: Option<String>,
}

impl ShippingAddress {
    pub fn new(
        zipcode: impl Into<String>,
        address1: impl Into<String>,
        address2: Option<String>,
    ) -> CoreResult<ShippingAddress> {
        let zipcode = zipcode.into();
        let address1 = address1.into();

        validate_name("zipcode", &zipcode, 10)?;
        validate_name("address1", &address1, 255)?;

        Ok(ShippingAddress {
            zipcode,
            address1,
            address2,
        })
    }
}

// =============================================================================
// Sales Order
// =============================================================================

/// Sales order header with embedded contact and shipping snapshots.
/// Lines live in their own table and are loaded separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesOrder {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub customer_id: i64,
    pub status: SalesStatus,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub customer_info: OrderCustomerInfo,
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesOrder {
    /// Creates a new, unsaved order in CREATED status.
    pub fn create(
        customer_id: i64,
        customer_info: OrderCustomerInfo,
        shipping_address: ShippingAddress,
    ) -> SalesOrder {
        let now = Utc::now();
        SalesOrder {
            id: 0,
            customer_id,
            status: SalesStatus::Created,
            customer_info,
            shipping_address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fails unless lines may still be edited (status CREATED).
    pub fn ensure_created(&self) -> CoreResult<()> {
        if self.status != SalesStatus::Created {
            return Err(self.invalid_status("modify lines of"));
        }
        Ok(())
    }

    /// Fails if the (item, warehouse) pair already has a line.
    pub fn ensure_no_duplicate_line(
        &self,
        lines: &[SalesOrderLine],
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

        self.status = SalesStatus::Ordered;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// ORDERED -> SHIPPED.
    pub fn mark_as_shipped(&mut self) -> CoreResult<()> {
        if self.status != SalesStatus::Ordered {
            return Err(self.invalid_status("ship"));
        }

        self.status = SalesStatus::Shipped;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the outbound movements have been booked (stock must be
    /// restored if such an order is cancelled).
    pub fn is_ordered(&self) -> bool {
        self.status == SalesStatus::Ordered
    }

    /// CREATED/ORDERED -> CANCELLED. Shipped goods cannot be recalled.
    pub fn cancel(&mut self) -> CoreResult<()> {
        if matches!(self.status, SalesStatus::Shipped | SalesStatus::Cancelled) {
            return Err(self.invalid_status("cancel"));
        }

        self.status = SalesStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn invalid_status(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidStatus {
            entity: "sales order",
            status: format!("{:?}", self.status),
            operation,
        }
    }
}

// =============================================================================
// Sales Order Line
// =============================================================================

/// One (item, warehouse) position on a sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesOrderLine {
    /// Database identifier (0 while unsaved).
    pub id: i64,
    pub sales_order_id: i64,
    pub item_id: i64,
    pub warehouse_id: i64,
    pub qty: i64,
    pub unit_price_cents: i64,
}

impl SalesOrderLine {
    /// Creates a new, unsaved line.
    pub fn create(
        sales_order_id: i64,
        item_id: i64,
        warehouse_id: i64,
        qty: i64,
        unit_price_cents: i64,
    ) -> CoreResult<SalesOrderLine> {
        validate_quantity(qty)?;
        validate_price_cents(unit_price_cents)?;

        Ok(SalesOrderLine {
            id: 0,
            sales_order_id,
            item_id,
            warehouse_id,
            qty,
            unit_price_cents,
        })
    }

    /// Line total (unit price × qty).
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price_cents).times(self.qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> SalesOrder {
        SalesOrder::create(
            3,
            OrderCustomerInfo::new("Kim", "010-1234-5678").unwrap(),
            ShippingAddress::new("04524", "21 Harbor St", None).unwrap(),
        )
    }

    #[test]
    fn test_lifecycle() {
        let mut so = order();
        assert_eq!(so.status, SalesStatus::Created);
        assert!(!so.is_ordered());

        so.mark_as_ordered(1).unwrap();
        assert!(so.is_ordered());

        so.mark_as_shipped().unwrap();
        assert_eq!(so.status, SalesStatus::Shipped);

        // Shipped orders cannot be cancelled.
        assert!(so.cancel().is_err());
    }

    #[test]
    fn test_cancel_ordered() {
        let mut so = order();
        so.mark_as_ordered(1).unwrap();
        so.cancel().unwrap();
        assert_eq!(so.status, SalesStatus::Cancelled);
    }

    #[test]
    fn test_ship_requires_ordered() {
        let mut so = order();
        assert!(so.mark_as_shipped().is_err());
    }

    #[test]
    fn test_embedded_value_validation() {
        assert!(OrderCustomerInfo::new("", "010-1234-5678").is_err());
        assert!(ShippingAddress::new("04524", "", None).is_err());
    }

    #[test]
    fn test_line_total() {
        let line = SalesOrderLine::create(1, 1, 1, 3, 2500).unwrap();
        assert_eq!(line.line_total().cents(), 7500);
    }
}
