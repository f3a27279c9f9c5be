//! # Domain Types
//!
//! Entity structs, status enums, and their business rules.
//!
//! ## Identity Pattern
//! Every entity carries an `id: i64` assigned by the database on insert
//! (`0` while unsaved) and, for master data, a human-readable business code
//! (`IC000001`, `WH000001`, `CUS000001`, ...) that is unique per table.
//!
//! ## sqlx Integration
//! With the `sqlx` feature enabled the structs derive `FromRow` and the
//! enums derive `Type`, so the database layer can map rows directly.
//! Enum variants are stored as `SCREAMING_SNAKE_CASE` text.

mod inventory;
mod item;
mod partner;
mod purchase;
mod sales;
mod stock;
mod user;
mod warehouse;

pub use inventory::{InventoryTransaction, RefType, TransactionType};
pub use item::{item_code, Item, ItemStatus};
pub use partner::{Partner, PartnerType};
pub use purchase::{PurchaseOrder, PurchaseOrderLine, PurchaseStatus};
pub use sales::{OrderCustomerInfo, SalesOrder, SalesOrderLine, SalesStatus, ShippingAddress};
pub use stock::{Stock, StockKey};
pub use user::{User, UserStatus};
pub use warehouse::{Warehouse, WarehouseStatus};
