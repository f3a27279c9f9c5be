//! # minierp-db: Database Layer for Mini ERP
//!
//! This crate provides database access for the Mini ERP backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Mini ERP Data Flow                            │
//! │                                                                     │
//! │  HTTP handler (e.g. search_items)                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  minierp-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │   ┌─────────────┐   ┌───────────────┐   ┌──────────────┐   │   │
//! │  │   │  Database   │   │ Repositories  │   │  Migrations  │   │   │
//! │  │   │  (pool.rs)  │◄──│ (item, user,  │   │  (embedded)  │   │   │
//! │  │   │  SqlitePool │   │  stock, ...)  │   │  001, 002    │   │   │
//! │  │   └─────────────┘   └───────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (file or :memory: for tests)                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (one per aggregate)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minierp_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./erp.db")).await?;
//! let user = db.users().find_by_employee_number("EMP-1024").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryTransactionRepository;
pub use repository::item::ItemRepository;
pub use repository::item_code::ItemCodeRepository;
pub use repository::partner::PartnerRepository;
pub use repository::purchase::PurchaseOrderRepository;
pub use repository::sales::SalesOrderRepository;
pub use repository::stock::StockRepository;
pub use repository::user::UserRepository;
pub use repository::warehouse::WarehouseRepository;
