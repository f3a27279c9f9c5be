//! # minierp-core: Pure Domain Logic for Mini ERP
//!
//! This crate is the heart of the Mini ERP backend. It contains the domain
//! entities and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Mini ERP Architecture                          │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (HTTP server)                   │   │
//! │  │    auth ──► services ──► JSON responses                     │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │              ★ minierp-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │  types  │  │  money  │  │ validation│  │    page    │  │   │
//! │  │   │  Item   │  │  Money  │  │   rules   │  │ pagination │  │   │
//! │  │   │  Stock  │  │ (cents) │  │  checks   │  │    math    │  │   │
//! │  │   └─────────┘  └─────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                         │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 minierp-db (Database Layer)                 │   │
//! │  │          SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Item, Partner, Warehouse, User, Stock, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//! - [`page`] - Pagination request/response types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod page;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use page::{PageInfo, PageRequest, PageResponse};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for generated item codes ("IC000001", "IC000002", ...).
pub const ITEM_CODE_PREFIX: &str = "IC";

/// Prefix for generated warehouse codes.
pub const WAREHOUSE_CODE_PREFIX: &str = "WH";

/// Maximum number of lines allowed on a single order.
///
/// Keeps order payloads and the per-order stock lock set bounded.
pub const MAX_ORDER_LINES: usize = 100;
