//! Repository implementations, one module per aggregate.
//!
//! All SQL lives here. Queries are runtime-checked (`sqlx::query_as` with
//! `.bind()`), so the crate builds without a database at compile time.
//! Lookups return `Ok(None)` for "not found"; constraint violations map to
//! typed [`crate::DbError`] variants.
//!
//! Methods with a `_tx` suffix take a `&mut SqliteConnection` so callers
//! can compose them inside one transaction (stock movements update balances
//! and append journal rows atomically).

pub mod inventory;
pub mod item;
pub mod item_code;
pub mod partner;
pub mod purchase;
pub mod sales;
pub mod stock;
pub mod user;
pub mod warehouse;
