//! Service layer: business orchestration over the repositories.
//!
//! One service per domain. Handlers construct services from the shared
//! state (cloning a `Database` is a cheap pool handle copy) and delegate;
//! services own validation, cross-aggregate rules, and transactions.

pub mod auth_service;
pub mod item_service;
pub mod partner_service;
pub mod purchase_service;
pub mod sales_service;
pub mod stock_service;
pub mod user_service;
pub mod warehouse_service;
