//! # Mini ERP API
//!
//! HTTP/JSON server for the Mini ERP backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         API Server                                  │
//! │                                                                     │
//! │  Client ───► axum routes ───► services ───► minierp-db ──► SQLite   │
//! │                  │                                                  │
//! │                  ▼                                                  │
//! │             AuthUser guard (JWT)            Redis (optional)        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The crate is a library plus a thin `main.rs` so the integration tests
//! can assemble the application exactly the way the binary does.

pub mod auth;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
