//! # Test Fixtures
//!
//! Factories that produce structurally valid entities for tests, with
//! identifiers that would normally be assigned by the database.
//!
//! Each fixture calls the entity's real factory and then assigns the id
//! from a process-wide atomic sequence, so ids are unique and monotonically
//! increasing across calls within a test run. No persistence round-trip is
//! needed to get an entity that looks saved.
//!
//! Available to downstream crates through the `fixtures` feature:
//!
//! ```toml
//! [dev-dependencies]
//! minierp-core = { path = "../minierp-core", features = ["fixtures"] }
//! ```

use std::sync::atomic::{AtomicI64, Ordering};

use crate::types::{Item, ItemStatus, Partner, PartnerType, User, Warehouse, WarehouseStatus};

/// One shared sequence keeps ids unique across entity types too, which
/// makes mixed-up-id bugs in tests fail loudly instead of passing by
/// coincidence.
static SEQUENCE: AtomicI64 = AtomicI64::new(1);

fn next_id() -> i64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// Item Fixture
// =============================================================================

pub struct ItemFixture;

impl ItemFixture {
    /// An active item with default test values.
    pub fn create() -> Item {
        Self::create_with("Test Item", "IC000001", 1_500_000, ItemStatus::Active)
    }

    /// An item with caller-chosen field values and a fresh id.
    pub fn create_with(
        name: &str,
        code: &str,
        base_price_cents: i64,
        status: ItemStatus,
    ) -> Item {
        let mut item = Item::create(name, code, base_price_cents, status)
            .expect("fixture item must be valid");
        item.id = next_id();
        item
    }
}

// =============================================================================
// Partner Fixture
// =============================================================================

pub struct PartnerFixture;

impl PartnerFixture {
    /// A customer partner with default test values.
    pub fn create() -> Partner {
        Self::create_with("Acme Foods", "CUS000001", PartnerType::Customer, None, None)
    }

    /// A partner with caller-chosen field values and a fresh id.
    pub fn create_with(
        name: &str,
        code: &str,
        partner_type: PartnerType,
        phone: Option<String>,
        email: Option<String>,
    ) -> Partner {
        let mut partner = Partner::create(name, partner_type, phone, email)
            .expect("fixture partner must be valid");
        partner.id = next_id();
        partner.code = Some(code.to_string());
        partner
    }
}

// =============================================================================
// Warehouse Fixture
// =============================================================================

pub struct WarehouseFixture;

impl WarehouseFixture {
    /// An active warehouse with default test values.
    pub fn create() -> Warehouse {
        Self::create_with(
            "Central Warehouse 1",
            "WH000001",
            "12 Dock Road",
            WarehouseStatus::Active,
        )
    }

    /// A warehouse with caller-chosen field values and a fresh id.
    pub fn create_with(
        name: &str,
        code: &str,
        location: &str,
        status: WarehouseStatus,
    ) -> Warehouse {
        let mut warehouse =
            Warehouse::create(name, location, status).expect("fixture warehouse must be valid");
        warehouse.id = next_id();
        warehouse.code = Some(code.to_string());
        warehouse
    }
}

// =============================================================================
// User Fixture
// =============================================================================

pub struct UserFixture;

impl UserFixture {
    /// An active user with default test values. The password field holds a
    /// placeholder hash; tests that verify passwords hash their own.
    pub fn create() -> User {
        Self::create_with("Test User", "EMP-0001", "$argon2id$test-hash")
    }

    /// A user with caller-chosen field values and a fresh id.
    pub fn create_with(name: &str, employee_number: &str, password_hash: &str) -> User {
        let mut user =
            User::create(name, employee_number, password_hash).expect("fixture user must be valid");
        user.id = next_id();
        user
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
