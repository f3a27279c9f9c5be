//! # Seed Data Generator
//!
//! Populates the database with master data for development.
//!
//! ## Usage
//! ```bash
//! # Default: 200 items, 3 warehouses, 10 partners
//! cargo run -p minierp-db --bin seed
//!
//! # Custom amount / database path
//! cargo run -p minierp-db --bin seed -- --count 1000 --db ./erp_dev.db
//! ```
//!
//! Item codes come from the real code sequence, so seeded data behaves
//! exactly like data entered through the API.

use std::env;

use minierp_core::{Item, ItemStatus, Partner, PartnerType, Warehouse, WarehouseStatus};
use minierp_db::{Database, DbConfig};

/// Material/category stems for plausible item names.
const MATERIALS: &[&str] = &[
    "Steel", "Copper", "Aluminum", "Brass", "Nylon", "Rubber", "Titanium", "Zinc",
];

const PARTS: &[&str] = &[
    "Bolt", "Nut", "Washer", "Screw", "Rivet", "Bracket", "Hinge", "Gasket", "Bearing", "Spring",
];

const SIZES: &[&str] = &["M4", "M6", "M8", "M10", "M12", "M16"];

const WAREHOUSES: &[(&str, &str)] = &[
    ("Central Warehouse", "12 Dock Road"),
    ("North Depot", "5 Quay Lane"),
    ("East Yard", "81 Mill Street"),
];

const SUPPLIERS: &[&str] = &[
    "Steel Works Co",
    "Hardware Direct",
    "Precision Parts",
    "Metro Fasteners",
    "Atlas Components",
];

const CUSTOMERS: &[&str] = &[
    "Acme Foods",
    "Brightline Builders",
    "Cobalt Engineering",
    "Delta Maintenance",
    "Evergreen Assembly",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./erp_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mini ERP Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./erp_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mini ERP Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Warehouses
    for (name, location) in WAREHOUSES {
        db.warehouses()
            .insert(&Warehouse::create(*name, *location, WarehouseStatus::Active)?)
            .await?;
    }
    println!("✓ {} warehouses", WAREHOUSES.len());

    // Partners
    for name in SUPPLIERS {
        db.partners()
            .insert(&Partner::create(*name, PartnerType::Supplier, None, None)?)
            .await?;
    }
    for name in CUSTOMERS {
        db.partners()
            .insert(&Partner::create(*name, PartnerType::Customer, None, None)?)
            .await?;
    }
    println!("✓ {} partners", SUPPLIERS.len() + CUSTOMERS.len());

    // Items, codes drawn from the real sequence
    let start = std::time::Instant::now();
    let mut generated = 0usize;

    'outer: for material in MATERIALS {
        for part in PARTS {
            for size in SIZES {
                if generated >= count {
                    break 'outer;
                }

                let name = format!("{material} {part} {size}");
                let code = db.item_codes().next_code().await?;
                // Deterministic pseudo-price spread, 0.50 .. 24.49
                let price_cents = 50 + ((generated * 37) % 2400) as i64;

                db.items()
                    .insert(&Item::create(name, code, price_cents, ItemStatus::Active)?)
                    .await?;
                generated += 1;
            }
        }
    }

    println!(
        "✓ {} items in {:.2}s",
        generated,
        start.elapsed().as_secs_f64()
    );
    println!();
    println!("Done.");

    Ok(())
}
