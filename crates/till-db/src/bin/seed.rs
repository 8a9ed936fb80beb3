//! # Drawer Seed Tool
//!
//! Populates the database with an opening cash float for development.
//!
//! ## Usage
//! ```bash
//! # Seed 10 pieces of every legal denomination (default)
//! cargo run -p till-db --bin seed
//!
//! # Seed a custom float
//! cargo run -p till-db --bin seed -- --count 25
//!
//! # Specify database path
//! cargo run -p till-db --bin seed -- --db ./data/till.db
//! ```
//!
//! Creates a stock row for every legal denomination value, then deposits
//! the requested piece count into each. Skips the deposit when the drawer
//! already holds cash, so re-running never inflates the float.

use std::env;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use till_core::{DenominationSet, Money};
use till_db::{Database, DbConfig};

/// Initializes the tracing subscriber.
///
/// ## Log Levels (via RUST_LOG env var)
/// - `RUST_LOG=debug` - Show all debug logs
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: i64 = 10;
    let mut db_path = String::from("./till_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(10);
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
                println!("Till Drawer Seed Tool");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Pieces of each denomination to deposit (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./till_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Till Drawer Seed Tool");
    println!("========================");
    println!("Database: {}", db_path);
    println!("Float:    {} of each denomination", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let till = db.till();
    let legal = DenominationSet::default();

    let created = till.ensure_denominations(&legal).await?;
    println!("✓ Denomination rows ready ({} created)", created);

    // Check existing float
    let snapshot = till.snapshot().await?;
    let held: i64 = snapshot.entries().iter().map(|row| row.count).sum();
    if held > 0 {
        println!("⚠ Drawer already holds {} pieces", held);
        println!("  Skipping deposit to avoid inflating the float.");
        println!("  Delete the database file to reseed.");
        return Ok(());
    }

    // Deposit the float
    println!();
    println!("Depositing float...");

    let start = std::time::Instant::now();
    for value in legal.values_desc() {
        let row = till.deposit(value, count).await?;
        println!("  {:>5} × {:<3} (held: {})", value, count, row.count);
    }
    let elapsed = start.elapsed();

    let snapshot = till.snapshot().await?;
    let float_major: i64 = snapshot
        .entries()
        .iter()
        .map(|row| row.value * row.count)
        .sum();

    println!();
    println!(
        "✓ Deposited {} rows in {:?}",
        snapshot.entries().len(),
        elapsed
    );
    println!("  Drawer float: {}", Money::from_major(float_major));
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
