//! # till-db: Database Layer for Till
//!
//! This crate provides database access for the Till settlement service.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  API handler (settle_order)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      till-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │   (till.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ TillRepo      │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ SettlementRepo│    │ ...          │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Settlement commits wrap the till-core engine: freeze stock,  │   │
//! │  │   run settle_with, write the deltas, all in one transaction.   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                    path/to/till.db (WAL)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (till, settlement)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_core::{DenominationSet, Money, PaymentLine};
//! use till_db::{Database, DbConfig};
//!
//! // Create database with default config (migrations run on startup)
//! let config = DbConfig::new("path/to/till.db");
//! let db = Database::new(config).await?;
//!
//! // Seed the drawer with legal tender rows
//! let legal = DenominationSet::default();
//! db.till().ensure_denominations(&legal).await?;
//!
//! // Settle an order
//! let receipt = db
//!     .till()
//!     .settle_order(
//!         "ORD-1001",
//!         Money::from_major(180),
//!         &[PaymentLine::new(200, 1)],
//!         &legal,
//!     )
//!     .await?;
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
pub use repository::settlement::{SettlementLineRecord, SettlementRecord, SettlementRepository};
pub use repository::till::{SettlementReceipt, TillRepository};
