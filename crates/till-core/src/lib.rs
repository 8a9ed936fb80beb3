//! # till-core: Pure Settlement Logic for Till
//!
//! This crate is the **heart** of Till. It contains the order pricing and
//! change-settlement engine as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Order Workflow (external collaborator)             │   │
//! │  │    price order ──► check stock ──► take payment ──► hand change │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ till-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  settle   │  │  change   │  │   │
//! │  │   │ Payment   │  │   Money   │  │ validate  │  │ backtrack │  │   │
//! │  │   │ Snapshot  │  │  TaxRate  │  │ + settle  │  │  search   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  pricing  │  │ validation│                                 │   │
//! │  │   │  totals   │  │   rules   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     till-db (Database Layer)                    │   │
//! │  │       SQLite queries, migrations, transactional settlement      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PaymentLine, TillSnapshot, Settlement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`change`] - Backtracking change decomposition and search budget
//! - [`settle`] - The settlement pipeline (legality, sufficiency, change)
//! - [`pricing`] - Order pricing and stock checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//! use till_core::settle::settle;
//! use till_core::types::{DenominationSet, PaymentLine, StockLevel, TillSnapshot};
//!
//! let legal = DenominationSet::default();
//! let snapshot = TillSnapshot::new(vec![StockLevel::new(20, 2)]);
//!
//! // Customer pays a 200 note against a 180 order; the 20 comes back
//! // out of the till.
//! let result = settle(
//!     Money::from_major(180),
//!     &[PaymentLine::new(200, 1)],
//!     &snapshot,
//!     &legal,
//! )
//! .unwrap();
//!
//! assert_eq!(result.balance, Money::from_major(20));
//! assert_eq!((result.change[0].value, result.change[0].count), (20, 1));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod change;
pub mod error;
pub mod money;
pub mod pricing;
pub mod settle;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The legal denomination face values, largest first.
///
/// ## Why a constant?
/// The legal set is deployment-wide configuration, not per-order data.
/// [`types::DenominationSet::default`] builds from this list; deployments
/// with a different currency profile construct their own set.
pub const DEFAULT_DENOMINATION_VALUES: [i64; 9] = [500, 200, 100, 50, 20, 10, 5, 2, 1];

/// Default step budget for one settlement's change search.
///
/// ## Business Reason
/// The backtracking search is exponential in the worst case. With a handful
/// of legal values real tills never get near this limit; it exists so a
/// hostile or corrupted stock profile fails fast instead of hanging a sale.
pub const DEFAULT_SEARCH_STEP_LIMIT: u64 = 1_000_000;

/// Maximum lines allowed in a single order
///
/// ## Business Reason
/// Prevents runaway orders and ensures reasonable transaction sizes.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single product in an order
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_LINE_QUANTITY: i64 = 999;
