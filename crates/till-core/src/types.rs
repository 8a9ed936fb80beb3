//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DenominationSet │   │   PaymentLine   │   │ DenominationLine│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  legal values   │   │  value          │   │  denominationId?│       │
//! │  │  (500, 200, …)  │   │  count          │   │  value, count   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   StockLevel    │   │  TillSnapshot   │   │   Settlement    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  one stock row  │   │  frozen list of │   │  paidAmount     │       │
//! │  │  value, count   │   │  StockLevels    │   │  balance        │       │
//! │  └─────────────────┘   └─────────────────┘   │  paid, change   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Denominations carry two identities: the face `value` (business identity,
//! unique) and an optional storage id. The engine works on values; storage
//! ids ride along so the caller can map results back to its rows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 825 bps = 8.25%
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Denomination Set
// =============================================================================

/// The fixed set of legal denomination face values.
///
/// A deployment-wide configuration constant, not per-order data. Values are
/// whole major units. Construction rejects non-positive values; duplicates
/// collapse (no two denominations share a value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationSet(BTreeSet<i64>);

impl DenominationSet {
    /// Builds a set from face values.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::types::DenominationSet;
    ///
    /// let legal = DenominationSet::new([500, 200, 100, 50, 20, 10, 5, 2, 1]).unwrap();
    /// assert!(legal.contains(500));
    /// assert!(!legal.contains(25));
    /// ```
    pub fn new(values: impl IntoIterator<Item = i64>) -> Result<Self, ValidationError> {
        let mut set = BTreeSet::new();
        for value in values {
            if value <= 0 {
                return Err(ValidationError::MustBePositive {
                    field: "denomination value".to_string(),
                });
            }
            set.insert(value);
        }
        if set.is_empty() {
            return Err(ValidationError::Required {
                field: "denomination values".to_string(),
            });
        }
        Ok(DenominationSet(set))
    }

    /// Checks whether a face value is legal tender here.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.0.contains(&value)
    }

    /// All values, largest first (the order error messages and searches use).
    pub fn values_desc(&self) -> Vec<i64> {
        self.0.iter().rev().copied().collect()
    }

    /// The smallest legal value.
    #[inline]
    pub fn smallest(&self) -> Option<i64> {
        self.0.first().copied()
    }

    /// Number of distinct values.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the set holds no values (unreachable via `new`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DenominationSet {
    /// The default legal tender set: {500, 200, 100, 50, 20, 10, 5, 2, 1}.
    fn default() -> Self {
        DenominationSet(crate::DEFAULT_DENOMINATION_VALUES.iter().copied().collect())
    }
}

// =============================================================================
// Payment Line
// =============================================================================

/// One tendered denomination: `count` pieces of face `value`.
///
/// Counts must be positive; values must be legal. Duplicate values within a
/// payment are summed before any downstream use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLine {
    /// Denomination face value in whole major units.
    pub value: i64,

    /// How many pieces of this denomination were tendered.
    pub count: i64,
}

impl PaymentLine {
    /// Creates a payment line.
    pub fn new(value: i64, count: i64) -> Self {
        PaymentLine { value, count }
    }

    /// The monetary amount this line contributes (value × count).
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_major(self.value) * self.count
    }
}

// =============================================================================
// Denomination Line
// =============================================================================

/// One denomination in a settlement result, on either the paid or the change
/// side.
///
/// `denomination_id` is the storage identity when the stock snapshot knows
/// this value, `None` when the customer tendered a legal value the shop has
/// no row for yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenominationLine {
    /// Storage identity, if this value exists in the stock snapshot.
    pub denomination_id: Option<String>,

    /// Denomination face value in whole major units.
    pub value: i64,

    /// Piece count.
    pub count: i64,
}

impl DenominationLine {
    /// The monetary amount this line carries (value × count).
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_major(self.value) * self.count
    }
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// One denomination row in the shop's stock snapshot.
///
/// Zero-count rows matter: they mark values the shop *knows*, which feeds
/// the top-up suggestion bound even when no pieces are currently held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    /// Storage identity of this denomination row, if persisted.
    pub denomination_id: Option<String>,

    /// Denomination face value in whole major units.
    pub value: i64,

    /// Non-negative count currently held.
    pub count: i64,
}

impl StockLevel {
    /// A stock row without storage identity (tests, ad-hoc snapshots).
    pub fn new(value: i64, count: i64) -> Self {
        StockLevel {
            denomination_id: None,
            value,
            count,
        }
    }

    /// A stock row carrying its storage identity.
    pub fn with_id(id: impl Into<String>, value: i64, count: i64) -> Self {
        StockLevel {
            denomination_id: Some(id.into()),
            value,
            count,
        }
    }
}

/// An immutable per-call snapshot of the shop's denomination stock.
///
/// The engine never touches live stock: the caller reads its store, freezes
/// the rows into a snapshot, and owns whatever transaction surrounds the
/// read and the later write-back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TillSnapshot {
    entries: Vec<StockLevel>,
}

impl TillSnapshot {
    /// Wraps stock rows into a snapshot.
    pub fn new(entries: Vec<StockLevel>) -> Self {
        TillSnapshot { entries }
    }

    /// A snapshot with no rows at all (a shop that has never seen cash).
    pub fn empty() -> Self {
        TillSnapshot { entries: Vec::new() }
    }

    /// The stock rows, as frozen at read time.
    pub fn entries(&self) -> &[StockLevel] {
        &self.entries
    }

    /// True when no rows exist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<StockLevel>> for TillSnapshot {
    fn from(entries: Vec<StockLevel>) -> Self {
        TillSnapshot::new(entries)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The successful outcome of settling a payment against an order total.
///
/// `paid` is the normalized tender (duplicates merged, sorted descending by
/// value); `change` is the decomposition to hand back, empty when the
/// payment was exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    /// Total amount tendered.
    pub paid_amount: Money,

    /// Amount owed back to the customer (paid − total, never negative).
    pub balance: Money,

    /// Normalized tendered lines.
    pub paid: Vec<DenominationLine>,

    /// Change decomposition; empty iff balance is zero.
    pub change: Vec<DenominationLine>,
}

impl Settlement {
    /// Sum over the change lines; equals `balance` by construction.
    pub fn change_amount(&self) -> Money {
        self.change.iter().map(DenominationLine::amount).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
