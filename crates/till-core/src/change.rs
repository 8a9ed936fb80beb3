//! # Change Decomposition
//!
//! Exhaustive backtracking search that splits a change amount into
//! denomination counts drawn from what the till actually holds.
//!
//! ## Why Not Greedy?
//! Greedy (always hand out the largest note) fails when stock is limited:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Target: 60    Stock: 1 × 50, 3 × 20                                    │
//! │                                                                         │
//! │  Greedy:  take 50 → remaining 10 → no 10s → STUCK                      │
//! │                                                                         │
//! │  Search:  try 1 × 50 ──→ dead end, backtrack                           │
//! │           try 0 × 50 ──→ 3 × 20 = 60 ✓                                 │
//! │                                                                         │
//! │  Each denomination index tries counts max_use..0, where                 │
//! │  max_use = min(remaining ÷ value, available).                           │
//! │  Counting down means solutions prefer larger notes when possible.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Exhaustive: if any combination of the given denominations sums to the
//!   target, one is found (budget permitting)
//! - First solution wins; with values sorted descending, that is the
//!   most-large-notes solution
//! - `None` means no combination exists (or the budget ran out; the caller
//!   tells these apart via [`SearchBudget::exhausted`])
//!
//! ## Units
//! All values and targets here are whole major units (rupees, not paisa).
//! The settlement layer refuses fractional balances before this module is
//! ever reached.

use serde::{Deserialize, Serialize};

use crate::types::DenominationLine;
use crate::DEFAULT_SEARCH_STEP_LIMIT;

// =============================================================================
// Working Denomination
// =============================================================================

/// One denomination as the search sees it: face value, how many pieces are
/// on hand, and the persisted row id when the caller has one.
///
/// The id is carried through untouched so that callers can map the resulting
/// change lines straight back to storage rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDenomination {
    pub denomination_id: Option<String>,
    /// Face value in major units.
    pub value: i64,
    /// Pieces available to hand out.
    pub available: i64,
}

impl WorkingDenomination {
    /// Creates a working denomination with no persisted id.
    pub fn new(value: i64, available: i64) -> Self {
        Self {
            denomination_id: None,
            value,
            available,
        }
    }

    /// Creates a working denomination backed by a storage row.
    pub fn with_id(id: impl Into<String>, value: i64, available: i64) -> Self {
        Self {
            denomination_id: Some(id.into()),
            value,
            available,
        }
    }
}

// =============================================================================
// Search Budget
// =============================================================================

/// Hard cap on search effort, counted in expanded nodes.
///
/// The backtracking search is exponential in the worst case. A budget is
/// threaded through every call so a pathological stock profile degrades into
/// a reported error instead of a hung till.
///
/// `exhausted()` flips only when a step is actually *refused*, so a search
/// that completes on exactly its last step still counts as a full answer.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    limit: u64,
    used: u64,
    exhausted: bool,
}

impl SearchBudget {
    /// Creates a budget allowing `limit` expanded nodes.
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            used: 0,
            exhausted: false,
        }
    }

    /// Spends one step. Returns `false` (and marks the budget exhausted)
    /// once the limit is hit.
    pub fn consume(&mut self) -> bool {
        if self.used >= self.limit {
            self.exhausted = true;
            false
        } else {
            self.used += 1;
            true
        }
    }

    /// True once a step has been refused, i.e. some search was truncated.
    pub const fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Steps spent so far.
    pub const fn used(&self) -> u64 {
        self.used
    }

    /// The configured limit.
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_STEP_LIMIT)
    }
}

// =============================================================================
// Decomposition
// =============================================================================

/// Splits `target` into denomination counts drawn from `denominations`.
///
/// Returns the first combination found as one line per used denomination,
/// in input order, or `None` when no combination exists within budget.
/// A zero target succeeds trivially with no lines; a negative target is
/// never representable.
///
/// Callers normally pass values sorted descending with empty slots filtered
/// out. Neither is required for correctness: order only changes which
/// solution is found first, and degenerate entries contribute nothing.
///
/// ## Example
/// ```rust
/// use till_core::change::{decompose, SearchBudget, WorkingDenomination};
///
/// let stock = vec![
///     WorkingDenomination::new(50, 1),
///     WorkingDenomination::new(20, 3),
/// ];
/// let mut budget = SearchBudget::default();
///
/// let lines = decompose(60, &stock, &mut budget).unwrap();
/// assert_eq!(lines.len(), 1);
/// assert_eq!((lines[0].value, lines[0].count), (20, 3));
/// ```
pub fn decompose(
    target: i64,
    denominations: &[WorkingDenomination],
    budget: &mut SearchBudget,
) -> Option<Vec<DenominationLine>> {
    if target == 0 {
        return Some(Vec::new());
    }
    if target < 0 {
        return None;
    }

    let mut lines = Vec::new();
    if search(target, 0, denominations, &mut lines, budget) {
        Some(lines)
    } else {
        None
    }
}

/// Depth-first search over per-denomination use counts.
///
/// At each index, tries `use_count` from `max_use` down to zero and recurses
/// on the remainder. `lines` is the shared accumulator: pushed before a
/// recursive attempt, popped when that attempt fails, so on success it holds
/// exactly the used denominations.
fn search(
    remaining: i64,
    index: usize,
    denominations: &[WorkingDenomination],
    lines: &mut Vec<DenominationLine>,
    budget: &mut SearchBudget,
) -> bool {
    if remaining == 0 {
        return true;
    }
    if index >= denominations.len() {
        return false;
    }
    if !budget.consume() {
        return false;
    }

    let denom = &denominations[index];

    // Degenerate entries (non-positive value, empty slot) contribute nothing.
    let max_use = if denom.value <= 0 || denom.available <= 0 {
        0
    } else {
        (remaining / denom.value).min(denom.available)
    };

    for use_count in (0..=max_use).rev() {
        if use_count > 0 {
            lines.push(DenominationLine {
                denomination_id: denom.denomination_id.clone(),
                value: denom.value,
                count: use_count,
            });
        }

        if search(
            remaining - use_count * denom.value,
            index + 1,
            denominations,
            lines,
            budget,
        ) {
            return true;
        }

        if use_count > 0 {
            lines.pop();
        }
    }

    false
}

// =============================================================================
// Top-Up Probe
// =============================================================================

/// Looks for the smallest extra payment that would make change feasible.
///
/// Tries `target + extra` for `extra` in `1..=bound` against the same
/// denominations and returns the first extra that decomposes. The probe is a
/// heuristic: it does not model which notes the hypothetical extra payment
/// would arrive in, it only asks whether a nearby rounder amount is payable
/// from the stock already on hand.
///
/// Returns `None` when no extra within the bound helps, or when the budget
/// runs out mid-probe (a truncated probe proves nothing, so no suggestion
/// is better than a wrong one).
pub fn find_top_up(
    target: i64,
    denominations: &[WorkingDenomination],
    bound: i64,
    budget: &mut SearchBudget,
) -> Option<i64> {
    for extra in 1..=bound {
        if decompose(target + extra, denominations, budget).is_some() {
            return Some(extra);
        }
        if budget.exhausted() {
            return None;
        }
    }
    None
}

// =============================================================================
// Unit Tests
// =============================================================================
