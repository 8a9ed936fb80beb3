//! # Settlement
//!
//! Validates a tendered payment against an order total and computes the
//! exact physical change to hand back, drawn from shop stock plus the cash
//! just received.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  settle(total, payment, snapshot, legal)                                │
//! │                                                                         │
//! │  1. Validate inputs (positive total, non-empty lines, counts > 0)      │
//! │  2. Legality: every tendered value ∈ legal set, else                   │
//! │     InvalidDenomination listing all offenders                          │
//! │  3. paid = Σ value × count; paid < total → InsufficientPayment         │
//! │  4. balance = paid − total; balance == 0 → done, no change             │
//! │  5. Working stock = snapshot + tender (received cash is immediately    │
//! │     available for change), merged per value                            │
//! │  6. Filter empty slots, sort descending by value                       │
//! │  7. decompose(balance) over the working stock                          │
//! │       ├── solved   → Settlement with change lines                      │
//! │       ├── budget   → SearchLimitExceeded                               │
//! │       └── infeasible → probe top-ups 1..=bound, then                   │
//! │                        ChangeInfeasible { suggestion? }                │
//! │                                                                         │
//! │  Pure throughout: the snapshot is never mutated, a failure implies     │
//! │  zero side effects, and identical inputs give identical results.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller owns persistence: on success it applies the change decrements
//! and paid increments to its store inside one transaction (till-db's
//! `settle_order` does exactly that).

use std::collections::BTreeMap;

use crate::change::{decompose, find_top_up, SearchBudget, WorkingDenomination};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DenominationLine, DenominationSet, PaymentLine, Settlement, TillSnapshot};
use crate::validation::{validate_order_total, validate_payment_lines};
use crate::DEFAULT_SEARCH_STEP_LIMIT;

// =============================================================================
// Options
// =============================================================================

/// Where the top-up probe stops looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionBound {
    /// Bound by the smallest value the till knows: the minimum over snapshot
    /// rows (zero-count rows included) and tendered values.
    ///
    /// This is a heuristic cutoff, not a proven minimal bound. With the full
    /// legal set seeded as stock rows it degenerates to the smallest legal
    /// value; with a sparse stock table a feasible top-up just past the
    /// bound can be missed. Use [`SuggestionBound::Fixed`] to widen it.
    SmallestKnownValue,

    /// Probe extras `1..=n` regardless of stock. Zero disables the probe.
    Fixed(i64),
}

/// Settlement tuning knobs.
///
/// The defaults suit a till with a handful of legal values; the step limit
/// exists so a pathological stock profile degrades into a reported error
/// instead of an unbounded search.
#[derive(Debug, Clone)]
pub struct SettleOptions {
    /// Search budget shared by the main decomposition and the top-up probe.
    pub step_limit: u64,

    /// How far the top-up probe reaches when change is infeasible.
    pub suggestion_bound: SuggestionBound,
}

impl Default for SettleOptions {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_SEARCH_STEP_LIMIT,
            suggestion_bound: SuggestionBound::SmallestKnownValue,
        }
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Settles a payment with default options. See [`settle_with`].
pub fn settle(
    total: Money,
    payment: &[PaymentLine],
    snapshot: &TillSnapshot,
    legal: &DenominationSet,
) -> CoreResult<Settlement> {
    settle_with(total, payment, snapshot, legal, &SettleOptions::default())
}

/// Settles a payment: validates legality and sufficiency, then computes an
/// exact change decomposition from the combined pool of shop stock and the
/// cash just tendered.
///
/// The engine is a pure function of its inputs. On failure nothing has
/// happened; on success the returned [`Settlement`] tells the caller which
/// stock deltas to persist.
///
/// ## Example
/// ```rust
/// use till_core::money::Money;
/// use till_core::settle::settle;
/// use till_core::types::{DenominationSet, PaymentLine, StockLevel, TillSnapshot};
///
/// let legal = DenominationSet::default();
/// let snapshot = TillSnapshot::new(vec![
///     StockLevel::new(100, 1),
///     StockLevel::new(50, 1),
///     StockLevel::new(20, 2),
/// ]);
///
/// let result = settle(
///     Money::from_major(180),
///     &[PaymentLine::new(200, 1)],
///     &snapshot,
///     &legal,
/// )
/// .unwrap();
///
/// assert_eq!(result.balance, Money::from_major(20));
/// assert_eq!(result.change.len(), 1);
/// assert_eq!((result.change[0].value, result.change[0].count), (20, 1));
/// ```
pub fn settle_with(
    total: Money,
    payment: &[PaymentLine],
    snapshot: &TillSnapshot,
    legal: &DenominationSet,
    options: &SettleOptions,
) -> CoreResult<Settlement> {
    validate_order_total(total)?;
    validate_payment_lines(payment)?;

    // Legality is total: one illegal value anywhere fails the whole payment
    // before any other processing.
    let mut invalid: Vec<i64> = payment
        .iter()
        .map(|line| line.value)
        .filter(|value| !legal.contains(*value))
        .collect();
    if !invalid.is_empty() {
        invalid.sort_unstable_by(|a, b| b.cmp(a));
        invalid.dedup();
        return Err(CoreError::InvalidDenomination {
            invalid,
            legal: legal.values_desc(),
        });
    }

    let paid_amount: Money = payment.iter().map(PaymentLine::amount).sum();
    if paid_amount < total {
        return Err(CoreError::InsufficientPayment {
            paid: paid_amount,
            total,
            shortfall: total - paid_amount,
        });
    }
    let balance = paid_amount - total;

    // Duplicate tendered values are summed before any downstream use.
    let mut paid_by_value: BTreeMap<i64, i64> = BTreeMap::new();
    for line in payment {
        *paid_by_value.entry(line.value).or_insert(0) += line.count;
    }

    // Working stock: value → (row id, pieces), merging snapshot rows with
    // the tender. Zero-count rows stay in the map; they mark values the
    // till knows and anchor the suggestion bound.
    let mut working: BTreeMap<i64, (Option<String>, i64)> = BTreeMap::new();
    for row in snapshot.entries() {
        let slot = working.entry(row.value).or_insert((None, 0));
        slot.1 += row.count;
        if slot.0.is_none() {
            slot.0 = row.denomination_id.clone();
        }
    }
    for (&value, &count) in &paid_by_value {
        working.entry(value).or_insert((None, 0)).1 += count;
    }

    let paid = paid_lines(&paid_by_value, &working);

    if balance.is_zero() {
        return Ok(Settlement {
            paid_amount,
            balance,
            paid,
            change: Vec::new(),
        });
    }

    // Whole-unit denominations cannot express a fractional balance, so
    // there is nothing to search for.
    let Some(target) = balance.to_major_exact() else {
        return Err(CoreError::ChangeInfeasible {
            balance,
            suggestion: None,
        });
    };

    let denominations: Vec<WorkingDenomination> = working
        .iter()
        .rev()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(&value, (id, count))| WorkingDenomination {
            denomination_id: id.clone(),
            value,
            available: *count,
        })
        .collect();

    let mut budget = SearchBudget::new(options.step_limit);
    if let Some(change) = decompose(target, &denominations, &mut budget) {
        return Ok(Settlement {
            paid_amount,
            balance,
            paid,
            change,
        });
    }

    // A truncated search proves nothing; only a completed one may report
    // infeasibility.
    if budget.exhausted() {
        return Err(CoreError::SearchLimitExceeded {
            limit: options.step_limit,
        });
    }

    let bound = match options.suggestion_bound {
        SuggestionBound::SmallestKnownValue => working.keys().next().copied().unwrap_or(0),
        SuggestionBound::Fixed(bound) => bound,
    };
    let suggestion = find_top_up(target, &denominations, bound, &mut budget).map(Money::from_major);

    Err(CoreError::ChangeInfeasible {
        balance,
        suggestion,
    })
}

/// Normalized tender: one line per distinct value, sorted descending,
/// mapped to its known row identity where the snapshot has one.
fn paid_lines(
    paid_by_value: &BTreeMap<i64, i64>,
    working: &BTreeMap<i64, (Option<String>, i64)>,
) -> Vec<DenominationLine> {
    paid_by_value
        .iter()
        .rev()
        .map(|(&value, &count)| DenominationLine {
            denomination_id: working.get(&value).and_then(|(id, _)| id.clone()),
            value,
            count,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockLevel;
    use crate::DEFAULT_DENOMINATION_VALUES;

    fn legal() -> DenominationSet {
        DenominationSet::default()
    }

    fn snapshot(rows: &[(i64, i64)]) -> TillSnapshot {
        rows.iter()
            .map(|&(value, count)| StockLevel::new(value, count))
            .collect::<Vec<_>>()
            .into()
    }

    fn pay(lines: &[(i64, i64)]) -> Vec<PaymentLine> {
        lines
            .iter()
            .map(|&(value, count)| PaymentLine::new(value, count))
            .collect()
    }

    fn pairs(lines: &[DenominationLine]) -> Vec<(i64, i64)> {
        lines.iter().map(|l| (l.value, l.count)).collect()
    }

    #[test]
    fn test_exact_payment_needs_no_change() {
        let result = settle(
            Money::from_major(99),
            &pay(&[(50, 1), (20, 2), (5, 1), (2, 2)]),
            &snapshot(&[(100, 1)]),
            &legal(),
        )
        .unwrap();

        assert_eq!(result.paid_amount, Money::from_major(99));
        assert_eq!(result.balance, Money::zero());
        assert!(result.change.is_empty());
        assert_eq!(pairs(&result.paid), vec![(50, 1), (20, 2), (5, 1), (2, 2)]);
    }

    #[test]
    fn test_small_balance_paid_from_stock() {
        let snapshot = TillSnapshot::new(vec![
            StockLevel::with_id("d-100", 100, 1),
            StockLevel::with_id("d-50", 50, 1),
            StockLevel::with_id("d-20", 20, 2),
        ]);

        let result = settle(
            Money::from_major(180),
            &pay(&[(200, 1)]),
            &snapshot,
            &legal(),
        )
        .unwrap();

        assert_eq!(result.paid_amount, Money::from_major(200));
        assert_eq!(result.balance, Money::from_major(20));
        assert_eq!(pairs(&result.change), vec![(20, 1)]);
        assert_eq!(result.change[0].denomination_id.as_deref(), Some("d-20"));
        assert_eq!(pairs(&result.paid), vec![(200, 1)]);
        assert_eq!(result.paid[0].denomination_id, None);
    }

    #[test]
    fn test_rejects_illegal_denomination_values() {
        let err = settle(
            Money::from_major(100),
            &pay(&[(25, 1), (3, 2), (500, 1)]),
            &snapshot(&[]),
            &legal(),
        )
        .unwrap_err();

        match err {
            CoreError::InvalidDenomination { invalid, legal } => {
                assert_eq!(invalid, vec![25, 3]);
                assert_eq!(legal, vec![500, 200, 100, 50, 20, 10, 5, 2, 1]);
            }
            other => panic!("expected InvalidDenomination, got {other:?}"),
        }
    }

    #[test]
    fn test_reports_exact_shortfall() {
        let err = settle(
            Money::from_major(500),
            &pay(&[(100, 4), (50, 1)]),
            &snapshot(&[]),
            &legal(),
        )
        .unwrap_err();

        match err {
            CoreError::InsufficientPayment {
                paid,
                total,
                shortfall,
            } => {
                assert_eq!(paid, Money::from_major(450));
                assert_eq!(total, Money::from_major(500));
                assert_eq!(shortfall, Money::from_major(50));
            }
            other => panic!("expected InsufficientPayment, got {other:?}"),
        }
    }

    #[test]
    fn test_infeasible_when_only_large_notes_exist() {
        // Every legal value is a known (zero-count) row, so the probe bound
        // is 1, and one extra unit does not make 250 payable from a lone
        // 500 note.
        let zero_rows: Vec<StockLevel> = DEFAULT_DENOMINATION_VALUES
            .iter()
            .map(|&value| StockLevel::new(value, 0))
            .collect();

        let err = settle(
            Money::from_major(250),
            &pay(&[(500, 1)]),
            &TillSnapshot::new(zero_rows),
            &legal(),
        )
        .unwrap_err();

        match err {
            CoreError::ChangeInfeasible {
                balance,
                suggestion,
            } => {
                assert_eq!(balance, Money::from_major(250));
                assert_eq!(suggestion, None);
            }
            other => panic!("expected ChangeInfeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_payment_lines_are_merged() {
        let result = settle(
            Money::from_major(380),
            &pay(&[(200, 1), (200, 1)]),
            &snapshot(&[(20, 1)]),
            &legal(),
        )
        .unwrap();

        assert_eq!(result.paid_amount, Money::from_major(400));
        assert_eq!(pairs(&result.paid), vec![(200, 2)]);
        assert_eq!(pairs(&result.change), vec![(20, 1)]);
    }

    #[test]
    fn test_tolerates_legal_value_missing_from_stock() {
        let snapshot = TillSnapshot::new(vec![
            StockLevel::with_id("d-200", 200, 1),
            StockLevel::with_id("d-100", 100, 1),
        ]);

        let result = settle(
            Money::from_major(300),
            &pay(&[(500, 1)]),
            &snapshot,
            &legal(),
        )
        .unwrap();

        assert_eq!(result.balance, Money::from_major(200));
        assert_eq!(pairs(&result.change), vec![(200, 1)]);
        assert_eq!(result.change[0].denomination_id.as_deref(), Some("d-200"));
        assert_eq!(result.paid[0].denomination_id, None);
    }

    #[test]
    fn test_tendered_cash_feeds_change_pool() {
        // The shop holds nothing; change comes back out of the notes the
        // customer just handed over.
        let result = settle(
            Money::from_major(60),
            &pay(&[(20, 4)]),
            &TillSnapshot::empty(),
            &legal(),
        )
        .unwrap();

        assert_eq!(result.balance, Money::from_major(20));
        assert_eq!(pairs(&result.change), vec![(20, 1)]);
    }

    #[test]
    fn test_settlement_is_pure() {
        let snapshot = snapshot(&[(100, 1), (50, 1), (20, 2)]);
        let payment = pay(&[(200, 1)]);

        let first = settle(Money::from_major(180), &payment, &snapshot, &legal()).unwrap();
        let second = settle(Money::from_major(180), &payment, &snapshot, &legal()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_suggests_minimal_top_up() {
        let snapshot = TillSnapshot::new(vec![StockLevel::with_id("d-50", 50, 1)]);

        let err = settle(
            Money::from_major(70),
            &pay(&[(100, 1)]),
            &snapshot,
            &legal(),
        )
        .unwrap_err();

        match &err {
            CoreError::ChangeInfeasible {
                balance,
                suggestion,
            } => {
                assert_eq!(*balance, Money::from_major(30));
                assert_eq!(*suggestion, Some(Money::from_major(20)));
            }
            other => panic!("expected ChangeInfeasible, got {other:?}"),
        }

        assert_eq!(
            err.to_string(),
            "Cannot give exact change for balance 30.00. \
             If customer pays 20.00 more, shop can return 50.00 as change."
        );
    }

    #[test]
    fn test_suggestion_bound_is_configurable() {
        let snapshot = TillSnapshot::new(vec![StockLevel::with_id("d-50", 50, 1)]);
        let options = SettleOptions {
            suggestion_bound: SuggestionBound::Fixed(10),
            ..SettleOptions::default()
        };

        let err = settle_with(
            Money::from_major(70),
            &pay(&[(100, 1)]),
            &snapshot,
            &legal(),
            &options,
        )
        .unwrap_err();

        match err {
            CoreError::ChangeInfeasible { suggestion, .. } => assert_eq!(suggestion, None),
            other => panic!("expected ChangeInfeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_fractional_balance_cannot_be_changed() {
        let err = settle(
            Money::from_major_minor(249, 50),
            &pay(&[(500, 1)]),
            &snapshot(&[(100, 5), (50, 5), (1, 5)]),
            &legal(),
        )
        .unwrap_err();

        match err {
            CoreError::ChangeInfeasible {
                balance,
                suggestion,
            } => {
                assert_eq!(balance, Money::from_major_minor(250, 50));
                assert_eq!(suggestion, None);
            }
            other => panic!("expected ChangeInfeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_search_limit_surfaces_as_error() {
        // All stocked values are even, the balance is odd, and the budget is
        // far too small to prove that.
        let options = SettleOptions {
            step_limit: 5,
            ..SettleOptions::default()
        };

        let err = settle_with(
            Money::from_major(403),
            &pay(&[(500, 1)]),
            &snapshot(&[(50, 2), (20, 5), (2, 50)]),
            &legal(),
            &options,
        )
        .unwrap_err();

        match err {
            CoreError::SearchLimitExceeded { limit } => assert_eq!(limit, 5),
            other => panic!("expected SearchLimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        let snapshot = snapshot(&[(100, 1)]);

        let zero_total = settle(Money::zero(), &pay(&[(100, 1)]), &snapshot, &legal());
        assert!(matches!(zero_total, Err(CoreError::Validation(_))));

        let no_lines = settle(Money::from_major(100), &[], &snapshot, &legal());
        assert!(matches!(no_lines, Err(CoreError::Validation(_))));

        let zero_count = settle(
            Money::from_major(100),
            &pay(&[(100, 0)]),
            &snapshot,
            &legal(),
        );
        assert!(matches!(zero_count, Err(CoreError::Validation(_))));
    }
}
