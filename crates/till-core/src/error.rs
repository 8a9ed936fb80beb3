//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Settlement and pricing failures                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → whatever sits on top    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (values, amounts, codes)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Settlement and pricing failures.
///
/// These are reported results, not panics: a failed settlement implies zero
/// side effects, and the caller decides what to do next.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A tendered value is outside the legal denomination set.
    ///
    /// ## When This Occurs
    /// - Customer hands over a note the shop does not recognize (e.g. 25)
    /// - Caller passes garbage values
    ///
    /// Both lists are sorted descending. The check is total: if any line is
    /// illegal, no partial processing occurs.
    #[error(
        "Invalid denomination values: {}. Valid denominations: {}",
        join_values(.invalid),
        join_values(.legal)
    )]
    InvalidDenomination { invalid: Vec<i64>, legal: Vec<i64> },

    /// Tendered amount is below the order total.
    ///
    /// ## When This Occurs
    /// - Customer underpays; `shortfall` is exactly total − paid
    #[error(
        "Paid amount ({paid}) is less than the total ({total}). \
         Customer needs to pay {shortfall} more."
    )]
    InsufficientPayment {
        paid: Money,
        total: Money,
        shortfall: Money,
    },

    /// Exact change cannot be formed from shop stock plus the tendered cash.
    ///
    /// `suggestion` is the smallest extra amount that would make change
    /// feasible, when the bounded forward search found one; `None` means no
    /// top-up within the search bound helps.
    #[error(
        "Cannot give exact change for balance {balance}. {}",
        change_hint(.balance, .suggestion)
    )]
    ChangeInfeasible {
        balance: Money,
        suggestion: Option<Money>,
    },

    /// The backtracking search hit its step budget before resolving.
    ///
    /// Distinct from [`CoreError::ChangeInfeasible`]: the engine does not
    /// know whether change was possible, only that it ran out of budget.
    #[error("Change search exceeded {limit} steps")]
    SearchLimitExceeded { limit: u64 },

    /// Insufficient product stock to fill an order line.
    #[error(
        "Insufficient stock for '{name}' ({code}). \
         Available: {available}, Requested: {requested}"
    )]
    InsufficientStock {
        code: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before settlement or pricing logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad characters in a product code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., the same product code twice in one order).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Message Helpers
// =============================================================================

/// Joins denomination values as "500, 200, 100" for error messages.
fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Second sentence of the infeasible-change message, with or without a
/// top-up suggestion.
fn change_hint(balance: &Money, suggestion: &Option<Money>) -> String {
    match suggestion {
        Some(extra) => format!(
            "If customer pays {} more, shop can return {} as change.",
            extra,
            *balance + *extra
        ),
        None => "Customer needs to pay exact amount or provide different denominations."
            .to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_denomination_message() {
        let err = CoreError::InvalidDenomination {
            invalid: vec![25],
            legal: vec![500, 200, 100, 50, 20, 10, 5, 2, 1],
        };
        assert_eq!(
            err.to_string(),
            "Invalid denomination values: 25. \
             Valid denominations: 500, 200, 100, 50, 20, 10, 5, 2, 1"
        );
    }

    #[test]
    fn test_insufficient_payment_message() {
        let err = CoreError::InsufficientPayment {
            paid: Money::from_major(450),
            total: Money::from_major(500),
            shortfall: Money::from_major(50),
        };
        assert_eq!(
            err.to_string(),
            "Paid amount (450.00) is less than the total (500.00). \
             Customer needs to pay 50.00 more."
        );
    }

    #[test]
    fn test_change_infeasible_messages() {
        let plain = CoreError::ChangeInfeasible {
            balance: Money::from_major(250),
            suggestion: None,
        };
        assert_eq!(
            plain.to_string(),
            "Cannot give exact change for balance 250.00. \
             Customer needs to pay exact amount or provide different denominations."
        );

        let hinted = CoreError::ChangeInfeasible {
            balance: Money::from_major(30),
            suggestion: Some(Money::from_major(10)),
        };
        assert_eq!(
            hinted.to_string(),
            "Cannot give exact change for balance 30.00. \
             If customer pays 10.00 more, shop can return 40.00 as change."
        );
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            code: "P100".to_string(),
            name: "Detergent".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 'Detergent' (P100). Available: 3, Requested: 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "payment lines".to_string(),
        };
        assert_eq!(err.to_string(), "payment lines is required");

        let err = ValidationError::MustBePositive {
            field: "count".to_string(),
        };
        assert_eq!(err.to_string(), "count must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "order total".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
