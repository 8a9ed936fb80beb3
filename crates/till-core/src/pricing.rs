//! # Order Pricing
//!
//! Prices an order and checks product stock before it goes anywhere near
//! payment.
//!
//! ## Pricing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Order Line                                                             │
//! │                                                                         │
//! │  subtotal = unit price × quantity                                       │
//! │  tax      = subtotal × tax rate   (basis points, rounded half-up)      │
//! │  total    = subtotal + tax                                              │
//! │                                                                         │
//! │  Order totals are the per-line sums. Prices are frozen into the line   │
//! │  when it is built, so a later catalog price change never reprices an   │
//! │  order already being rung up.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock checking is a plain comparison against the quantities the caller
//! read from its store; like settlement, nothing here touches storage.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::{
    validate_order_size, validate_product_code, validate_product_name, validate_quantity,
    validate_unit_price,
};

// =============================================================================
// Order Line
// =============================================================================

/// One product line in an order, with price and tax rate frozen at the time
/// the line was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product code (unique per order).
    pub code: String,

    /// Product display name.
    pub name: String,

    /// Unit price frozen at line creation.
    pub unit_price: Money,

    /// Tax rate frozen at line creation.
    pub tax_rate: TaxRate,

    /// Quantity ordered.
    pub quantity: i64,
}

impl OrderLine {
    /// Creates an order line.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        tax_rate: TaxRate,
        quantity: i64,
    ) -> Self {
        OrderLine {
            code: code.into(),
            name: name.into(),
            unit_price,
            tax_rate,
            quantity,
        }
    }

    /// Subtotal before tax (unit price × quantity).
    #[inline]
    pub fn line_subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Tax amount for this line.
    #[inline]
    pub fn line_tax(&self) -> Money {
        self.line_subtotal().calculate_tax(self.tax_rate)
    }

    /// Line total including tax.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.line_subtotal() + self.line_tax()
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Summed totals for a priced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of line subtotals, before tax.
    pub subtotal: Money,

    /// Sum of line tax amounts.
    pub tax: Money,

    /// Grand total; what settlement is asked to collect.
    pub total: Money,
}

/// Prices an order: validates every line, rejects duplicate product codes,
/// and sums subtotal, tax, and total.
///
/// ## Example
/// ```rust
/// use till_core::money::Money;
/// use till_core::pricing::{price_order, OrderLine};
/// use till_core::types::TaxRate;
///
/// let lines = vec![
///     OrderLine::new("RICE-5KG", "Basmati Rice 5kg", Money::from_major(100), TaxRate::zero(), 2),
///     OrderLine::new("OIL-1L", "Cooking Oil 1L", Money::from_major(50), TaxRate::from_bps(1000), 1),
/// ];
///
/// let totals = price_order(&lines).unwrap();
/// assert_eq!(totals.subtotal, Money::from_major(250));
/// assert_eq!(totals.tax, Money::from_major(5));
/// assert_eq!(totals.total, Money::from_major(255));
/// ```
pub fn price_order(lines: &[OrderLine]) -> CoreResult<OrderTotals> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "order lines".to_string(),
        }
        .into());
    }
    validate_order_size(lines.len())?;

    let mut seen = HashSet::new();
    for line in lines {
        validate_product_code(&line.code)?;
        validate_product_name(&line.name)?;
        validate_unit_price(line.unit_price)?;
        validate_quantity(line.quantity)?;

        // One line per product; adjusting quantity is the way to buy more.
        if !seen.insert(line.code.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "product code".to_string(),
                value: line.code.clone(),
            }
            .into());
        }
    }

    let subtotal: Money = lines.iter().map(OrderLine::line_subtotal).sum();
    let tax: Money = lines.iter().map(OrderLine::line_tax).sum();

    Ok(OrderTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    })
}

// =============================================================================
// Stock Check
// =============================================================================

/// One product's requested quantity against what the caller's store holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    pub code: String,
    pub name: String,
    pub requested: i64,
    pub available: i64,
}

impl StockRequest {
    /// Creates a stock request.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        requested: i64,
        available: i64,
    ) -> Self {
        StockRequest {
            code: code.into(),
            name: name.into(),
            requested,
            available,
        }
    }
}

/// Checks every request against availability; the first shortage fails.
pub fn check_stock(requests: &[StockRequest]) -> CoreResult<()> {
    for request in requests {
        if request.available < request.requested {
            return Err(CoreError::InsufficientStock {
                code: request.code.clone(),
                name: request.name.clone(),
                available: request.available,
                requested: request.requested,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(code: &str, price_minor: i64, tax_bps: u32, quantity: i64) -> OrderLine {
        OrderLine::new(
            code,
            format!("{code} name"),
            Money::from_minor(price_minor),
            TaxRate::from_bps(tax_bps),
            quantity,
        )
    }

    #[test]
    fn test_line_math() {
        let line = line("SOAP-90", 1099, 825, 3);

        assert_eq!(line.line_subtotal(), Money::from_minor(3297));
        // 32.97 × 8.25% = 2.720025, rounds to 2.72
        assert_eq!(line.line_tax(), Money::from_minor(272));
        assert_eq!(line.line_total(), Money::from_minor(3569));
    }

    #[test]
    fn test_line_tax_rounds_half_up() {
        // 10.00 × 0.25% = 0.025 exactly, rounds up to 0.03
        let line = line("RICE-5KG", 1000, 25, 1);
        assert_eq!(line.line_tax(), Money::from_minor(3));
    }

    #[test]
    fn test_price_order_sums_lines() {
        let lines = vec![line("A-1", 10_000, 0, 2), line("B-2", 5_000, 1000, 1)];

        let totals = price_order(&lines).unwrap();
        assert_eq!(totals.subtotal, Money::from_minor(25_000));
        assert_eq!(totals.tax, Money::from_minor(500));
        assert_eq!(totals.total, Money::from_minor(25_500));
    }

    #[test]
    fn test_price_order_rejects_empty_order() {
        let err = price_order(&[]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_price_order_rejects_duplicate_codes() {
        let lines = vec![line("A-1", 1000, 0, 1), line("A-1", 1000, 0, 2)];

        let err = price_order(&lines).unwrap_err();
        match err {
            CoreError::Validation(ValidationError::Duplicate { value, .. }) => {
                assert_eq!(value, "A-1");
            }
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[test]
    fn test_price_order_validates_each_line() {
        let bad_quantity = vec![line("A-1", 1000, 0, 0)];
        assert!(matches!(
            price_order(&bad_quantity),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let bad_code = vec![line("", 1000, 0, 1)];
        assert!(matches!(
            price_order(&bad_code),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let bad_price = vec![line("A-1", -100, 0, 1)];
        assert!(matches!(
            price_order(&bad_price),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_check_stock_passes_when_available() {
        let requests = vec![
            StockRequest::new("A-1", "Item A", 3, 3),
            StockRequest::new("B-2", "Item B", 1, 10),
        ];
        assert!(check_stock(&requests).is_ok());
    }

    #[test]
    fn test_check_stock_reports_first_shortage() {
        let requests = vec![
            StockRequest::new("A-1", "Item A", 2, 5),
            StockRequest::new("B-2", "Item B", 4, 3),
            StockRequest::new("C-3", "Item C", 9, 0),
        ];

        let err = check_stock(&requests).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                code,
                available,
                requested,
                ..
            } => {
                assert_eq!(code, "B-2");
                assert_eq!(available, 3);
                assert_eq!(requested, 4);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }
}
