//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done in `Decimal`, then converted to `f64` (2 places) for
//! storage and serialization.

use rust_decimal::prelude::*;
use shared::error::ErrorCode;
use shared::models::OrderLine;

use crate::core::{EngineError, EngineResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Requested quantity clamped to at least 1 (missing → 1)
#[inline]
pub fn clamp_quantity(quantity: Option<i64>) -> i64 {
    quantity.unwrap_or(1).max(1)
}

/// Reject prices that cannot be summed
pub fn require_valid_price(product_id: i64, price: f64) -> EngineResult<()> {
    if !price.is_finite() || price < 0.0 {
        tracing::error!(product_id, price, "Product has an invalid price");
        return Err(EngineError::InvalidProduct(product_id));
    }
    Ok(())
}

/// unit_price × quantity
#[inline]
pub fn line_total(unit_price: f64, quantity: i64) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// `total + unit_price × quantity`, rejecting sums `Decimal` cannot hold
pub fn add_line(total: Decimal, unit_price: f64, quantity: i64) -> EngineResult<Decimal> {
    to_decimal(unit_price)
        .checked_mul(Decimal::from(quantity))
        .and_then(|line| total.checked_add(line))
        .ok_or_else(|| EngineError::InvalidInput {
            code: ErrorCode::ValueOutOfRange,
            message: format!("order total overflows at quantity {quantity} × {unit_price}"),
        })
}

/// Sum of all lines
pub fn sum_lines(lines: &[OrderLine]) -> Decimal {
    lines
        .iter()
        .map(|l| line_total(l.unit_price, l.quantity))
        .sum()
}

/// Whether a stored total equals the sum of its lines (within 0.01)
pub fn total_matches(total: f64, lines: &[OrderLine]) -> bool {
    (to_decimal(total) - sum_lines(lines)).abs() < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price: f64, quantity: i64) -> OrderLine {
        OrderLine {
            id: 0,
            order_id: 0,
            product_id: 0,
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(None), 1);
        assert_eq!(clamp_quantity(Some(0)), 1);
        assert_eq!(clamp_quantity(Some(-3)), 1);
        assert_eq!(clamp_quantity(Some(7)), 7);
        // no upper bound
        assert_eq!(clamp_quantity(Some(250_000)), 250_000);
    }

    #[test]
    fn test_add_line() {
        let total = add_line(Decimal::ZERO, 0.1, 3).unwrap();
        let total = add_line(total, 2.5, 250_000).unwrap();
        assert_eq!(to_f64(total), 625_000.3);

        let err = add_line(Decimal::MAX, 1.0, 1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_sum_avoids_float_drift() {
        // 0.1 * 3 in f64 is 0.30000000000000004
        let lines = vec![line(0.1, 3), line(0.2, 1)];
        assert_eq!(to_f64(sum_lines(&lines)), 0.5);
        assert!(total_matches(0.5, &lines));
        assert!(!total_matches(0.52, &lines));
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
        assert_eq!(to_f64(line_total(10.0, 2) + line_total(5.0, 1)), 25.0);
    }

    #[test]
    fn test_invalid_price_rejected() {
        assert!(require_valid_price(1, f64::NAN).is_err());
        assert!(require_valid_price(1, -1.0).is_err());
        assert!(require_valid_price(1, 0.0).is_ok());
    }
}
