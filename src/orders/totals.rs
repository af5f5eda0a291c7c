//! Order Totals
//!
//! Deterministic monetary breakdown for orders. All arithmetic runs through
//! rust_decimal and results are stored as f64 rounded to 2 decimal places, so
//! the identity `total == subtotal + tax + shipping - discount` holds exactly
//! at that precision. Final figures are always recomputed server-side, never
//! trusted from client input.

use crate::db::models::{AmountType, OrderItem};
use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: unit price x quantity
pub fn line_total(price: f64, quantity: i64) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(quantity))
}

/// Sum of line totals
pub fn subtotal(items: &[OrderItem]) -> f64 {
    let sum = items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc + to_decimal(item.total));
    to_f64(sum)
}

/// Resolve a percentage-or-fixed value against a base amount
///
/// Percentage: `base * value / 100`; fixed: the value itself.
pub fn amount_of(kind: AmountType, value: f64, base: f64) -> f64 {
    match kind {
        AmountType::Percentage => {
            to_f64(to_decimal(base) * to_decimal(value) / Decimal::ONE_HUNDRED)
        }
        AmountType::Fixed => to_f64(to_decimal(value)),
    }
}

/// Full price breakdown for an order
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub shipping_cost: f64,
    pub total: f64,
}

/// Compute the breakdown from current item/tax/discount/shipping state
pub fn breakdown(
    subtotal: f64,
    tax_rate_percent: f64,
    shipping_cost: f64,
    discount_type: AmountType,
    discount_value: f64,
) -> Breakdown {
    let tax_amount = amount_of(AmountType::Percentage, tax_rate_percent, subtotal);
    let discount_amount = amount_of(discount_type, discount_value, subtotal);

    let total = to_f64(
        to_decimal(subtotal) + to_decimal(tax_amount) + to_decimal(shipping_cost)
            - to_decimal(discount_amount),
    );

    Breakdown {
        subtotal,
        tax_amount,
        discount_amount,
        shipping_cost,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    fn item(price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            product: RecordId::from_table_key("product", "p"),
            name: "item".to_string(),
            quantity,
            price,
            total: line_total(price, quantity),
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(19.99, 3), 59.97);
        assert_eq!(line_total(0.0, 5), 0.0);
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let items = vec![item(19.99, 3), item(5.5, 2)];
        assert_eq!(subtotal(&items), 70.97);
    }

    #[test]
    fn test_reference_breakdown() {
        // subtotal 100, tax 8%, shipping 5.99, no discount -> 113.99
        let b = breakdown(100.0, 8.0, 5.99, AmountType::Fixed, 0.0);
        assert_eq!(b.tax_amount, 8.0);
        assert_eq!(b.discount_amount, 0.0);
        assert_eq!(b.total, 113.99);
    }

    #[test]
    fn test_total_identity() {
        let b = breakdown(70.97, 8.0, 12.99, AmountType::Percentage, 10.0);
        let expected = to_f64(
            to_decimal(b.subtotal) + to_decimal(b.tax_amount) + to_decimal(b.shipping_cost)
                - to_decimal(b.discount_amount),
        );
        assert_eq!(b.total, expected);
    }

    #[test]
    fn test_percentage_discount() {
        let b = breakdown(200.0, 8.0, 0.0, AmountType::Percentage, 25.0);
        assert_eq!(b.discount_amount, 50.0);
        assert_eq!(b.total, 166.0);
    }

    #[test]
    fn test_fixed_discount() {
        let b = breakdown(50.0, 8.0, 5.99, AmountType::Fixed, 10.0);
        assert_eq!(b.discount_amount, 10.0);
        assert_eq!(b.total, 49.99);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 8% of 10.55 = 0.844 -> 0.84; 8% of 10.69 = 0.8552 -> 0.86
        assert_eq!(amount_of(AmountType::Percentage, 8.0, 10.55), 0.84);
        assert_eq!(amount_of(AmountType::Percentage, 8.0, 10.69), 0.86);
    }
}
