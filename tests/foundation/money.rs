//! Integration tests for currency amounts
//!
//! Tests construction, arithmetic, and formatting.

use trattoria_foundation::Money;

#[test]
fn units_and_cents_agree() {
    assert_eq!(Money::from_units(12), Money::from_cents(1200));
    assert_eq!(Money::from_units(12).cents(), 1200);
}

#[test]
fn line_total_is_price_times_amount() {
    let price = Money::from_cents(1250);
    assert_eq!(price * 3, Money::from_cents(3750));
    assert_eq!(price * 3 + Money::from_units(2), Money::from_cents(3950));
}

#[test]
fn negative_amounts_are_detectable() {
    assert!(Money::from_cents(-1).is_negative());
    assert!(!Money::ZERO.is_negative());
}

#[test]
fn display_uses_two_decimals() {
    assert_eq!(Money::from_cents(905).to_string(), "9.05");
    assert_eq!(Money::ZERO.to_string(), "0.00");
}
