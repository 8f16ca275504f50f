//! Request and response shapes exchanged over HTTP (camelCase JSON).

pub mod category;
pub mod category_attribute;
pub mod product;
pub mod purchase;
pub mod vendor;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::borrow::Cow;
use validator::ValidationError;

/// Largest amount a `DECIMAL(16, 2)` column holds.
pub const MAX_AMOUNT: Decimal = dec!(99999999999999.99);

pub(crate) fn default_true() -> bool {
    true
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Rejects strings made only of whitespace.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "must not be blank"));
    }
    Ok(())
}

pub(crate) fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(invalid("negative_amount", "must not be negative"));
    }
    if *value > MAX_AMOUNT {
        return Err(invalid("amount_too_large", "must not exceed 99999999999999.99"));
    }
    Ok(())
}

/// Unit prices must be at least one cent.
pub(crate) fn unit_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value < dec!(0.01) {
        return Err(invalid("unit_price", "must be at least 0.01"));
    }
    if *value > MAX_AMOUNT {
        return Err(invalid("amount_too_large", "must not exceed 99999999999999.99"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("Shirts").is_ok());
    }

    #[test]
    fn amount_rules() {
        assert!(non_negative_amount(&dec!(0)).is_ok());
        assert!(non_negative_amount(&dec!(-0.01)).is_err());
        assert!(unit_price(&dec!(0.01)).is_ok());
        assert!(unit_price(&dec!(0.009)).is_err());
    }

    #[test]
    fn amounts_beyond_the_column_are_rejected() {
        assert!(unit_price(&MAX_AMOUNT).is_ok());
        assert!(unit_price(&(MAX_AMOUNT + dec!(0.01))).is_err());
        assert!(non_negative_amount(&Decimal::MAX).is_err());
    }
}
