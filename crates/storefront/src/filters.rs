//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use rust_decimal::Decimal;

/// Formats a decimal amount as a dollar price.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(amount: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(*amount))
}

/// Format a decimal amount as a dollar price string.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(9999, 2)), "$99.99");
        assert_eq!(format_money(Decimal::new(5, 0)), "$5.00");
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
    }
}
