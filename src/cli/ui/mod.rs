//! Text renderers for the ledger table and charts.

use rust_decimal::Decimal;

pub mod charts;
pub mod table;

/// Formats an amount with the currency symbol and two decimals.
pub fn format_amount(symbol: &str, value: Decimal) -> String {
    let value = value.round_dp(2).normalize();
    format!("{symbol}{value:.2}")
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{format_amount, Decimal};

    #[test]
    fn amounts_use_two_decimals() {
        assert_eq!(format_amount("₹", dec!(250)), "₹250.00");
        assert_eq!(format_amount("$", dec!(-12.5)), "$-12.50");
        assert_eq!(format_amount("₹", dec!(0.126)), "₹0.13");
    }

    #[test]
    fn amounts_that_round_to_zero_have_no_sign() {
        assert_eq!(format_amount("₹", dec!(-0.001)), "₹0.00");
        assert_eq!(format_amount("₹", Decimal::ZERO), "₹0.00");
    }
}
