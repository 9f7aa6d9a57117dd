//! Monetary values as reported by eBay.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Display symbols for the currencies eBay quotes most often. Everything
/// else renders as a plain `"<CODE> "` prefix.
const CURRENCY_SYMBOLS: [(&str, &str); 4] =
    [("AUD", "AU$"), ("CAD", "CA$"), ("GBP", "£"), ("USD", "$")];

/// An immutable currency-code/amount pair.
///
/// eBay ships these as mappings with a `currencyID` attribute and the
/// decimal amount as text content, e.g.
/// `{"currencyID": "GBP", "content": "5.99"}`.
///
/// # Example
///
/// ```rust
/// use ebay_shopping::types::Money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let price = Money::new("GBP", Decimal::from_str("5.99123").unwrap());
/// assert_eq!(price.format(), "£5.99");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    currency_id: String,
    amount: Decimal,
}

impl Money {
    /// Creates a money value directly.
    pub fn new(currency_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            currency_id: currency_id.into(),
            amount,
        }
    }

    /// Builds a money value from a parsed currency mapping.
    ///
    /// Returns `None` when either the `currencyID` or `content` key is
    /// absent, or the amount is not a decimal string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let currency_id = value.get("currencyID")?.as_str()?;
        let amount = Decimal::from_str(value.get("content")?.as_str()?).ok()?;
        Some(Self::new(currency_id, amount))
    }

    /// The ISO currency code, e.g. `"GBP"`.
    pub fn currency_id(&self) -> &str {
        &self.currency_id
    }

    /// The unrounded amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Renders the amount with its currency symbol and exactly two fraction
    /// digits, rounding half away from zero.
    pub fn format(&self) -> String {
        let amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let symbol = CURRENCY_SYMBOLS
            .iter()
            .find(|(code, _)| *code == self.currency_id)
            .map(|(_, symbol)| *symbol);
        match symbol {
            Some(symbol) => format!("{symbol}{amount:.2}"),
            None => format!("{} {amount:.2}", self.currency_id),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn builds_from_a_currency_mapping() {
        let money = Money::from_value(&json!({"currencyID": "GBP", "content": "5.99"})).unwrap();
        assert_eq!(money.currency_id(), "GBP");
        assert_eq!(money.amount(), dec!(5.99));
    }

    #[test]
    fn missing_keys_yield_none() {
        assert!(Money::from_value(&json!({"currencyID": "GBP"})).is_none());
        assert!(Money::from_value(&json!({"content": "5.99"})).is_none());
        assert!(Money::from_value(&json!("5.99")).is_none());
    }

    #[test]
    fn non_decimal_content_yields_none() {
        assert!(Money::from_value(&json!({"currencyID": "GBP", "content": "cheap"})).is_none());
    }

    #[test]
    fn known_currencies_format_with_their_symbol() {
        assert_eq!(Money::new("GBP", dec!(5.99123)).format(), "£5.99");
        assert_eq!(Money::new("USD", dec!(5.99123)).format(), "$5.99");
        assert_eq!(Money::new("AUD", dec!(5.99123)).format(), "AU$5.99");
        assert_eq!(Money::new("CAD", dec!(5.99123)).format(), "CA$5.99");
    }

    #[test]
    fn unknown_currencies_format_with_code_prefix() {
        assert_eq!(Money::new("EUR", dec!(5.99123)).format(), "EUR 5.99");
        assert_eq!(Money::new("FOO", dec!(5.99123)).format(), "FOO 5.99");
    }

    #[test]
    fn amounts_are_padded_to_two_fraction_digits() {
        assert_eq!(Money::new("GBP", dec!(5)).format(), "£5.00");
        assert_eq!(Money::new("GBP", dec!(5.9)).format(), "£5.90");
        assert_eq!(Money::new("GBP", dec!(5.995)).format(), "£6.00");
    }

    #[test]
    fn display_matches_format() {
        assert_eq!(Money::new("USD", dec!(1.5)).to_string(), "$1.50");
    }
}
