use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when the numeric part of a price string is not a number.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid price {input:?}")]
pub struct PriceError {
    pub input: String,
    #[source]
    pub source: std::num::ParseFloatError,
}

/// Total price of an item together with its fees.
/// Numeric fields stay `0.0` when the page does not show them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Price without shipping, discounts or tax.
    pub base: f64,
    pub shipping: f64,
    pub tax: f64,
    pub discounts: f64,
    pub total: f64,
    /// Currency symbol or code, e.g. `$`, `£`, `RON`.
    pub currency: String,
    /// The text `total` was parsed from, e.g. `$1000` or `5500 RON`.
    pub total_string: String,
}

/// The priced fields a page can show for an offer or a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PriceField {
    Base,
    Promo,
    Shipping,
    Tax,
    Final,
}

impl Price {
    /// Store `amount` in the slot for `field`. The final price also keeps its
    /// currency and source text.
    pub(crate) fn set(&mut self, field: PriceField, amount: f64, currency: &str, text: &str) {
        match field {
            PriceField::Base => self.base = amount,
            PriceField::Promo => self.discounts = amount,
            PriceField::Shipping => self.shipping = amount,
            PriceField::Tax => self.tax = amount,
            PriceField::Final => {
                self.total = amount;
                self.currency = currency.to_string();
                self.total_string = text.to_string();
            }
        }
    }
}

/// Split a price string into its amount and currency.
///
/// Spaces and `+` are dropped, both `.` and `,` become a decimal point, digits
/// form the number and every other character is part of the currency.
/// Blank input means "no price" and yields `(0.0, "")`.
///
/// Thousands separators are not recognised: `"1,299.99"` collapses to
/// `"1.299.99"` and fails to parse.
pub fn parse_price(text: &str) -> Result<(f64, String), PriceError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok((0.0, String::new()));
    }

    let mut number = String::new();
    let mut currency = String::new();

    for c in text.chars() {
        match c {
            ' ' | '+' => {}
            '.' | ',' => number.push('.'),
            c if c.is_ascii_digit() => number.push(c),
            c => currency.push(c),
        }
    }

    let amount = number.parse::<f64>().map_err(|source| PriceError {
        input: text.to_string(),
        source,
    })?;

    Ok((amount, currency))
}
