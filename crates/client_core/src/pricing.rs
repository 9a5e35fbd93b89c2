//! Live price preview. Only adults pay; children never change the total.

use shared::domain::{FieldName, Money};

use crate::validation::parse_count;

pub fn price(adults: u32, price_per_adult: Money) -> Money {
    price_per_adult.times(adults)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub adults: u32,
    pub per_adult: Money,
    pub total: Money,
}

impl PriceQuote {
    pub fn new(adults: u32, per_adult: Money) -> Self {
        Self {
            adults,
            per_adult,
            total: price(adults, per_adult),
        }
    }

    /// Display text, e.g. `€30.00`.
    pub fn display(&self) -> String {
        self.total.to_string()
    }
}

/// Quotes the raw adults field. Text that is not a usable count prices as zero
/// adults; the field's own validation reports the problem.
pub fn quote_for_input(adults_raw: &str, per_adult: Money) -> PriceQuote {
    let adults = match adults_raw.trim() {
        "" => 0,
        raw => parse_count(FieldName::PersonsAdults, raw).unwrap_or(0),
    };
    PriceQuote::new(adults, per_adult)
}
