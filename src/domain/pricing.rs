use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Cents;

/// Current unit price per symbol. The ledger treats this as a black box and
/// re-queries on every operation; implementations must answer synchronously.
/// An unrecognized symbol prices at 0 - a sentinel, not an error.
pub trait PriceSource {
    fn price_of(&self, symbol: &str) -> Cents;
}

/// Fixed in-memory price table. Stands in for a live feed; anything
/// implementing [`PriceSource`] can replace it without touching the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPriceTable {
    prices: HashMap<String, Cents>,
}

impl StaticPriceTable {
    /// An empty table: every symbol prices at 0.
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn with_price(mut self, symbol: impl Into<String>, price_cents: Cents) -> Self {
        assert!(price_cents >= 0, "Prices cannot be negative");
        self.prices.insert(symbol.into(), price_cents);
        self
    }

    /// Symbols with a listed price, unordered.
    pub fn listed_symbols(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }
}

/// The reference listings: AAPL 150.00, TSLA 750.00, GOOGL 2800.00.
impl Default for StaticPriceTable {
    fn default() -> Self {
        Self::new()
            .with_price("AAPL", 15000)
            .with_price("TSLA", 75000)
            .with_price("GOOGL", 280000)
    }
}

impl PriceSource for StaticPriceTable {
    fn price_of(&self, symbol: &str) -> Cents {
        self.prices.get(symbol).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listings() {
        let table = StaticPriceTable::default();
        assert_eq!(table.price_of("AAPL"), 15000);
        assert_eq!(table.price_of("TSLA"), 75000);
        assert_eq!(table.price_of("GOOGL"), 280000);
    }

    #[test]
    fn test_unknown_symbol_prices_at_zero() {
        let table = StaticPriceTable::default();
        assert_eq!(table.price_of("ZZZZ"), 0);
        assert_eq!(StaticPriceTable::new().price_of("AAPL"), 0);
    }

    #[test]
    fn test_with_price_overrides() {
        let table = StaticPriceTable::default().with_price("AAPL", 9900);
        assert_eq!(table.price_of("AAPL"), 9900);
    }

    #[test]
    #[should_panic(expected = "Prices cannot be negative")]
    fn test_negative_price_rejected() {
        StaticPriceTable::new().with_price("AAPL", -1);
    }
}
