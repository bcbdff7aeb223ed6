//! Pricing model
//!
//! Valuation runs off a static in-memory USD price per symbol. A live quote
//! overlay can be merged on top for display; the exchange flows always price
//! against a table without an overlay, so live quotes never reach mutation
//! math.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::Currency;

/// Live quotes keyed by symbol, in USD
pub type PriceMap = HashMap<Currency, Decimal>;

/// USD price lookup with an optional live overlay
#[derive(Debug, Clone)]
pub struct PriceTable {
    base: HashMap<Currency, Decimal>,
    overlay: HashMap<Currency, Decimal>,
}

impl PriceTable {
    /// The static price table
    pub fn statics() -> Self {
        let mut base = HashMap::new();
        base.insert(Currency::Usdt, Decimal::ONE);
        base.insert(Currency::Btc, Decimal::new(97_000, 0));
        base.insert(Currency::Bnb, Decimal::new(620, 0));
        base.insert(Currency::Eth, Decimal::new(3_200, 0));
        base.insert(Currency::Sol, Decimal::new(180, 0));
        base.insert(Currency::Base, Decimal::ONE);

        Self {
            base,
            overlay: HashMap::new(),
        }
    }

    /// Current USD price for a currency, preferring the live overlay
    pub fn price(&self, currency: Currency) -> Decimal {
        self.overlay
            .get(&currency)
            .or_else(|| self.base.get(&currency))
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Static USD price, ignoring any live overlay
    pub fn static_price(&self, currency: Currency) -> Decimal {
        self.base.get(&currency).copied().unwrap_or(Decimal::ONE)
    }

    /// Whether the displayed price for a currency comes from the overlay
    pub fn is_live(&self, currency: Currency) -> bool {
        self.overlay.contains_key(&currency)
    }

    /// USD value of an amount of a currency
    pub fn usd_value(&self, amount: Decimal, currency: Currency) -> Decimal {
        amount * self.price(currency)
    }

    /// Amount of `to` obtained for `amount` of `from` at current prices
    pub fn convert(&self, from: Currency, to: Currency, amount: Decimal) -> Decimal {
        let usd = amount * self.price(from);
        usd / self.price(to)
    }

    /// Merge live quotes on top of the static table
    ///
    /// Non-positive quotes are discarded.
    pub fn apply_overlay(&mut self, quotes: &PriceMap) -> usize {
        let mut applied = 0;
        for (&currency, &price) in quotes {
            if price > Decimal::ZERO {
                self.overlay.insert(currency, price);
                applied += 1;
            }
        }
        applied
    }

    /// Drop all live quotes
    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::statics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_prices() {
        let table = PriceTable::statics();
        assert_eq!(table.price(Currency::Usdt), Decimal::ONE);
        assert_eq!(table.price(Currency::Eth), Decimal::new(3_200, 0));
        assert_eq!(table.price(Currency::Btc), Decimal::new(97_000, 0));
    }

    #[test]
    fn test_convert_through_usd() {
        let table = PriceTable::statics();
        // 1 ETH = 3200 USD = 3200 USDT
        assert_eq!(
            table.convert(Currency::Eth, Currency::Usdt, Decimal::ONE),
            Decimal::new(3_200, 0)
        );
        // 620 USDT = 1 BNB
        assert_eq!(
            table.convert(Currency::Usdt, Currency::Bnb, Decimal::new(620, 0)),
            Decimal::ONE
        );
    }

    #[test]
    fn test_overlay_preferred_for_display() {
        let mut table = PriceTable::statics();
        let mut quotes = PriceMap::new();
        quotes.insert(Currency::Eth, Decimal::new(3_500, 0));
        assert_eq!(table.apply_overlay(&quotes), 1);

        assert_eq!(table.price(Currency::Eth), Decimal::new(3_500, 0));
        assert!(table.is_live(Currency::Eth));
        // Static lookup is unaffected
        assert_eq!(table.static_price(Currency::Eth), Decimal::new(3_200, 0));
    }

    #[test]
    fn test_overlay_rejects_non_positive() {
        let mut table = PriceTable::statics();
        let mut quotes = PriceMap::new();
        quotes.insert(Currency::Sol, Decimal::ZERO);
        assert_eq!(table.apply_overlay(&quotes), 0);
        assert!(!table.is_live(Currency::Sol));
    }

    #[test]
    fn test_clear_overlay() {
        let mut table = PriceTable::statics();
        let mut quotes = PriceMap::new();
        quotes.insert(Currency::Btc, Decimal::new(100_000, 0));
        table.apply_overlay(&quotes);
        table.clear_overlay();
        assert_eq!(table.price(Currency::Btc), Decimal::new(97_000, 0));
    }
}
