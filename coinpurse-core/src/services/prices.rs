//! Price service - display prices with a live overlay
//!
//! Holds the static price table and merges live quotes on top when asked.
//! The overlay is display-only; the exchange and bonus services keep their
//! own static tables.

use std::sync::Mutex;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Currency, PriceTable};
use crate::ports::PriceSource;

/// One displayed quote
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub currency: Currency,
    pub usd: Decimal,
    /// Whether the value came from the live overlay
    pub live: bool,
}

/// All displayed quotes plus overlay freshness
#[derive(Debug, Clone, Serialize)]
pub struct PriceSnapshot {
    pub quotes: Vec<PriceQuote>,
    pub last_updated: Option<DateTime<Utc>>,
}

struct PriceState {
    table: PriceTable,
    last_updated: Option<DateTime<Utc>>,
}

/// Price service
pub struct PriceService {
    state: Mutex<PriceState>,
    source: Option<Box<dyn PriceSource>>,
}

impl PriceService {
    pub fn new(source: Option<Box<dyn PriceSource>>) -> Self {
        Self {
            state: Mutex::new(PriceState {
                table: PriceTable::statics(),
                last_updated: None,
            }),
            source,
        }
    }

    /// Pull live quotes and merge them over the static table
    ///
    /// Returns the number of symbols the overlay now covers from this fetch.
    pub fn refresh(&self) -> Result<usize> {
        let source = match &self.source {
            Some(source) => source,
            None => bail!("no live price source configured"),
        };

        let quotes = match source.fetch(&Currency::ALL) {
            Ok(quotes) => quotes,
            Err(err) => {
                warn!(provider = source.name(), error = %err, "live price fetch failed");
                return Err(err.into());
            }
        };

        let mut state = self.state.lock().expect("lock poisoned");
        let applied = state.table.apply_overlay(&quotes);
        state.last_updated = Some(Utc::now());

        info!(provider = source.name(), applied, "price overlay refreshed");
        Ok(applied)
    }

    /// Current display price for one currency
    pub fn price(&self, currency: Currency) -> Decimal {
        let state = self.state.lock().expect("lock poisoned");
        state.table.price(currency)
    }

    /// Display-aware USD value of an amount
    pub fn usd_value(&self, amount: Decimal, currency: Currency) -> Decimal {
        let state = self.state.lock().expect("lock poisoned");
        state.table.usd_value(amount, currency)
    }

    /// Every displayed quote plus overlay freshness
    pub fn snapshot(&self) -> PriceSnapshot {
        let state = self.state.lock().expect("lock poisoned");
        let quotes = Currency::ALL
            .iter()
            .map(|&currency| PriceQuote {
                currency,
                usd: state.table.price(currency),
                live: state.table.is_live(currency),
            })
            .collect();

        PriceSnapshot {
            quotes,
            last_updated: state.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Result as DomainResult;
    use crate::domain::PriceMap;

    /// Canned price source for tests
    struct FixedSource {
        quotes: PriceMap,
    }

    impl PriceSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _symbols: &[Currency]) -> DomainResult<PriceMap> {
            Ok(self.quotes.clone())
        }
    }

    #[test]
    fn test_without_source_serves_static_prices() {
        let service = PriceService::new(None);
        assert_eq!(service.price(Currency::Eth), Decimal::new(3_200, 0));
        assert!(service.refresh().is_err());

        let snapshot = service.snapshot();
        assert!(snapshot.last_updated.is_none());
        assert!(snapshot.quotes.iter().all(|q| !q.live));
    }

    #[test]
    fn test_refresh_overlays_live_quotes() {
        let mut quotes = PriceMap::new();
        quotes.insert(Currency::Eth, Decimal::new(3_450, 0));
        quotes.insert(Currency::Btc, Decimal::new(99_000, 0));
        let service = PriceService::new(Some(Box::new(FixedSource { quotes })));

        assert_eq!(service.refresh().unwrap(), 2);
        assert_eq!(service.price(Currency::Eth), Decimal::new(3_450, 0));
        // Symbols missing from the overlay stay static
        assert_eq!(service.price(Currency::Sol), Decimal::new(180, 0));

        let snapshot = service.snapshot();
        assert!(snapshot.last_updated.is_some());
        let eth = snapshot
            .quotes
            .iter()
            .find(|q| q.currency == Currency::Eth)
            .unwrap();
        assert!(eth.live);
    }
}
