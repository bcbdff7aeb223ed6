//! CoinGecko price client
//!
//! Fetches live USD quotes from the public simple-price endpoint. Quotes
//! feed the display overlay only; exchange math always runs on the static
//! table.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Currency, PriceMap};
use crate::ports::PriceSource;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// CoinGecko API client
#[derive(Debug)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

/// CoinGecko asset id for a wallet currency
fn coingecko_id(currency: Currency) -> &'static str {
    match currency {
        Currency::Usdt => "tether",
        Currency::Btc => "bitcoin",
        Currency::Bnb => "binancecoin",
        Currency::Eth => "ethereum",
        Currency::Sol => "solana",
        Currency::Base => "base-token",
    }
}

/// Pick the USD quotes for the requested symbols out of the response map
fn parse_quotes(
    symbols: &[Currency],
    data: &HashMap<String, HashMap<String, Decimal>>,
) -> PriceMap {
    let mut quotes = PriceMap::new();
    for &symbol in symbols {
        if let Some(usd) = data
            .get(coingecko_id(symbol))
            .and_then(|entry| entry.get("usd"))
        {
            quotes.insert(symbol, *usd);
        }
    }
    quotes
}

impl CoinGeckoClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::api(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current USD quotes for the given symbols
    pub fn simple_price(&self, symbols: &[Currency]) -> Result<PriceMap> {
        let mut ids: Vec<&str> = symbols.iter().map(|&s| coingecko_id(s)).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(PriceMap::new());
        }

        let url = format!("{}/simple/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("ids", ids.join(",")), ("vs_currencies", "usd".to_string())])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::api("price quote request timed out".to_string())
                } else if e.is_connect() {
                    Error::api("unable to connect to the price service".to_string())
                } else {
                    Error::api(format!("price quote request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::api(format!(
                "price quote request failed: HTTP {}",
                status.as_u16()
            )));
        }

        let data: HashMap<String, HashMap<String, Decimal>> = response
            .json()
            .map_err(|e| Error::api(format!("failed to parse price response: {}", e)))?;

        let quotes = parse_quotes(symbols, &data);
        debug!(requested = symbols.len(), received = quotes.len(), "fetched live quotes");
        Ok(quotes)
    }
}

impl PriceSource for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn fetch(&self, symbols: &[Currency]) -> Result<PriceMap> {
        self.simple_price(symbols)
    }
}
