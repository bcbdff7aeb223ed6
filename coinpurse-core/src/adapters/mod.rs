//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - PostgREST HTTP client for the WalletStore port
//! - In-memory store for demo mode and tests
//! - CoinGecko HTTP client for the PriceSource port

pub mod coingecko;
pub mod memory;
pub mod postgrest;
