//! Coinpurse Core - Business logic for the simulated crypto wallet
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Balance, LedgerEntry, etc.)
//! - **ports**: Trait definitions for external dependencies (WalletStore, PriceSource)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (PostgREST, in-memory, CoinGecko)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use adapters::coingecko::CoinGeckoClient;
use adapters::memory::MemoryStore;
use adapters::postgrest::PostgrestStore;
use config::Config;
use ports::{PriceSource, WalletStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    Balance, Currency, DepositAddress, EntryKind, EntryStatus, LedgerEntry, PriceTable, User,
};

/// Main context for Coinpurse operations
///
/// This is the primary entry point for all business logic. It holds the
/// row-store handle, configuration, and all services.
pub struct WalletContext {
    pub config: Config,
    pub store: Arc<dyn WalletStore>,
    pub auth_service: AuthService,
    pub wallet_service: WalletService,
    pub exchange_service: ExchangeService,
    pub bonus_service: BonusService,
    pub history_service: HistoryService,
    pub price_service: PriceService,
}

impl WalletContext {
    /// Create a new wallet context
    ///
    /// Demo mode runs everything against a seeded in-memory store; otherwise
    /// the configured row-store endpoint is used.
    pub fn new(coinpurse_dir: &Path) -> Result<Self> {
        let config = Config::load(coinpurse_dir)?;

        let store: Arc<dyn WalletStore> = if config.demo_mode {
            Arc::new(MemoryStore::with_demo_data())
        } else {
            let url = config.api_url.clone().context(
                "row-store URL not configured (set COINPURSE_API_URL or api.url in settings.json)",
            )?;
            let key = config.api_key.clone().context(
                "row-store API key not configured (set COINPURSE_API_KEY or api.anonKey in settings.json)",
            )?;
            Arc::new(PostgrestStore::new(&url, &key)?)
        };

        let price_source: Option<Box<dyn PriceSource>> = match CoinGeckoClient::new() {
            Ok(client) => Some(Box::new(client)),
            Err(err) => {
                warn!(error = %err, "live price source unavailable");
                None
            }
        };

        let auth_service = AuthService::new(Arc::clone(&store));
        let wallet_service = WalletService::new(Arc::clone(&store), config.usd_to_idr);
        let exchange_service = ExchangeService::new(Arc::clone(&store));
        let bonus_service = BonusService::new(Arc::clone(&store));
        let history_service = HistoryService::new(Arc::clone(&store));
        let price_service = PriceService::new(price_source);

        Ok(Self {
            config,
            store,
            auth_service,
            wallet_service,
            exchange_service,
            bonus_service,
            history_service,
            price_service,
        })
    }
}
