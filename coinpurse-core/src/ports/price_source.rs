//! Price source port
//!
//! Defines the interface for fetching live USD quotes from an external
//! provider. The price service uses this trait to refresh its display
//! overlay without knowing the specifics of each provider.

use crate::domain::result::Result;
use crate::domain::{Currency, PriceMap};

/// Live quote provider trait
pub trait PriceSource: Send + Sync {
    /// Provider name (e.g., "coingecko")
    fn name(&self) -> &str;

    /// Fetch current USD quotes for the given symbols
    ///
    /// Symbols the provider does not track are simply absent from the
    /// returned map.
    fn fetch(&self, symbols: &[Currency]) -> Result<PriceMap>;
}
