//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod price_source;
mod store;

pub use price_source::PriceSource;
pub use store::WalletStore;
