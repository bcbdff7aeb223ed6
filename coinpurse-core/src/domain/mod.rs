//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod balance;
mod currency;
mod deposit_address;
mod ledger;
pub mod price;
pub mod result;
mod user;

pub use balance::Balance;
pub use currency::Currency;
pub use deposit_address::DepositAddress;
pub use ledger::{EntryKind, EntryStatus, LedgerEntry, NewLedgerEntry};
pub use price::{PriceMap, PriceTable};
pub use user::{hash_password, User};
