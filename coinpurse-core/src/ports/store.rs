//! Wallet store port - row-store abstraction

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Balance, Currency, DepositAddress, LedgerEntry, NewLedgerEntry, User};

/// Generic row-store abstraction
///
/// This trait defines every read/write the wallet flows issue against the
/// hosted backend. Implementations (adapters) provide the actual access
/// logic - the PostgREST HTTP client in production, an in-memory map for
/// demo mode and tests.
pub trait WalletStore: Send + Sync {
    // === Users ===

    /// Insert a new user row, returning the stored row
    fn insert_user(&self, username: &str, password_hash: &str) -> Result<User>;

    /// Look up a user by username
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Look up a user by username and password hash (login)
    fn find_user_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>>;

    /// Look up a user by id
    ///
    /// Implementations merge the `bonus_claims` compatibility table into
    /// `bonus_claimed` where the hosted schema predates that column.
    fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Replace a user's password hash
    fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;

    /// Rename a user
    fn update_username(&self, id: Uuid, username: &str) -> Result<()>;

    /// Record that a verification email was requested
    fn mark_verification_sent(&self, id: Uuid) -> Result<()>;

    /// Record the one-time registration bonus as claimed
    fn mark_bonus_claimed(&self, id: Uuid, currency: Currency) -> Result<()>;

    // === Balances ===

    /// Create zeroed balance rows for a new user
    fn init_balances(&self, user_id: Uuid, currencies: &[Currency]) -> Result<()>;

    /// All balance rows for a user
    fn get_balances(&self, user_id: Uuid) -> Result<Vec<Balance>>;

    /// Atomically apply a delta to one balance, returning the new amount
    ///
    /// Fails with `Error::InsufficientFunds` when the result would go
    /// negative. The check and the write must be a single atomic step -
    /// concurrent callers must never both pass the check.
    fn adjust_balance(&self, user_id: Uuid, currency: Currency, delta: Decimal)
        -> Result<Decimal>;

    // === Ledger ===

    /// Append an immutable ledger entry, returning the stored row
    fn append_entry(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry>;

    /// Most recent ledger entries for a user, newest first
    fn get_entries(&self, user_id: Uuid, limit: usize) -> Result<Vec<LedgerEntry>>;

    // === Reference data ===

    /// All deposit address rows
    fn get_deposit_addresses(&self) -> Result<Vec<DepositAddress>>;
}
