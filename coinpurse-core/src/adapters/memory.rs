//! In-memory wallet store
//!
//! Mutex-guarded implementation of the WalletStore port backing demo mode
//! and the test suite. The balance check-and-write happens under one lock,
//! which gives the same atomicity the hosted adjust_balance function
//! provides.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    hash_password, Balance, Currency, DepositAddress, EntryKind, EntryStatus, LedgerEntry,
    NewLedgerEntry, User,
};
use crate::ports::WalletStore;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    balances: HashMap<(Uuid, Currency), Balance>,
    entries: Vec<LedgerEntry>,
    addresses: Vec<DepositAddress>,
}

/// In-memory adapter for the WalletStore port
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with demo users, balances, and deposit addresses
    pub fn with_demo_data() -> Self {
        let store = Self::new();

        {
            let mut tables = store.tables.lock().expect("lock poisoned");

            let demo_id = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
            let mut demo = User::new(demo_id, "demo", hash_password("demo"));
            demo.email = Some("demo@coinpurse.dev".to_string());
            tables.users.push(demo);

            let friend_id = Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap();
            tables
                .users
                .push(User::new(friend_id, "satoshi", hash_password("satoshi")));

            let seed_amounts = [
                (Currency::Usdt, Decimal::new(125_075, 2)), // 1250.75
                (Currency::Btc, Decimal::new(42, 3)),       // 0.042
                (Currency::Bnb, Decimal::new(35, 1)),       // 3.5
                (Currency::Eth, Decimal::new(12, 1)),       // 1.2
                (Currency::Sol, Decimal::new(25, 0)),
                (Currency::Base, Decimal::new(500, 0)),
            ];
            for (currency, amount) in seed_amounts {
                let mut balance = Balance::zero(demo_id, currency);
                balance.amount = amount;
                tables.balances.insert((demo_id, currency), balance);
            }
            for currency in Currency::ALL {
                tables
                    .balances
                    .entry((friend_id, currency))
                    .or_insert_with(|| Balance::zero(friend_id, currency));
            }

            for currency in Currency::ALL {
                tables.addresses.push(DepositAddress {
                    id: Uuid::new_v4(),
                    currency,
                    address: demo_address(currency),
                    created_at: Utc::now(),
                });
            }

            tables.entries.push(LedgerEntry {
                id: Uuid::new_v4(),
                user_id: demo_id,
                kind: EntryKind::Deposit,
                currency: Currency::Usdt,
                amount: Decimal::new(125_075, 2),
                from_currency: None,
                to_currency: None,
                status: EntryStatus::Completed,
                created_at: Utc::now(),
            });
        }

        store
    }
}

/// Generate a plausible-looking address for demo deposit rows
fn demo_address(currency: Currency) -> String {
    let mut rng = rand::thread_rng();
    const HEX: &[u8] = b"0123456789abcdef";
    const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    match currency {
        Currency::Btc => {
            let tail: String = (0..38)
                .map(|_| BASE58[rng.gen_range(0..BASE58.len())] as char)
                .collect();
            format!("bc1q{}", tail.to_lowercase())
        }
        Currency::Sol => (0..44)
            .map(|_| BASE58[rng.gen_range(0..BASE58.len())] as char)
            .collect(),
        _ => {
            let tail: String = (0..40)
                .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
                .collect();
            format!("0x{}", tail)
        }
    }
}

impl WalletStore for MemoryStore {
    fn insert_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        if tables.users.iter().any(|u| u.username == username) {
            // Same shape the backend's unique constraint produces
            return Err(Error::store(
                "duplicate key value violates unique constraint \"users_username_key\"",
            ));
        }
        let user = User::new(Uuid::new_v4(), username, password_hash);
        tables.users.push(user.clone());
        Ok(user)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().expect("lock poisoned");
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn find_user_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let tables = self.tables.lock().expect("lock poisoned");
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username && u.password_hash == password_hash)
            .cloned())
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.lock().expect("lock poisoned");
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found(format!("user {}", id)))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    fn update_username(&self, id: Uuid, username: &str) -> Result<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found(format!("user {}", id)))?;
        user.username = username.to_string();
        Ok(())
    }

    fn mark_verification_sent(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found(format!("user {}", id)))?;
        user.verification_sent_at = Some(Utc::now());
        Ok(())
    }

    fn mark_bonus_claimed(&self, id: Uuid, currency: Currency) -> Result<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found(format!("user {}", id)))?;
        user.bonus_claimed = true;
        user.bonus_currency = Some(currency);
        user.bonus_claimed_at = Some(Utc::now());
        Ok(())
    }

    fn init_balances(&self, user_id: Uuid, currencies: &[Currency]) -> Result<()> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        for &currency in currencies {
            tables
                .balances
                .entry((user_id, currency))
                .or_insert_with(|| Balance::zero(user_id, currency));
        }
        Ok(())
    }

    fn get_balances(&self, user_id: Uuid) -> Result<Vec<Balance>> {
        let tables = self.tables.lock().expect("lock poisoned");
        let mut balances: Vec<Balance> = tables
            .balances
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        balances.sort_by_key(|b| {
            Currency::ALL
                .iter()
                .position(|&c| c == b.currency)
                .unwrap_or(usize::MAX)
        });
        Ok(balances)
    }

    fn adjust_balance(
        &self,
        user_id: Uuid,
        currency: Currency,
        delta: Decimal,
    ) -> Result<Decimal> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let balance = tables
            .balances
            .entry((user_id, currency))
            .or_insert_with(|| Balance::zero(user_id, currency));

        let new_amount = balance.amount + delta;
        if new_amount < Decimal::ZERO {
            return Err(Error::insufficient(format!("{} balance too low", currency)));
        }

        balance.amount = new_amount;
        balance.updated_at = Utc::now();
        Ok(new_amount)
    }

    fn append_entry(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry> {
        let mut tables = self.tables.lock().expect("lock poisoned");
        let stored = LedgerEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            kind: entry.kind,
            currency: entry.currency,
            amount: entry.amount,
            from_currency: entry.from_currency,
            to_currency: entry.to_currency,
            status: entry.status,
            created_at: Utc::now(),
        };
        tables.entries.push(stored.clone());
        Ok(stored)
    }

    fn get_entries(&self, user_id: Uuid, limit: usize) -> Result<Vec<LedgerEntry>> {
        let tables = self.tables.lock().expect("lock poisoned");
        let mut entries: Vec<LedgerEntry> = tables
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; insertion order breaks created_at ties
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    fn get_deposit_addresses(&self) -> Result<Vec<DepositAddress>> {
        let tables = self.tables.lock().expect("lock poisoned");
        Ok(tables.addresses.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        store.insert_user("alice", "hash").unwrap();
        let err = store.insert_user("alice", "hash2").unwrap_err();
        assert!(err.to_string().contains("duplicate key"));
    }

    #[test]
    fn test_adjust_balance_blocks_overdraw() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        store
            .adjust_balance(user_id, Currency::Usdt, Decimal::new(100, 0))
            .unwrap();

        let err = store
            .adjust_balance(user_id, Currency::Usdt, Decimal::new(-101, 0))
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds(_)));

        // The failed attempt must not have changed the amount
        let balances = store.get_balances(user_id).unwrap();
        assert_eq!(balances[0].amount, Decimal::new(100, 0));
    }

    #[test]
    fn test_entries_newest_first_with_limit() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        for i in 1..=5 {
            store
                .append_entry(&NewLedgerEntry::new(
                    user_id,
                    EntryKind::Deposit,
                    Currency::Usdt,
                    Decimal::new(i, 0),
                ))
                .unwrap();
        }

        let entries = store.get_entries(user_id, 3).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].amount, Decimal::new(5, 0));
        assert_eq!(entries[2].amount, Decimal::new(3, 0));
    }

    #[test]
    fn test_demo_seed_has_addresses_for_all_currencies() {
        let store = MemoryStore::with_demo_data();
        let addresses = store.get_deposit_addresses().unwrap();
        assert_eq!(addresses.len(), Currency::ALL.len());

        let demo = store.find_user_by_username("demo").unwrap().unwrap();
        let balances = store.get_balances(demo.id).unwrap();
        assert_eq!(balances.len(), Currency::ALL.len());
    }
}
