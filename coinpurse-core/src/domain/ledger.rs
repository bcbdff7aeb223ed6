//! Ledger domain model
//!
//! Every balance-affecting event leaves an immutable `transactions` row
//! behind it. Entries are written after the balance mutation succeeds, as a
//! separate call against the row-store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Currency;

/// What kind of balance-affecting event an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Withdraw,
    Swap,
    Send,
    Receive,
    Bonus,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "deposit",
            EntryKind::Withdraw => "withdraw",
            EntryKind::Swap => "swap",
            EntryKind::Send => "send",
            EntryKind::Receive => "receive",
            EntryKind::Bonus => "bonus",
        }
    }
}

/// Settlement status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Completed,
    Pending,
    Failed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Completed => "completed",
            EntryStatus::Pending => "pending",
            EntryStatus::Failed => "failed",
        }
    }
}

/// A historical ledger row as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub currency: Currency,
    pub amount: Decimal,
    #[serde(default)]
    pub from_currency: Option<Currency>,
    #[serde(default)]
    pub to_currency: Option<Currency>,
    pub status: EntryStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A ledger row about to be inserted
///
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewLedgerEntry {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub currency: Currency,
    pub amount: Decimal,
    pub from_currency: Option<Currency>,
    pub to_currency: Option<Currency>,
    pub status: EntryStatus,
}

impl NewLedgerEntry {
    pub fn new(user_id: Uuid, kind: EntryKind, currency: Currency, amount: Decimal) -> Self {
        Self {
            user_id,
            kind,
            currency,
            amount,
            from_currency: None,
            to_currency: None,
            status: EntryStatus::Completed,
        }
    }

    /// Attach the currency pair of a swap
    pub fn with_pair(mut self, from: Currency, to: Currency) -> Self {
        self.from_currency = Some(from);
        self.to_currency = Some(to);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(serde_json::to_string(&EntryKind::Withdraw).unwrap(), "\"withdraw\"");
        let kind: EntryKind = serde_json::from_str("\"receive\"").unwrap();
        assert_eq!(kind, EntryKind::Receive);
    }

    #[test]
    fn test_new_entry_defaults_completed() {
        let entry = NewLedgerEntry::new(
            Uuid::new_v4(),
            EntryKind::Deposit,
            Currency::Usdt,
            Decimal::new(5000, 2),
        );
        assert_eq!(entry.status, EntryStatus::Completed);
        assert!(entry.from_currency.is_none());
    }

    #[test]
    fn test_swap_entry_carries_pair() {
        let entry = NewLedgerEntry::new(
            Uuid::new_v4(),
            EntryKind::Swap,
            Currency::Eth,
            Decimal::ONE,
        )
        .with_pair(Currency::Eth, Currency::Sol);
        assert_eq!(entry.from_currency, Some(Currency::Eth));
        assert_eq!(entry.to_currency, Some(Currency::Sol));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "swap");
        assert_eq!(json["from_currency"], "ETH");
    }
}
