//! Exchange service - swap, withdraw, and send flows
//!
//! Every flow debits through `WalletStore::adjust_balance`, so the
//! sufficiency check and the write are one atomic step at the storage
//! layer. Conversion math runs on the static price table; the live display
//! overlay never reaches it.

use std::sync::Arc;

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Currency, EntryKind, NewLedgerEntry, PriceTable};
use crate::ports::WalletStore;

use super::wallet::{floor_deficits, FLOOR_CURRENCIES};

/// Receipt for a completed swap
#[derive(Debug, Clone, Serialize)]
pub struct SwapReceipt {
    pub from: Currency,
    pub to: Currency,
    pub amount: Decimal,
    pub to_amount: Decimal,
    pub usd_value: Decimal,
}

/// Receipt for a completed withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawReceipt {
    pub currency: Currency,
    pub amount: Decimal,
    pub address: String,
}

/// Receipt for a completed send
#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub recipient: String,
    pub amount: Decimal,
}

/// Exchange service for balance-mutating flows
pub struct ExchangeService {
    store: Arc<dyn WalletStore>,
    prices: PriceTable,
}

impl ExchangeService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self {
            store,
            prices: PriceTable::statics(),
        }
    }

    /// Swap an amount of one currency into another at static prices
    pub fn swap(
        &self,
        user_id: Uuid,
        from: Currency,
        to: Currency,
        amount: Decimal,
    ) -> Result<SwapReceipt> {
        ensure_positive(amount)?;
        if from == to {
            bail!("cannot swap a currency into itself");
        }
        self.ensure_floor(user_id, "swap")?;

        self.store.adjust_balance(user_id, from, -amount)?;
        let to_amount = self.prices.convert(from, to, amount);
        self.store.adjust_balance(user_id, to, to_amount)?;

        self.store.append_entry(
            &NewLedgerEntry::new(user_id, EntryKind::Swap, from, amount).with_pair(from, to),
        )?;

        info!(user_id = %user_id, from = %from, to = %to, %amount, "swap completed");
        Ok(SwapReceipt {
            from,
            to,
            amount,
            to_amount,
            usd_value: self.prices.usd_value(amount, from),
        })
    }

    /// Withdraw an amount to an external address
    pub fn withdraw(
        &self,
        user_id: Uuid,
        currency: Currency,
        amount: Decimal,
        address: &str,
    ) -> Result<WithdrawReceipt> {
        ensure_positive(amount)?;
        let address = address.trim();
        if address.is_empty() {
            bail!("withdrawal address is required");
        }
        self.ensure_floor(user_id, "withdraw")?;

        self.store.adjust_balance(user_id, currency, -amount)?;
        self.store.append_entry(&NewLedgerEntry::new(
            user_id,
            EntryKind::Withdraw,
            currency,
            amount,
        ))?;

        info!(user_id = %user_id, currency = %currency, %amount, "withdrawal completed");
        Ok(WithdrawReceipt {
            currency,
            amount,
            address: address.to_string(),
        })
    }

    /// Send USDT to another user by username
    ///
    /// No floor check here; only swap and withdraw carry it.
    pub fn send(
        &self,
        sender_id: Uuid,
        recipient_username: &str,
        amount: Decimal,
    ) -> Result<SendReceipt> {
        ensure_positive(amount)?;

        let recipient = match self.store.find_user_by_username(recipient_username.trim())? {
            Some(user) => user,
            None => bail!("recipient not found: {}", recipient_username.trim()),
        };

        self.store
            .adjust_balance(sender_id, Currency::Usdt, -amount)?;
        self.store
            .adjust_balance(recipient.id, Currency::Usdt, amount)?;

        self.store.append_entry(&NewLedgerEntry::new(
            sender_id,
            EntryKind::Send,
            Currency::Usdt,
            amount,
        ))?;
        self.store.append_entry(&NewLedgerEntry::new(
            recipient.id,
            EntryKind::Receive,
            Currency::Usdt,
            amount,
        ))?;

        info!(sender = %sender_id, recipient = %recipient.id, %amount, "transfer completed");
        Ok(SendReceipt {
            recipient: recipient.username,
            amount,
        })
    }

    fn ensure_floor(&self, user_id: Uuid, action: &str) -> Result<()> {
        let balances = self.store.get_balances(user_id)?;
        let deficits = floor_deficits(&balances, &self.prices);
        if !deficits.is_empty() {
            let floor_list = FLOOR_CURRENCIES
                .iter()
                .map(|c| c.symbol())
                .collect::<Vec<_>>()
                .join(", ");
            let short_list = deficits
                .iter()
                .map(|c| c.symbol())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "you must hold at least $10 of each of {} to {} ({} below the floor)",
                floor_list,
                action,
                short_list
            );
        }
        Ok(())
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        bail!("amount must be positive");
    }
    Ok(())
}
