//! Wallet service - balance valuation, the minimum floor, and deposits

use std::sync::Arc;

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    Balance, Currency, DepositAddress, EntryKind, NewLedgerEntry, PriceTable,
};
use crate::ports::WalletStore;

/// Currencies that must each hold the floor before swap or withdraw
pub const FLOOR_CURRENCIES: [Currency; 4] = [
    Currency::Usdt,
    Currency::Bnb,
    Currency::Eth,
    Currency::Sol,
];

/// Minimum USD-equivalent per floor currency
fn floor_usd() -> Decimal {
    Decimal::new(10, 0)
}

/// Floor currencies whose USD value sits under the minimum
///
/// Pure helper shared by the wallet and exchange services; a missing balance
/// row counts as zero.
pub(crate) fn floor_deficits(balances: &[Balance], prices: &PriceTable) -> Vec<Currency> {
    FLOOR_CURRENCIES
        .iter()
        .copied()
        .filter(|&currency| {
            let amount = balances
                .iter()
                .find(|b| b.currency == currency)
                .map(|b| b.amount)
                .unwrap_or(Decimal::ZERO);
            prices.usd_value(amount, currency) < floor_usd()
        })
        .collect()
}

/// One row of a user's balance sheet
#[derive(Debug, Clone, Serialize)]
pub struct BalanceLine {
    pub currency: Currency,
    pub amount: Decimal,
    pub usd_value: Decimal,
    pub idr_value: Decimal,
}

/// A user's full balance sheet with totals
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    pub lines: Vec<BalanceLine>,
    pub total_usd: Decimal,
    pub total_idr: Decimal,
}

/// Receipt for a simulated deposit credit
#[derive(Debug, Clone, Serialize)]
pub struct DepositReceipt {
    pub currency: Currency,
    pub amount: Decimal,
    pub new_balance: Decimal,
}

/// Wallet service for balances and deposits
pub struct WalletService {
    store: Arc<dyn WalletStore>,
    prices: PriceTable,
    usd_to_idr: Decimal,
}

impl WalletService {
    pub fn new(store: Arc<dyn WalletStore>, usd_to_idr: Decimal) -> Self {
        Self {
            store,
            prices: PriceTable::statics(),
            usd_to_idr,
        }
    }

    /// Raw balance rows for a user
    pub fn balances(&self, user_id: Uuid) -> Result<Vec<Balance>> {
        Ok(self.store.get_balances(user_id)?)
    }

    /// Balance sheet covering every supported currency
    ///
    /// Currencies without a stored row show as zero, so a sheet always has
    /// one line per supported asset.
    pub fn balance_sheet(&self, user_id: Uuid) -> Result<BalanceSheet> {
        let stored = self.store.get_balances(user_id)?;

        let mut lines = Vec::with_capacity(Currency::ALL.len());
        let mut total_usd = Decimal::ZERO;
        for currency in Currency::ALL {
            let amount = stored
                .iter()
                .find(|b| b.currency == currency)
                .map(|b| b.amount)
                .unwrap_or(Decimal::ZERO);
            let usd_value = self.prices.usd_value(amount, currency);
            total_usd += usd_value;
            lines.push(BalanceLine {
                currency,
                amount,
                usd_value,
                idr_value: usd_value * self.usd_to_idr,
            });
        }

        Ok(BalanceSheet {
            lines,
            total_usd,
            total_idr: total_usd * self.usd_to_idr,
        })
    }

    /// Total USD value across all balances
    pub fn total_usd(&self, user_id: Uuid) -> Result<Decimal> {
        Ok(self.balance_sheet(user_id)?.total_usd)
    }

    /// Whether every floor currency holds at least $10 USD-equivalent
    pub fn meets_minimum_floor(&self, user_id: Uuid) -> Result<bool> {
        let balances = self.store.get_balances(user_id)?;
        Ok(floor_deficits(&balances, &self.prices).is_empty())
    }

    /// Static deposit address rows
    pub fn deposit_addresses(&self) -> Result<Vec<DepositAddress>> {
        Ok(self.store.get_deposit_addresses()?)
    }

    /// Credit a simulated incoming deposit and record it in the ledger
    pub fn credit_deposit(
        &self,
        user_id: Uuid,
        currency: Currency,
        amount: Decimal,
    ) -> Result<DepositReceipt> {
        if amount <= Decimal::ZERO {
            bail!("deposit amount must be positive");
        }

        let new_balance = self.store.adjust_balance(user_id, currency, amount)?;
        self.store.append_entry(&NewLedgerEntry::new(
            user_id,
            EntryKind::Deposit,
            currency,
            amount,
        ))?;

        info!(user_id = %user_id, currency = %currency, %amount, "deposit credited");
        Ok(DepositReceipt {
            currency,
            amount,
            new_balance,
        })
    }
}
