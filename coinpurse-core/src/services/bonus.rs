//! Bonus service - the one-time registration bonus
//!
//! Every new user may claim $300 once, paid out in an asset of their
//! choosing at the static price.

use std::sync::Arc;

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Currency, EntryKind, NewLedgerEntry, PriceTable};
use crate::ports::WalletStore;

/// USD value of the one-time registration bonus
fn bonus_usd() -> Decimal {
    Decimal::new(300, 0)
}

/// Receipt for a claimed bonus
#[derive(Debug, Clone, Serialize)]
pub struct BonusReceipt {
    pub currency: Currency,
    pub amount: Decimal,
    pub new_balance: Decimal,
}

/// Bonus service
pub struct BonusService {
    store: Arc<dyn WalletStore>,
    prices: PriceTable,
}

impl BonusService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self {
            store,
            prices: PriceTable::statics(),
        }
    }

    /// Claim the registration bonus into the chosen currency
    pub fn claim(&self, user_id: Uuid, currency: Currency) -> Result<BonusReceipt> {
        let user = match self.store.get_user(user_id)? {
            Some(user) => user,
            None => bail!("user not found"),
        };
        if user.bonus_claimed {
            bail!("registration bonus already claimed");
        }

        let amount = bonus_usd() / self.prices.static_price(currency);
        let new_balance = self.store.adjust_balance(user_id, currency, amount)?;
        self.store.mark_bonus_claimed(user_id, currency)?;
        self.store.append_entry(&NewLedgerEntry::new(
            user_id,
            EntryKind::Bonus,
            currency,
            amount,
        ))?;

        info!(user_id = %user_id, currency = %currency, %amount, "bonus claimed");
        Ok(BonusReceipt {
            currency,
            amount,
            new_balance,
        })
    }
}
