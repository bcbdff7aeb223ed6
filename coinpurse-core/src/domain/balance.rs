//! Balance domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Currency;

/// The stored amount of one currency owned by one user
///
/// One row per `(user_id, currency)`, upserted by that composite key. The
/// row-store keeps the amount as a decimal string; `Decimal`'s serde impl
/// matches that wire format. Rows are created zeroed at registration and
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: Uuid,
    pub currency: Currency,
    pub amount: Decimal,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// A fresh zero balance for a user/currency pair
    pub fn zero(user_id: Uuid, currency: Currency) -> Self {
        Self {
            user_id,
            currency,
            amount: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }
}
