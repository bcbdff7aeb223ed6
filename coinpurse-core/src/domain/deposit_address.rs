//! Deposit address reference rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Currency;

/// Static mapping of a currency to its deposit address
///
/// Reference data maintained in the `deposit_addresses` table; the client
/// only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositAddress {
    pub id: Uuid,
    pub currency: Currency,
    pub address: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
