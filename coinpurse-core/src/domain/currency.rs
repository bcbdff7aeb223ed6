//! Supported currency set
//!
//! The wallet operates over a closed set of assets. The row-store keeps bare
//! upper-case symbol strings, so the enum serializes to exactly those.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// A supported crypto asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usdt,
    Btc,
    Bnb,
    Eth,
    Sol,
    Base,
}

impl Currency {
    /// Every supported currency, in the order balances are created at
    /// registration.
    pub const ALL: [Currency; 6] = [
        Currency::Usdt,
        Currency::Btc,
        Currency::Bnb,
        Currency::Eth,
        Currency::Sol,
        Currency::Base,
    ];

    /// Upper-case wire symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usdt => "USDT",
            Currency::Btc => "BTC",
            Currency::Bnb => "BNB",
            Currency::Eth => "ETH",
            Currency::Sol => "SOL",
            Currency::Base => "BASE",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USDT" => Ok(Currency::Usdt),
            "BTC" => Ok(Currency::Btc),
            "BNB" => Ok(Currency::Bnb),
            "ETH" => Ok(Currency::Eth),
            "SOL" => Ok(Currency::Sol),
            "BASE" => Ok(Currency::Base),
            other => Err(Error::validation(format!(
                "unsupported currency: {}",
                other
            ))),
        }
    }
}
