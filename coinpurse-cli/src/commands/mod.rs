//! CLI command implementations

pub mod account;
pub mod balances;
pub mod bonus;
pub mod deposit;
pub mod history;
pub mod login;
pub mod prices;
pub mod register;
pub mod send;
pub mod swap;
pub mod withdraw;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use coinpurse_core::{Currency, WalletContext};

/// Get the coinpurse directory from environment or default
pub fn get_coinpurse_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COINPURSE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".coinpurse")
    }
}

/// Get or create the wallet context
pub fn get_context() -> Result<WalletContext> {
    let coinpurse_dir = get_coinpurse_dir();

    std::fs::create_dir_all(&coinpurse_dir)
        .with_context(|| format!("Failed to create coinpurse directory: {:?}", coinpurse_dir))?;

    WalletContext::new(&coinpurse_dir)
}

/// Logged-in session, stored next to settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

fn session_path() -> PathBuf {
    get_coinpurse_dir().join("session.json")
}

/// Persist the session after login or registration
pub fn save_session(session: &Session) -> Result<()> {
    std::fs::create_dir_all(get_coinpurse_dir())?;
    std::fs::write(session_path(), serde_json::to_string_pretty(session)?)?;
    Ok(())
}

/// Load the stored session or fail with a login hint
pub fn load_session() -> Result<Session> {
    let path = session_path();
    if !path.exists() {
        bail!("not logged in (run `purse login` first)");
    }
    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content).context("session file is corrupt; run `purse login` again")
}

/// Remove the stored session, reporting whether one existed
pub fn clear_session() -> Result<bool> {
    let path = session_path();
    if path.exists() {
        std::fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Parse a currency argument
pub fn parse_currency(arg: &str) -> Result<Currency> {
    arg.parse::<Currency>().map_err(anyhow::Error::from)
}

/// Parse a decimal amount argument
pub fn parse_amount(arg: &str) -> Result<Decimal> {
    arg.parse::<Decimal>()
        .with_context(|| format!("invalid amount: {}", arg))
}
