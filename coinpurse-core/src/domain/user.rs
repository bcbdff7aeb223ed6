//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::Currency;

/// Hash a password the way the hosted backend stores it
///
/// SHA-256 hex, no salt. This is a wire-format constraint: the users table
/// holds exactly this digest and the backend never re-hashes, so login
/// compares against it directly.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// A registered wallet user
///
/// Mirrors the `users` table. The password column holds a SHA-256 hex digest
/// computed client-side; the hosted backend never re-hashes it. Bonus columns
/// may be absent on older hosted schemas, so they all default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bonus_claimed: bool,
    #[serde(default)]
    pub bonus_currency: Option<Currency>,
    #[serde(default)]
    pub bonus_claimed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_sent_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Uuid, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            email: None,
            bonus_claimed: false,
            bonus_currency: None,
            bonus_claimed_at: None,
            verification_sent_at: None,
            created_at: Utc::now(),
        }
    }
}
