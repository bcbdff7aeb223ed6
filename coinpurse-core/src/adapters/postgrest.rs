//! PostgREST row-store client
//!
//! Implements the WalletStore port against the hosted table-query API.
//! Every operation is a plain HTTP call with `eq.`-style filter predicates;
//! the only server-side logic the client relies on is the optional
//! `adjust_balance` function reached through the RPC endpoint.
//!
//! Hosted schemas drift: older projects predate the `bonus_claimed` column
//! and the `adjust_balance` function. Those conditions are detected from the
//! error body and the client switches to a compatible write shape.

use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Balance, Currency, DepositAddress, LedgerEntry, NewLedgerEntry, User};
use crate::ports::WalletStore;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Attempts before giving up on a contended conditional update
const CAS_MAX_ATTEMPTS: usize = 4;

/// Error-body shapes that mean the hosted schema predates a column
const MISSING_BONUS_COLUMN: &str = r"(?i)bonus_claimed|column .* does not exist|unknown column";

/// Error-body shapes that mean the adjust_balance function is not installed
const MISSING_ADJUST_FUNCTION: &str =
    r"(?i)could not find the function|function .* does not exist|PGRST202";

/// PostgREST adapter for the WalletStore port
#[derive(Debug)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
}

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

impl PostgrestStore {
    /// Create a new store client from a project URL and API key
    pub fn new(project_url: &str, api_key: &str) -> Result<Self> {
        let parsed = Url::parse(project_url)
            .map_err(|_| Error::Config(format!("invalid row-store URL: {}", project_url)))?;

        if parsed.scheme() != "https" {
            return Err(Error::Config("row-store URL must use HTTPS".to_string()));
        }

        if api_key.trim().is_empty() {
            return Err(Error::Config("row-store API key is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| Error::Config("API key contains invalid characters".to_string()))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::api(format!("failed to build HTTP client: {}", e)))?;

        let base_url = format!("{}/rest/v1", project_url.trim_end_matches('/'));

        Ok(Self { client, base_url })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Select rows with filter predicates
    fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .map_err(|e| self.map_request_error(e))?;
        self.read_rows(response)
    }

    /// Insert rows, returning the stored representation
    fn insert<T: DeserializeOwned>(&self, table: &str, body: &impl Serialize) -> Result<Vec<T>> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .map_err(|e| self.map_request_error(e))?;
        self.read_rows(response)
    }

    /// Insert rows without reading them back
    fn insert_only(&self, table: &str, body: &impl Serialize) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .json(body)
            .send()
            .map_err(|e| self.map_request_error(e))?;
        self.ensure_success(response)
    }

    /// Upsert rows by a conflict key
    fn upsert_only(&self, table: &str, on_conflict: &str, body: &impl Serialize) -> Result<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates")
            .query(&[("on_conflict", on_conflict.to_string())])
            .json(body)
            .send()
            .map_err(|e| self.map_request_error(e))?;
        self.ensure_success(response)
    }

    /// Update rows matching the filter, returning the rows that changed
    fn update(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &JsonValue,
    ) -> Result<Vec<JsonValue>> {
        let response = self
            .client
            .patch(self.table_url(table))
            .header("Prefer", "return=representation")
            .query(query)
            .json(body)
            .send()
            .map_err(|e| self.map_request_error(e))?;
        self.read_rows(response)
    }

    /// Call a server-side function through the RPC endpoint
    fn rpc<T: DeserializeOwned>(&self, function: &str, args: &JsonValue) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/rpc/{}", self.base_url, function))
            .json(args)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .map_err(|e| Error::api(format!("failed to parse rpc response: {}", e)))
        } else {
            Err(Self::error_from_parts(status, &response.text().unwrap_or_default()))
        }
    }

    fn read_rows<T: DeserializeOwned>(&self, response: Response) -> Result<Vec<T>> {
        let status = response.status();
        if status.is_success() {
            response
                .json::<Vec<T>>()
                .map_err(|e| Error::api(format!("failed to parse row-store response: {}", e)))
        } else {
            Err(Self::error_from_parts(status, &response.text().unwrap_or_default()))
        }
    }

    fn ensure_success(&self, response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_parts(status, &response.text().unwrap_or_default()))
        }
    }

    /// Map an error response into the structured error type
    ///
    /// PostgREST bodies look like `{"message": ..., "code": ..., "hint": ...}`;
    /// anything else is passed through verbatim so the shape detectors can
    /// still run over it.
    fn error_from_parts(status: StatusCode, body: &str) -> Error {
        let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
        let mut message = parsed
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| body.trim().to_string());
        if message.is_empty() {
            message = format!("HTTP {}", status.as_u16());
        }
        if let Some(code) = parsed.as_ref().and_then(|e| e.code.as_deref()) {
            message = format!("{} ({})", message, code);
        }
        if let Some(hint) = parsed.as_ref().and_then(|e| e.hint.as_deref()) {
            debug!(hint, "row-store error hint");
        }

        match status.as_u16() {
            401 | 403 => Error::auth(message),
            _ => Error::api(message),
        }
    }

    /// Map transport errors to user-facing messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::api(format!(
                "row-store request timed out after {} seconds",
                REQUEST_TIMEOUT_SECS
            ))
        } else if error.is_connect() {
            Error::api("unable to connect to the row-store".to_string())
        } else {
            Error::api(format!("row-store request failed: {}", error))
        }
    }

    /// Optimistic-concurrency fallback for balance adjustment
    ///
    /// Used when the hosted backend has no `adjust_balance` function: read
    /// the current amount, then write conditionally on the amount still
    /// being what was read. A write that matches zero rows means the row
    /// moved underneath us and the read/write pair is retried.
    fn adjust_balance_cas(
        &self,
        user_id: Uuid,
        currency: Currency,
        delta: Decimal,
    ) -> Result<Decimal> {
        for attempt in 0..CAS_MAX_ATTEMPTS {
            let rows: Vec<Balance> = self.select(
                "balances",
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{}", user_id)),
                    ("currency", format!("eq.{}", currency)),
                    ("limit", "1".to_string()),
                ],
            )?;
            let current = rows.into_iter().next();
            let old_amount = current.as_ref().map(|b| b.amount).unwrap_or(Decimal::ZERO);
            let new_amount = old_amount + delta;

            if new_amount < Decimal::ZERO {
                return Err(Error::insufficient(format!("{} balance too low", currency)));
            }

            match current {
                Some(_) => {
                    let updated = self.update(
                        "balances",
                        &[
                            ("user_id", format!("eq.{}", user_id)),
                            ("currency", format!("eq.{}", currency)),
                            ("amount", format!("eq.{}", old_amount)),
                        ],
                        &json!({ "amount": new_amount, "updated_at": Utc::now() }),
                    )?;
                    if !updated.is_empty() {
                        return Ok(new_amount);
                    }
                }
                None => {
                    let body = json!([{
                        "user_id": user_id,
                        "currency": currency,
                        "amount": new_amount,
                    }]);
                    match self.insert::<Balance>("balances", &body) {
                        Ok(_) => return Ok(new_amount),
                        // Row appeared concurrently; re-read and retry
                        Err(err) if error_matches(&err, r"(?i)duplicate key") => {}
                        Err(err) => return Err(err),
                    }
                }
            }

            debug!(attempt, currency = %currency, "balance row moved, retrying conditional update");
        }

        Err(Error::Conflict(format!(
            "could not update {} balance after {} attempts",
            currency, CAS_MAX_ATTEMPTS
        )))
    }
}

/// Check an error message against a backend error-shape pattern
fn error_matches(err: &Error, pattern: &str) -> bool {
    let message = match err {
        Error::Store(m) | Error::Api(m) | Error::Validation(m) => m,
        _ => return false,
    };
    Regex::new(pattern)
        .map(|re| re.is_match(message))
        .unwrap_or(false)
}

impl WalletStore for PostgrestStore {
    fn insert_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let body = json!([{
            "username": username,
            "password": password_hash,
            "bonus_claimed": false,
        }]);

        let rows = match self.insert::<User>("users", &body) {
            Ok(rows) => rows,
            // Older hosted schemas reject the bonus column; insert without it
            Err(err) if error_matches(&err, MISSING_BONUS_COLUMN) => {
                debug!("users.bonus_claimed missing on hosted schema, inserting without it");
                let body = json!([{ "username": username, "password": password_hash }]);
                self.insert::<User>("users", &body)?
            }
            Err(err) => return Err(err),
        };

        rows.into_iter()
            .next()
            .ok_or_else(|| Error::store("user insert returned no row"))
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let rows: Vec<User> = self.select(
            "users",
            &[
                ("select", "*".to_string()),
                ("username", format!("eq.{}", username)),
                ("limit", "1".to_string()),
            ],
        )?;
        Ok(rows.into_iter().next())
    }

    fn find_user_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let rows: Vec<User> = self.select(
            "users",
            &[
                ("select", "*".to_string()),
                ("username", format!("eq.{}", username)),
                ("password", format!("eq.{}", password_hash)),
                ("limit", "1".to_string()),
            ],
        )?;
        Ok(rows.into_iter().next())
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let rows: Vec<User> = self.select(
            "users",
            &[
                ("select", "*".to_string()),
                ("id", format!("eq.{}", id)),
                ("limit", "1".to_string()),
            ],
        )?;
        let mut user = match rows.into_iter().next() {
            Some(user) => user,
            None => return Ok(None),
        };

        // Merge the bonus_claims compatibility table when the column reads
        // false; the claim may have landed there on an older schema.
        if !user.bonus_claimed {
            let claims: Result<Vec<JsonValue>> = self.select(
                "bonus_claims",
                &[
                    ("select", "user_id".to_string()),
                    ("user_id", format!("eq.{}", id)),
                    ("limit", "1".to_string()),
                ],
            );
            match claims {
                Ok(rows) if !rows.is_empty() => user.bonus_claimed = true,
                Ok(_) => {}
                Err(err) => debug!(error = %err, "bonus_claims lookup failed, ignoring"),
            }
        }

        Ok(Some(user))
    }

    fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let updated = self.update(
            "users",
            &[("id", format!("eq.{}", id))],
            &json!({ "password": password_hash }),
        )?;
        if updated.is_empty() {
            return Err(Error::not_found(format!("user {}", id)));
        }
        Ok(())
    }

    fn update_username(&self, id: Uuid, username: &str) -> Result<()> {
        let updated = self.update(
            "users",
            &[("id", format!("eq.{}", id))],
            &json!({ "username": username }),
        )?;
        if updated.is_empty() {
            return Err(Error::not_found(format!("user {}", id)));
        }
        Ok(())
    }

    fn mark_verification_sent(&self, id: Uuid) -> Result<()> {
        let updated = self.update(
            "users",
            &[("id", format!("eq.{}", id))],
            &json!({ "verification_sent_at": Utc::now() }),
        )?;
        if updated.is_empty() {
            return Err(Error::not_found(format!("user {}", id)));
        }
        Ok(())
    }

    fn mark_bonus_claimed(&self, id: Uuid, currency: Currency) -> Result<()> {
        let result = self.update(
            "users",
            &[("id", format!("eq.{}", id))],
            &json!({
                "bonus_claimed": true,
                "bonus_currency": currency,
                "bonus_claimed_at": Utc::now(),
            }),
        );

        match result {
            Ok(updated) if updated.is_empty() => Err(Error::not_found(format!("user {}", id))),
            Ok(_) => Ok(()),
            // Older hosted schemas track claims in a separate table
            Err(err) if error_matches(&err, MISSING_BONUS_COLUMN) => {
                debug!("users bonus columns missing on hosted schema, writing bonus_claims row");
                self.insert_only(
                    "bonus_claims",
                    &json!([{
                        "user_id": id,
                        "currency": currency,
                        "claimed_at": Utc::now(),
                    }]),
                )
            }
            Err(err) => Err(err),
        }
    }

    fn init_balances(&self, user_id: Uuid, currencies: &[Currency]) -> Result<()> {
        let rows: Vec<JsonValue> = currencies
            .iter()
            .map(|currency| {
                json!({
                    "user_id": user_id,
                    "currency": currency,
                    "amount": "0",
                })
            })
            .collect();
        // Keyed on the composite key so a retried registration is idempotent
        self.upsert_only("balances", "user_id,currency", &rows)
    }

    fn get_balances(&self, user_id: Uuid) -> Result<Vec<Balance>> {
        self.select(
            "balances",
            &[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
            ],
        )
    }

    fn adjust_balance(
        &self,
        user_id: Uuid,
        currency: Currency,
        delta: Decimal,
    ) -> Result<Decimal> {
        let args = json!({
            "p_user_id": user_id,
            "p_currency": currency,
            "p_delta": delta,
        });

        match self.rpc::<Decimal>("adjust_balance", &args) {
            Ok(amount) => Ok(amount),
            Err(err) if error_matches(&err, MISSING_ADJUST_FUNCTION) => {
                debug!("adjust_balance function missing on hosted schema, using conditional update");
                self.adjust_balance_cas(user_id, currency, delta)
            }
            Err(err) if error_matches(&err, r"(?i)insufficient") => {
                Err(Error::insufficient(format!("{} balance too low", currency)))
            }
            Err(err) => Err(err),
        }
    }

    fn append_entry(&self, entry: &NewLedgerEntry) -> Result<LedgerEntry> {
        let rows: Vec<LedgerEntry> = self.insert("transactions", &json!([entry]))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| Error::store("ledger insert returned no row"))
    }

    fn get_entries(&self, user_id: Uuid, limit: usize) -> Result<Vec<LedgerEntry>> {
        self.select(
            "transactions",
            &[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
    }

    fn get_deposit_addresses(&self) -> Result<Vec<DepositAddress>> {
        self.select("deposit_addresses", &[("select", "*".to_string())])
    }
}
