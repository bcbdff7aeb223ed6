//! Auth service - registration, login, and account maintenance
//!
//! Passwords are hashed client-side with SHA-256 before they ever cross the
//! wire; the hosted backend stores and compares the digest as-is.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;
use uuid::Uuid;

use crate::domain::{hash_password, Currency, User};
use crate::ports::WalletStore;

/// Auth service for user registration and credentials
pub struct AuthService {
    store: Arc<dyn WalletStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Register a new user and zero-initialize balances for every currency
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            bail!("username is required");
        }
        if password.is_empty() {
            bail!("password is required");
        }

        // Pre-insert existence check; the store's unique constraint is the
        // final arbiter under concurrent registration.
        if self.store.find_user_by_username(username)?.is_some() {
            bail!("username already taken");
        }

        let user = self.store.insert_user(username, &hash_password(password))?;
        self.store.init_balances(user.id, &Currency::ALL)?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials and return the matching user
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let user = self
            .store
            .find_user_by_credentials(username, &hash_password(password))?;

        match user {
            Some(user) => {
                info!(user_id = %user.id, "login succeeded");
                Ok(user)
            }
            None => bail!("invalid username or password"),
        }
    }

    /// Replace a forgotten password by username
    pub fn reset_password(&self, username: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            bail!("password is required");
        }
        let user = match self.store.find_user_by_username(username.trim())? {
            Some(user) => user,
            None => bail!("username not found"),
        };
        self.store
            .update_password(user.id, &hash_password(new_password))?;
        info!(user_id = %user.id, "password reset");
        Ok(())
    }

    /// Rename a user, enforcing username uniqueness
    pub fn update_username(&self, user_id: Uuid, new_username: &str) -> Result<()> {
        let new_username = new_username.trim();
        if new_username.is_empty() {
            bail!("username is required");
        }

        if let Some(existing) = self.store.find_user_by_username(new_username)? {
            if existing.id != user_id {
                bail!("username already taken");
            }
        }

        self.store.update_username(user_id, new_username)?;
        Ok(())
    }

    /// Change a password after verifying the current one
    pub fn update_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if new_password.is_empty() {
            bail!("password is required");
        }
        let user = self.user(user_id)?;
        if hash_password(current_password) != user.password_hash {
            bail!("current password is incorrect");
        }
        self.store
            .update_password(user_id, &hash_password(new_password))?;
        Ok(())
    }

    /// Record that a verification email was requested
    ///
    /// The client only records intent; actually sending mail is up to the
    /// hosted backend.
    pub fn request_email_verification(&self, user_id: Uuid) -> Result<()> {
        let user = self.user(user_id)?;
        if user.email.as_deref().unwrap_or("").is_empty() {
            bail!("no email address on file");
        }
        self.store.mark_verification_sent(user_id)?;
        Ok(())
    }

    /// Fetch a user by id, including merged bonus-claim state
    pub fn user(&self, user_id: Uuid) -> Result<User> {
        match self.store.get_user(user_id)? {
            Some(user) => Ok(user),
            None => bail!("user not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_register_creates_zeroed_balances() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(Arc::clone(&store) as Arc<dyn WalletStore>);

        let user = auth.register("alice", "hunter2").unwrap();
        let balances = store.get_balances(user.id).unwrap();
        assert_eq!(balances.len(), Currency::ALL.len());
        assert!(balances.iter().all(|b| b.amount.is_zero()));
    }

    #[test]
    fn test_register_rejects_duplicate_username() {
        let auth = service();
        auth.register("alice", "hunter2").unwrap();
        let err = auth.register("alice", "other").unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[test]
    fn test_login_roundtrip() {
        let auth = service();
        let registered = auth.register("bob", "secret").unwrap();
        let logged_in = auth.login("bob", "secret").unwrap();
        assert_eq!(registered.id, logged_in.id);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let auth = service();
        auth.register("bob", "secret").unwrap();
        let err = auth.login("bob", "wrong").unwrap_err();
        assert!(err.to_string().contains("invalid username or password"));
    }

    #[test]
    fn test_update_password_requires_current() {
        let auth = service();
        let user = auth.register("carol", "old-pass").unwrap();

        let err = auth
            .update_password(user.id, "not-it", "new-pass")
            .unwrap_err();
        assert!(err.to_string().contains("current password"));

        auth.update_password(user.id, "old-pass", "new-pass").unwrap();
        auth.login("carol", "new-pass").unwrap();
    }

    #[test]
    fn test_reset_password() {
        let auth = service();
        auth.register("dave", "first").unwrap();
        auth.reset_password("dave", "second").unwrap();
        auth.login("dave", "second").unwrap();
        assert!(auth.login("dave", "first").is_err());
    }

    #[test]
    fn test_update_username_uniqueness() {
        let auth = service();
        let user = auth.register("erin", "pw").unwrap();
        auth.register("frank", "pw").unwrap();

        let err = auth.update_username(user.id, "frank").unwrap_err();
        assert!(err.to_string().contains("already taken"));

        // Renaming to your own name is a no-op, not a conflict
        auth.update_username(user.id, "erin").unwrap();
    }

    #[test]
    fn test_email_verification_requires_email() {
        let auth = service();
        let user = auth.register("grace", "pw").unwrap();
        let err = auth.request_email_verification(user.id).unwrap_err();
        assert!(err.to_string().contains("no email address"));
    }
}
