//! Account command - username, password, and verification maintenance

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Password;

use super::{get_context, load_session, save_session};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Change your username
    Username {
        /// The new username
        username: String,
    },
    /// Change your password (verifies the current one)
    Password,
    /// Reset a forgotten password by username (no login required)
    ResetPassword {
        /// Username of the account to reset
        username: String,
    },
    /// Request an email verification
    VerifyEmail,
}

pub fn run(command: AccountCommands) -> Result<()> {
    match command {
        AccountCommands::Username { username } => run_username(&username),
        AccountCommands::Password => run_password(),
        AccountCommands::ResetPassword { username } => run_reset_password(&username),
        AccountCommands::VerifyEmail => run_verify_email(),
    }
}

fn run_username(new_username: &str) -> Result<()> {
    let ctx = get_context()?;
    let mut session = load_session()?;

    ctx.auth_service
        .update_username(session.user_id, new_username)?;

    session.username = new_username.trim().to_string();
    save_session(&session)?;

    output::success(&format!("Username changed to {}", session.username));
    Ok(())
}

fn run_password() -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    let current = Password::new().with_prompt("Current password").interact()?;
    let new = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "passwords do not match")
        .interact()?;

    ctx.auth_service
        .update_password(session.user_id, &current, &new)?;

    output::success("Password changed");
    Ok(())
}

fn run_reset_password(username: &str) -> Result<()> {
    let ctx = get_context()?;

    let new = Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "passwords do not match")
        .interact()?;

    ctx.auth_service.reset_password(username, &new)?;

    output::success(&format!("Password reset for {}", username));
    Ok(())
}

fn run_verify_email() -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    ctx.auth_service
        .request_email_verification(session.user_id)?;

    output::success("Verification email requested");
    Ok(())
}
