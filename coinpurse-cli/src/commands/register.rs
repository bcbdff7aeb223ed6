//! Register command - create a wallet user

use anyhow::Result;
use chrono::Utc;
use dialoguer::{Input, Password};

use super::{get_context, save_session, Session};
use crate::output;

pub fn run(username: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "passwords do not match")
        .interact()?;

    let user = ctx.auth_service.register(&username, &password)?;

    save_session(&Session {
        user_id: user.id,
        username: user.username.clone(),
        logged_in_at: Utc::now(),
    })?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "id": user.id,
                "username": user.username,
            }))?
        );
        return Ok(());
    }

    output::success(&format!("Registered and logged in as {}", user.username));
    output::info("Run `purse bonus <currency>` to claim your $300 registration bonus");
    Ok(())
}
