//! Login, logout, and whoami commands

use anyhow::Result;
use chrono::Utc;
use dialoguer::{Input, Password};

use super::{clear_session, get_context, load_session, save_session, Session};
use crate::output;

pub fn run(username: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let user = ctx.auth_service.login(&username, &password)?;

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

    output::success(&format!("Logged in as {}", user.username));
    Ok(())
}

pub fn run_logout() -> Result<()> {
    if clear_session()? {
        output::success("Logged out");
    } else {
        output::info("No active session");
    }
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let session = load_session()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!("{}", session.username);
    Ok(())
}
