//! Send command - transfer USDT to another user

use anyhow::Result;

use super::{get_context, load_session, parse_amount};
use crate::output;

pub fn run(recipient: &str, amount: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    let amount = parse_amount(amount)?;
    let receipt = ctx
        .exchange_service
        .send(session.user_id, recipient, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Sent {} USDT to {}",
        output::format_amount(receipt.amount),
        receipt.recipient
    ));
    Ok(())
}
