//! Withdraw command

use anyhow::Result;

use super::{get_context, load_session, parse_amount, parse_currency};
use crate::output;

pub fn run(currency: &str, amount: &str, address: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    let currency = parse_currency(currency)?;
    let amount = parse_amount(amount)?;

    let receipt = ctx
        .exchange_service
        .withdraw(session.user_id, currency, amount, address)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Withdrew {} {} to {}",
        output::format_amount(receipt.amount),
        receipt.currency,
        receipt.address
    ));
    Ok(())
}
