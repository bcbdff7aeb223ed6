//! Swap command

use anyhow::Result;

use super::{get_context, load_session, parse_amount, parse_currency};
use crate::output;

pub fn run(from: &str, to: &str, amount: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    let from = parse_currency(from)?;
    let to = parse_currency(to)?;
    let amount = parse_amount(amount)?;

    let receipt = ctx
        .exchange_service
        .swap(session.user_id, from, to, amount)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Swapped {} {} into {} {} ({})",
        output::format_amount(receipt.amount),
        receipt.from,
        output::format_amount(receipt.to_amount),
        receipt.to,
        output::format_usd(receipt.usd_value)
    ));
    Ok(())
}
