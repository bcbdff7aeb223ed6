//! Bonus command - claim the one-time registration bonus

use anyhow::Result;

use super::{get_context, load_session, parse_currency};
use crate::output;

pub fn run(currency: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    let currency = parse_currency(currency)?;
    let receipt = ctx.bonus_service.claim(session.user_id, currency)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    output::success(&format!(
        "Claimed $300 bonus as {} {} (balance: {})",
        output::format_amount(receipt.amount),
        receipt.currency,
        output::format_amount(receipt.new_balance)
    ));
    Ok(())
}
