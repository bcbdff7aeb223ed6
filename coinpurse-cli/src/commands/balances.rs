//! Balances command - balance sheet with USD and IDR values

use anyhow::Result;
use colored::Colorize;

use super::{get_context, load_session};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    let sheet = ctx.wallet_service.balance_sheet(session.user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sheet)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Currency", "Amount", "USD", "IDR"]);
    for line in &sheet.lines {
        table.add_row(vec![
            line.currency.to_string(),
            output::format_amount(line.amount),
            output::format_usd(line.usd_value),
            output::format_idr(line.idr_value),
        ]);
    }
    println!("{}", table);
    println!();
    let total_usd = output::format_usd(sheet.total_usd);
    println!(
        "Total: {} ({})",
        total_usd.as_str().bold(),
        output::format_idr(sheet.total_idr)
    );
    Ok(())
}
