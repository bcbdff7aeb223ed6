//! Deposit command - addresses and simulated credits

use anyhow::{bail, Result};

use super::{get_context, load_session, parse_amount, parse_currency};
use crate::output;

pub fn run(currency: Option<String>, credit: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    // --credit simulates an incoming transfer to the shown address
    if let Some(amount) = credit {
        let currency = match &currency {
            Some(currency) => parse_currency(currency)?,
            None => bail!("--credit requires a currency (e.g. `purse deposit ETH --credit 1.5`)"),
        };
        let amount = parse_amount(&amount)?;
        let receipt = ctx
            .wallet_service
            .credit_deposit(session.user_id, currency, amount)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            return Ok(());
        }

        output::success(&format!(
            "Credited {} {} (balance: {})",
            output::format_amount(receipt.amount),
            receipt.currency,
            output::format_amount(receipt.new_balance)
        ));
        return Ok(());
    }

    let mut addresses = ctx.wallet_service.deposit_addresses()?;
    if let Some(currency) = &currency {
        let currency = parse_currency(currency)?;
        addresses.retain(|a| a.currency == currency);
        if addresses.is_empty() {
            bail!("no deposit address configured for {}", currency);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&addresses)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Currency", "Address"]);
    for address in &addresses {
        table.add_row(vec![address.currency.to_string(), address.address.clone()]);
    }
    println!("{}", table);
    output::info("Send funds to the address for your chosen currency");
    Ok(())
}
