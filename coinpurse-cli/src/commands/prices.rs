//! Prices command - static table with optional live overlay

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use super::get_context;
use crate::output;

use coinpurse_core::services::PriceSnapshot;
use coinpurse_core::WalletContext;

pub fn run(live: bool, watch: bool, interval: u64, json: bool) -> Result<()> {
    let ctx = get_context()?;

    if watch {
        // Refresh on an interval until interrupted
        loop {
            refresh_with_spinner(&ctx);
            print_snapshot(&ctx.price_service.snapshot(), json)?;
            std::thread::sleep(Duration::from_secs(interval.max(1)));
        }
    }

    if live {
        refresh_with_spinner(&ctx);
    }
    print_snapshot(&ctx.price_service.snapshot(), json)
}

/// Best-effort overlay refresh; failures degrade to static prices
fn refresh_with_spinner(ctx: &WalletContext) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("valid spinner template"),
    );
    spinner.set_message("fetching live quotes...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = ctx.price_service.refresh();
    spinner.finish_and_clear();

    if let Err(err) = result {
        output::warning(&format!("live quotes unavailable: {:#}", err));
    }
}

fn print_snapshot(snapshot: &PriceSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Currency", "USD", "Source"]);
    for quote in &snapshot.quotes {
        table.add_row(vec![
            quote.currency.to_string(),
            output::format_usd(quote.usd),
            if quote.live { "live" } else { "static" }.to_string(),
        ]);
    }
    println!("{}", table);

    if let Some(updated) = snapshot.last_updated {
        println!("Last updated: {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}
