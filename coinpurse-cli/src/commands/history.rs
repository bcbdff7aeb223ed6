//! History command - recent ledger entries and CSV export

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{get_context, load_session};
use crate::output;

pub fn run(limit: usize, json: bool, export: Option<PathBuf>) -> Result<()> {
    let ctx = get_context()?;
    let session = load_session()?;

    if let Some(path) = export {
        let file = File::create(&path)
            .with_context(|| format!("failed to create export file: {:?}", path))?;
        let rows = ctx
            .history_service
            .export_csv(session.user_id, limit, file)?;
        output::success(&format!("Exported {} entries to {:?}", rows, path));
        return Ok(());
    }

    let entries = ctx.history_service.recent(session.user_id, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No transactions yet");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Type", "Currency", "Amount", "Detail", "Status"]);
    for entry in &entries {
        let detail = match (entry.from_currency, entry.to_currency) {
            (Some(from), Some(to)) => format!("{} -> {}", from, to),
            _ => String::new(),
        };
        table.add_row(vec![
            entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            entry.kind.as_str().to_string(),
            entry.currency.to_string(),
            output::format_amount(entry.amount),
            detail,
            entry.status.as_str().to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
