//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format a crypto amount without trailing zeros
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Format a USD value
pub fn format_usd(value: Decimal) -> String {
    format!("${:.2}", value)
}

/// Format an IDR value (whole rupiah)
pub fn format_idr(value: Decimal) -> String {
    format!("Rp {:.0}", value)
}
