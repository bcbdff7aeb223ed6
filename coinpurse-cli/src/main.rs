//! Coinpurse CLI - a simulated crypto wallet in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    account, balances, bonus, deposit, history, login, prices, register, send, swap, withdraw,
};

/// Coinpurse - a simulated crypto wallet in your terminal
#[derive(Parser)]
#[command(name = "purse", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new wallet user
    Register {
        /// Username (prompted if omitted)
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in and store the session
    Login {
        /// Username (prompted if omitted)
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out and clear the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show balances with USD and IDR values
    Balances {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show deposit addresses, or credit a simulated deposit
    Deposit {
        /// Currency to show (all if omitted)
        currency: Option<String>,
        /// Credit a simulated incoming deposit of this amount
        #[arg(long)]
        credit: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw to an external address
    Withdraw {
        /// Currency to withdraw
        currency: String,
        /// Amount to withdraw
        amount: String,
        /// Destination address
        address: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Swap one currency into another
    Swap {
        /// Currency to swap from
        from: String,
        /// Currency to swap into
        to: String,
        /// Amount of the source currency
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send USDT to another user
    Send {
        /// Recipient username
        recipient: String,
        /// Amount of USDT
        amount: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Claim the one-time $300 registration bonus
    Bonus {
        /// Currency to receive the bonus in
        currency: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show transaction history
    History {
        /// Number of entries to show
        #[arg(long, default_value_t = coinpurse_core::services::DEFAULT_HISTORY_LIMIT)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Export entries to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show prices
    Prices {
        /// Overlay live quotes on the static table
        #[arg(long)]
        live: bool,
        /// Keep refreshing live quotes on an interval
        #[arg(long)]
        watch: bool,
        /// Seconds between refreshes
        #[arg(long, default_value_t = 15)]
        interval: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage account settings
    Account {
        #[command(subcommand)]
        command: account::AccountCommands,
    },
}

fn main() -> ExitCode {
    // Verbosity is driven by RUST_LOG; quiet by default
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { username, json } => register::run(username, json),
        Commands::Login { username, json } => login::run(username, json),
        Commands::Logout => login::run_logout(),
        Commands::Whoami { json } => login::run_whoami(json),
        Commands::Balances { json } => balances::run(json),
        Commands::Deposit {
            currency,
            credit,
            json,
        } => deposit::run(currency, credit, json),
        Commands::Withdraw {
            currency,
            amount,
            address,
            json,
        } => withdraw::run(&currency, &amount, &address, json),
        Commands::Swap {
            from,
            to,
            amount,
            json,
        } => swap::run(&from, &to, &amount, json),
        Commands::Send {
            recipient,
            amount,
            json,
        } => send::run(&recipient, &amount, json),
        Commands::Bonus { currency, json } => bonus::run(&currency, json),
        Commands::History {
            limit,
            json,
            export,
        } => history::run(limit, json, export),
        Commands::Prices {
            live,
            watch,
            interval,
            json,
        } => prices::run(live, watch, interval, json),
        Commands::Account { command } => account::run(command),
    }
}
