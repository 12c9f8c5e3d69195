//! Crypto Ledger CLI
//!
//! Command-line front-end for the ledger engine. This layer only parses
//! input, calls the engine's public interface, and formats the results;
//! every rule lives behind that interface. The identity arguments are
//! taken at face value — authentication is an external concern that
//! supplies a trusted identity string.
//!
//! # Usage
//!
//! ```bash
//! crypto-ledger register alice
//! crypto-ledger fund alice
//! crypto-ledger send alice 0x<recipient-address> BTC 0.25
//! crypto-ledger balances alice
//! crypto-ledger address alice
//! crypto-ledger history alice
//! ```
//!
//! State lives in `--data-dir` (or `$LEDGER_DATA_DIR`), `./ledger-data`
//! by default. Logs go to stderr (`RUST_LOG` controls the filter);
//! command output goes to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (rejected operation, unknown account, storage failure, etc.)

use std::collections::HashMap;
use std::process;

use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use crypto_ledger::cli::{self, CliArgs, Command};
use crypto_ledger::core::address;
use crypto_ledger::types::{LedgerError, Symbol, Transaction};
use crypto_ledger::LedgerEngine;

fn main() {
    // Logs to stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Dispatch one subcommand against the engine
fn run(args: CliArgs) -> Result<(), LedgerError> {
    let engine = LedgerEngine::open(&args.data_dir)?;

    match args.command {
        Command::Register { identity } => {
            let account = engine.create_account(&identity)?;
            println!("Registered '{}'", account.identity);
            println!("Wallet address: {}", account.address);
        }
        Command::Fund { identity } => {
            let account = engine.grant_demo_funds(&identity)?;
            println!("Demo funds added for '{}'", account.identity);
            print_balances(&engine.get_balances(&identity)?);
        }
        Command::Send {
            identity,
            recipient_address,
            symbol,
            amount,
        } => {
            // Reject obviously malformed addresses before they reach the
            // engine; the error is the same one a full lookup would give.
            if !address::is_well_formed(&recipient_address) {
                return Err(LedgerError::recipient_not_found(&recipient_address));
            }
            let tx = engine.transfer(&identity, &recipient_address, symbol, amount)?;
            println!("Transaction successful! ID: {}", tx.id);
        }
        Command::Balances { identity } => {
            print_balances(&engine.get_balances(&identity)?);
        }
        Command::Address { identity } => {
            let account = engine.get_account(&identity)?;
            println!("{}", account.address);
        }
        Command::History { identity } => {
            let history = engine.get_history(&identity);
            if history.is_empty() {
                println!("No transactions found.");
            }
            for tx in &history {
                println!("{}", format_history_line(tx, &identity));
            }
        }
    }

    Ok(())
}

/// Print one line per symbol with its display precision
fn print_balances(balances: &HashMap<Symbol, Decimal>) {
    for symbol in Symbol::ALL {
        let amount = balances.get(&symbol).copied().unwrap_or(Decimal::ZERO);
        println!(
            "{}: {:.prec$}",
            symbol,
            amount,
            prec = symbol.display_decimals() as usize
        );
    }
}

/// Render a history entry from the queried identity's perspective
fn format_history_line(tx: &Transaction, identity: &str) -> String {
    let (direction, counterparty) = if tx.sender == identity {
        ("Sent", tx.recipient.as_str())
    } else {
        ("Received", tx.sender.as_str())
    };

    format!(
        "{}  {:<8}  {} {}  {}  {}",
        tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
        direction,
        tx.amount,
        tx.symbol,
        counterparty,
        tx.id
    )
}
