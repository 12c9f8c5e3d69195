use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::types::Symbol;

/// Custody and transfer of multi-asset wallet balances
#[derive(Parser, Debug)]
#[command(name = "crypto-ledger")]
#[command(about = "Custody and transfer of multi-asset wallet balances", long_about = None)]
pub struct CliArgs {
    /// Directory holding the durable ledger snapshot
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "LEDGER_DATA_DIR",
        default_value = "ledger-data",
        help = "Directory holding the durable ledger snapshot"
    )]
    pub data_dir: PathBuf,

    /// Operation to perform against the ledger
    #[command(subcommand)]
    pub command: Command,
}

/// Ledger operations exposed to the command line
///
/// Each subcommand maps onto one call of the engine's public interface;
/// the CLI layer itself holds no state and enforces no rules.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new account and print its wallet address
    Register {
        /// Identity handle for the new account
        identity: String,
    },

    /// Credit the fixed demo amounts to an account
    Fund {
        /// Identity of the account to fund
        identity: String,
    },

    /// Send an amount to the account owning a wallet address
    Send {
        /// Identity of the sending account
        identity: String,

        /// Recipient wallet address (0x + 40 alphanumerics)
        recipient_address: String,

        /// Asset symbol to transfer (BTC, ETH, or USDT)
        symbol: Symbol,

        /// Amount to transfer, must be positive
        amount: Decimal,
    },

    /// Show an account's balances
    Balances {
        /// Identity of the account to inspect
        identity: String,
    },

    /// Show an account's wallet address for receiving transfers
    Address {
        /// Identity of the account to inspect
        identity: String,
    },

    /// Show an account's transfer history
    History {
        /// Identity whose transactions to list
        identity: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_data_dir_flag_overrides_default() {
        let parsed =
            CliArgs::try_parse_from(["program", "--data-dir", "/tmp/ledger", "balances", "alice"])
                .unwrap();
        assert_eq!(parsed.data_dir, PathBuf::from("/tmp/ledger"));
    }

    #[test]
    fn test_register_subcommand() {
        let parsed = CliArgs::try_parse_from(["program", "register", "alice"]).unwrap();
        match parsed.command {
            Command::Register { identity } => assert_eq!(identity, "alice"),
            other => panic!("Expected Register, got {other:?}"),
        }
    }

    #[test]
    fn test_send_subcommand_parses_symbol_and_amount() {
        let parsed = CliArgs::try_parse_from([
            "program", "send", "alice", "0xABCDEF", "btc", "0.25",
        ])
        .unwrap();

        match parsed.command {
            Command::Send {
                identity,
                recipient_address,
                symbol,
                amount,
            } => {
                assert_eq!(identity, "alice");
                assert_eq!(recipient_address, "0xABCDEF");
                assert_eq!(symbol, Symbol::Btc);
                assert_eq!(amount, Decimal::new(25, 2));
            }
            other => panic!("Expected Send, got {other:?}"),
        }
    }

    #[rstest]
    #[case::missing_subcommand(&["program"])]
    #[case::unknown_subcommand(&["program", "mint", "alice"])]
    #[case::unknown_symbol(&["program", "send", "alice", "0xABCDEF", "doge", "1"])]
    #[case::malformed_amount(&["program", "send", "alice", "0xABCDEF", "btc", "one"])]
    #[case::missing_identity(&["program", "balances"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
