//! Account and wallet types for the Crypto Ledger
//!
//! This module defines the Account structure, the closed set of supported
//! asset symbols, and the identifier aliases used throughout the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::LedgerError;

/// User identity handle
///
/// Unique across all accounts. Supplied by the (external) authentication
/// layer; the engine treats it as an opaque, trusted string.
pub type Identity = String;

/// Wallet address
///
/// Public routing target for transfers: `0x` followed by 40 alphanumeric
/// characters. Generated once at account creation, immutable afterwards,
/// unique across all accounts.
pub type WalletAddress = String;

/// Asset symbols supported by the ledger
///
/// The set is closed: every wallet carries a balance entry for every
/// symbol, and transfers may only reference these variants. Serialized
/// as the upper-case asset code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Symbol {
    /// Bitcoin, displayed with 8 decimal places
    Btc,

    /// Ether, displayed with 8 decimal places
    Eth,

    /// Tether, displayed with 2 decimal places
    Usdt,
}

impl Symbol {
    /// Every supported symbol, in display order
    pub const ALL: [Symbol; 3] = [Symbol::Btc, Symbol::Eth, Symbol::Usdt];

    /// The upper-case asset code for this symbol
    pub fn code(&self) -> &'static str {
        match self {
            Symbol::Btc => "BTC",
            Symbol::Eth => "ETH",
            Symbol::Usdt => "USDT",
        }
    }

    /// Number of decimal places used when displaying amounts of this asset
    ///
    /// Presentation concern only; stored amounts keep full `Decimal`
    /// precision.
    pub fn display_decimals(&self) -> u32 {
        match self {
            Symbol::Btc | Symbol::Eth => 8,
            Symbol::Usdt => 2,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Symbol {
    type Err = LedgerError;

    /// Parse an asset code, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BTC" => Ok(Symbol::Btc),
            "ETH" => Ok(Symbol::Eth),
            "USDT" => Ok(Symbol::Usdt),
            _ => Err(LedgerError::unknown_symbol(s)),
        }
    }
}

/// A user-owned wallet account
///
/// Created once at registration and never deleted. Balances are mutated
/// only by the transfer engine's atomic commit path; every supported
/// symbol is present in the map from the moment of creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identity handle owning this wallet
    pub identity: Identity,

    /// Unique wallet address, generated at creation and immutable
    pub address: WalletAddress,

    /// Per-symbol balances
    ///
    /// Non-negative at all times. Zero-initialized for every supported
    /// symbol; lookups of a symbol therefore never fail.
    pub balances: HashMap<Symbol, Decimal>,
}

impl Account {
    /// Create a new account with zero balances for every supported symbol
    pub fn new(identity: impl Into<Identity>, address: impl Into<WalletAddress>) -> Self {
        Account {
            identity: identity.into(),
            address: address.into(),
            balances: Symbol::ALL.iter().map(|s| (*s, Decimal::ZERO)).collect(),
        }
    }

    /// Balance for a symbol, defaulting to zero when absent
    ///
    /// Absence can only arise from a snapshot written by an older layout;
    /// the zero default keeps such wallets readable.
    pub fn balance(&self, symbol: Symbol) -> Decimal {
        self.balances.get(&symbol).copied().unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_account_has_zero_balance_for_every_symbol() {
        let account = Account::new("alice", "0xAAAA");

        assert_eq!(account.identity, "alice");
        assert_eq!(account.address, "0xAAAA");
        assert_eq!(account.balances.len(), Symbol::ALL.len());
        for symbol in Symbol::ALL {
            assert_eq!(account.balance(symbol), Decimal::ZERO);
        }
    }

    #[test]
    fn test_balance_defaults_to_zero_for_missing_symbol() {
        let mut account = Account::new("alice", "0xAAAA");
        account.balances.remove(&Symbol::Usdt);

        assert_eq!(account.balance(Symbol::Usdt), Decimal::ZERO);
    }

    #[rstest]
    #[case::btc_upper("BTC", Symbol::Btc)]
    #[case::btc_lower("btc", Symbol::Btc)]
    #[case::eth_mixed("Eth", Symbol::Eth)]
    #[case::usdt("USDT", Symbol::Usdt)]
    fn test_symbol_from_str(#[case] input: &str, #[case] expected: Symbol) {
        assert_eq!(input.parse::<Symbol>().unwrap(), expected);
    }

    #[test]
    fn test_symbol_from_str_rejects_unknown_code() {
        let result = "DOGE".parse::<Symbol>();
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::UnknownSymbol { .. }
        ));
    }

    #[test]
    fn test_symbol_display_matches_code() {
        for symbol in Symbol::ALL {
            assert_eq!(symbol.to_string(), symbol.code());
        }
    }

    #[test]
    fn test_symbol_serializes_as_upper_case_code() {
        let json = serde_json::to_string(&Symbol::Btc).unwrap();
        assert_eq!(json, "\"BTC\"");

        let parsed: Symbol = serde_json::from_str("\"USDT\"").unwrap();
        assert_eq!(parsed, Symbol::Usdt);
    }

    #[test]
    fn test_balances_round_trip_through_json() {
        let mut account = Account::new("alice", "0xAAAA");
        account
            .balances
            .insert(Symbol::Btc, Decimal::new(5000000, 8)); // 0.05000000

        let json = serde_json::to_string(&account).unwrap();
        let parsed: Account = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, account);
    }
}
