//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account, wallet, and symbol types
//! - `transaction`: Immutable transaction records and identifiers
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{Account, Identity, Symbol, WalletAddress};
pub use error::LedgerError;
pub use transaction::{Transaction, TxId, TX_ID_BYTES, TX_ID_LEN};
