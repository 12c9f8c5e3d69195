//! Error types for the Crypto Ledger
//!
//! This module defines all error types that can occur during account
//! management, transfer processing, and persistence.
//!
//! # Error Categories
//!
//! - **Validation errors**: caller input is wrong (invalid amount,
//!   duplicate identity, self-transfer); fully recoverable, no state change.
//! - **Lookup errors**: a referenced account or address does not exist;
//!   recoverable.
//! - **Business-rule errors**: a precondition failed (insufficient funds);
//!   recoverable.
//! - **Integrity errors**: exhausted collision retries, arithmetic
//!   overflow, storage failures; fatal for the operation, which is
//!   guaranteed not to have partially applied.

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::{Identity, Symbol, WalletAddress};
use super::transaction::TxId;

/// Main error type for the ledger engine
///
/// Each variant carries the context needed to diagnose the failure; the
/// presentation layer maps these to user-facing messages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Identity string was empty at registration
    ///
    /// Validation error; nothing was created.
    #[error("Identity must not be empty")]
    EmptyIdentity,

    /// An account with this identity already exists
    ///
    /// Validation error; registration is rejected with no state change.
    #[error("Account '{identity}' already exists")]
    DuplicateIdentity {
        /// The identity that was already taken
        identity: Identity,
    },

    /// No account exists for the given identity
    ///
    /// Lookup error for balance/history queries and fund grants.
    #[error("No account found for '{identity}'")]
    AccountNotFound {
        /// The identity that was not found
        identity: Identity,
    },

    /// The transfer's sending account does not exist
    ///
    /// Lookup error; the transfer is rejected with no mutation.
    #[error("Sender account '{identity}' not found")]
    SenderNotFound {
        /// The sender identity that was not found
        identity: Identity,
    },

    /// No account holds the requested recipient address
    ///
    /// Lookup error; the transfer is rejected with no mutation.
    #[error("Recipient address {address} not found")]
    RecipientNotFound {
        /// The wallet address with no owning account
        address: WalletAddress,
    },

    /// Transfer amount was zero or negative
    ///
    /// Validation error; rejected before any lookup or mutation.
    #[error("Invalid transfer amount {amount}: must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// The recipient address resolves back to the sending account
    ///
    /// Validation error; self-transfers are disallowed by policy.
    #[error("Account '{identity}' cannot transfer to its own address")]
    SelfTransfer {
        /// The identity attempting the self-transfer
        identity: Identity,
    },

    /// The sender's balance does not cover the requested amount
    ///
    /// Business-rule error; the transfer is rejected and both stores are
    /// left untouched.
    #[error(
        "Insufficient {symbol} balance for '{identity}': available {available}, requested {requested}"
    )]
    InsufficientFunds {
        /// Identity whose balance was insufficient
        identity: Identity,
        /// Asset symbol of the attempted debit
        symbol: Symbol,
        /// Balance available at the time of the attempt
        available: Decimal,
        /// Amount the transfer required
        requested: Decimal,
    },

    /// A balance adjustment would overflow the decimal range
    ///
    /// Integrity error; the operation is rejected to keep balances exact.
    #[error("Arithmetic overflow in {operation} for '{identity}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Identity whose balance was being adjusted
        identity: Identity,
    },

    /// A transaction with this id is already in the ledger
    ///
    /// Integrity error at the ledger boundary. The transfer engine retries
    /// id generation before appending, so surfacing this indicates a
    /// corrupted snapshot or an external append with a stale id.
    #[error("Duplicate transaction id {id}")]
    DuplicateTransactionId {
        /// The colliding transaction id
        id: TxId,
    },

    /// Transaction-id generation kept colliding past the retry budget
    ///
    /// Integrity error; the transfer is reported as failed with no
    /// mutation performed.
    #[error("Could not derive a unique transaction id after {attempts} attempts")]
    TransactionIdExhausted {
        /// Number of derivation attempts made
        attempts: u32,
    },

    /// Wallet-address generation kept colliding past the retry budget
    ///
    /// Integrity error; registration is reported as failed with no
    /// account created.
    #[error("Could not generate a unique wallet address after {attempts} attempts")]
    AddressCollision {
        /// Number of generation attempts made
        attempts: u32,
    },

    /// Unrecognized asset symbol
    ///
    /// Parse error at the interface boundary; the supported set is fixed.
    #[error("Unknown asset symbol '{symbol}'")]
    UnknownSymbol {
        /// The unrecognized symbol string
        symbol: String,
    },

    /// Durable storage could not be read or written
    ///
    /// Integrity error. When raised during a transfer commit, both stores
    /// remain in their pre-transfer state.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// The on-disk snapshot exists but could not be decoded
    ///
    /// Fatal at startup; the snapshot is never silently replaced.
    #[error("Corrupt snapshot at {path}: {message}")]
    Corrupt {
        /// Path of the unreadable snapshot file
        path: String,
        /// Description of the decoding failure
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Storage {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a DuplicateIdentity error
    pub fn duplicate_identity(identity: &str) -> Self {
        LedgerError::DuplicateIdentity {
            identity: identity.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(identity: &str) -> Self {
        LedgerError::AccountNotFound {
            identity: identity.to_string(),
        }
    }

    /// Create a SenderNotFound error
    pub fn sender_not_found(identity: &str) -> Self {
        LedgerError::SenderNotFound {
            identity: identity.to_string(),
        }
    }

    /// Create a RecipientNotFound error
    pub fn recipient_not_found(address: &str) -> Self {
        LedgerError::RecipientNotFound {
            address: address.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(identity: &str) -> Self {
        LedgerError::SelfTransfer {
            identity: identity.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        identity: &str,
        symbol: Symbol,
        available: Decimal,
        requested: Decimal,
    ) -> Self {
        LedgerError::InsufficientFunds {
            identity: identity.to_string(),
            symbol,
            available,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, identity: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            identity: identity.to_string(),
        }
    }

    /// Create a DuplicateTransactionId error
    pub fn duplicate_transaction_id(id: &str) -> Self {
        LedgerError::DuplicateTransactionId { id: id.to_string() }
    }

    /// Create an UnknownSymbol error
    pub fn unknown_symbol(symbol: &str) -> Self {
        LedgerError::UnknownSymbol {
            symbol: symbol.to_string(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage {
            message: message.into(),
        }
    }

    /// Create a Corrupt error
    pub fn corrupt(path: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
