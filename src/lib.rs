//! Crypto Ledger Library
//! # Overview
//!
//! This library provides a durable multi-asset ledger: user-owned wallet
//! accounts, atomic transfers between them, and history queries, all backed
//! by an atomically replaced on-disk snapshot.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Symbol, Transaction, errors)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Transfer orchestration and the atomic commit path
//!   - [`core::account_store`] - Account state and balance bookkeeping
//!   - [`core::ledger_store`] - Append-only transaction history
//!   - [`core::address`] - Wallet address generation
//!   - [`core::query`] - Read-only views over committed state
//! - [`io`] - Durable snapshot storage with atomic replacement
//!
//! # Operations
//!
//! The engine exposes a narrow interface to the presentation layer:
//!
//! - **Create account**: register an identity, generating a unique wallet
//!   address and zero balances for every supported symbol
//! - **Grant demo funds**: credit fixed demo amounts (the only external
//!   deposit)
//! - **Transfer**: atomically debit a sender, credit the account owning
//!   the recipient address, and append a ledger record
//! - **Balances / history / address**: read-only queries over committed
//!   state
//!
//! # Invariants
//!
//! - Value is conserved: a transfer debits and credits equal amounts of
//!   the same symbol
//! - No balance is ever negative
//! - Identities, wallet addresses, and transaction ids are unique
//! - Both stores and the on-disk snapshot change as one atomic unit per
//!   mutation

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AccountStore, AddressGenerator, LedgerEngine, LedgerStore, QueryService};
pub use io::{Snapshot, SnapshotStore};
pub use types::{Account, Identity, LedgerError, Symbol, Transaction, TxId, WalletAddress};
