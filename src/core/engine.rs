//! Transfer engine and ledger facade
//!
//! This module provides the `LedgerEngine`, the single entry point through
//! which the presentation layer touches the ledger. It orchestrates the
//! AccountStore, LedgerStore, and SnapshotStore and enforces the system
//! invariants:
//!
//! - Value is conserved: every transfer debits and credits the same amount
//!   of the same symbol.
//! - No balance ever goes negative.
//! - The account store, ledger store, and on-disk snapshot change as one
//!   atomic unit per mutation, or not at all.
//!
//! # Concurrency
//!
//! The engine supports many concurrent callers. All state sits behind one
//! `parking_lot::RwLock`: mutations (`create_account`, `grant_demo_funds`,
//! `transfer`) take the write lock for validation, the staged durable
//! flush, and the in-memory install; reads share the read lock and can
//! never observe a transfer mid-commit. Both logical stores live in the
//! same durable snapshot, so a single writer guarding the pair is the
//! whole locking story.
//!
//! # Atomic Commit
//!
//! Mutations are staged: the post-operation state is computed without
//! touching the live stores, committed to disk via the snapshot store's
//! temp-file-and-rename protocol, and only then installed in memory. A
//! failed flush therefore leaves memory and disk exactly as they were.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::core::account_store::AccountStore;
use crate::core::address::AddressGenerator;
use crate::core::ledger_store::LedgerStore;
use crate::core::query::QueryService;
use crate::io::snapshot::{Snapshot, SnapshotStore};
use crate::types::{Account, LedgerError, Symbol, Transaction, TxId, TX_ID_BYTES};

/// Maximum transaction-id derivations per transfer before giving up
///
/// Each attempt hashes a fresh timestamp, so repeated collisions only
/// occur against a corrupted ledger.
pub const MAX_TX_ID_ATTEMPTS: u32 = 5;

/// Combined mutable state guarded by the engine's writer lock
///
/// The three fields always move together: a mutation stages the new
/// state, flushes it through `store`, then installs it into `accounts`
/// and `ledger`.
pub(crate) struct LedgerState {
    /// All wallet accounts with their balances
    pub(crate) accounts: AccountStore,

    /// Append-only sequence of committed transactions
    pub(crate) ledger: LedgerStore,

    /// Handle on the durable snapshot backing both stores
    pub(crate) store: SnapshotStore,
}

impl LedgerState {
    /// Serializable image of the current state
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.all_sorted().into_iter().cloned().collect(),
            transactions: self.ledger.all().to_vec(),
        }
    }
}

/// The ledger engine: account creation, transfers, fund grants, queries
///
/// Cheap to clone; clones share the same underlying state and may be
/// moved freely across threads.
#[derive(Clone)]
pub struct LedgerEngine {
    /// Shared, lock-guarded store state
    state: Arc<RwLock<LedgerState>>,

    /// Source of wallet addresses for new accounts
    generator: AddressGenerator,
}

impl LedgerEngine {
    /// Open the engine over the snapshot in the given data directory
    ///
    /// Creates the directory and an empty snapshot on first use; on later
    /// runs, reloads every account and transaction and re-verifies the
    /// uniqueness invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or snapshot cannot be created or
    /// read, or if the snapshot violates an invariant (duplicate
    /// identities, addresses, or transaction ids).
    pub fn open(data_dir: &Path) -> Result<Self, LedgerError> {
        let store = SnapshotStore::open(data_dir)?;
        let snapshot = store.load()?;

        let accounts = AccountStore::from_accounts(snapshot.accounts)?;
        let ledger = LedgerStore::from_transactions(snapshot.transactions)?;

        info!(
            accounts = accounts.len(),
            transactions = ledger.len(),
            path = %store.path().display(),
            "ledger opened"
        );

        Ok(LedgerEngine {
            state: Arc::new(RwLock::new(LedgerState {
                accounts,
                ledger,
                store,
            })),
            generator: AddressGenerator::new(),
        })
    }

    /// Read-only view over the same shared state
    pub fn queries(&self) -> QueryService {
        QueryService::new(Arc::clone(&self.state))
    }

    /// Register a new account
    ///
    /// Generates a unique wallet address, zero-initializes every
    /// supported symbol, and durably commits the new account before it
    /// becomes visible to any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identity is empty or already registered
    /// - Address generation exhausts its retry budget
    /// - The durable commit fails (no account is created)
    pub fn create_account(&self, identity: &str) -> Result<Account, LedgerError> {
        let mut state = self.state.write();

        let account = state.accounts.allocate(identity, &self.generator)?;

        let mut snapshot = state.snapshot();
        snapshot.upsert_account(account.clone());
        state.store.commit(&snapshot)?;

        state.accounts.insert(account.clone())?;

        info!(
            identity = %account.identity,
            address = %account.address,
            "account created"
        );
        Ok(account)
    }

    /// Credit the fixed demo amounts to an account
    ///
    /// The only external deposit in the system: +0.1 BTC, +1 ETH,
    /// +100 USDT per grant. Not recorded in the ledger, which tracks
    /// transfers between accounts only.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, a balance would
    /// overflow, or the durable commit fails (no balance changes).
    pub fn grant_demo_funds(&self, identity: &str) -> Result<Account, LedgerError> {
        let mut state = self.state.write();

        let mut granted = state
            .accounts
            .get(identity)
            .ok_or_else(|| LedgerError::account_not_found(identity))?
            .clone();

        for symbol in Symbol::ALL {
            let updated = granted
                .balance(symbol)
                .checked_add(Self::demo_grant(symbol))
                .ok_or_else(|| LedgerError::arithmetic_overflow("grant", identity))?;
            granted.balances.insert(symbol, updated);
        }

        let mut snapshot = state.snapshot();
        snapshot.upsert_account(granted.clone());
        state.store.commit(&snapshot)?;

        for symbol in Symbol::ALL {
            state
                .accounts
                .apply(identity, symbol, Self::demo_grant(symbol))?;
        }

        info!(identity, "demo funds granted");
        Ok(granted)
    }

    /// The fixed grant amount per symbol
    pub fn demo_grant(symbol: Symbol) -> Decimal {
        match symbol {
            Symbol::Btc => Decimal::new(1, 1),    // 0.1
            Symbol::Eth => Decimal::ONE,          // 1.0
            Symbol::Usdt => Decimal::new(100, 0), // 100.0
        }
    }

    /// Transfer an amount from a sender to the account owning a wallet
    /// address
    ///
    /// Validations run in a fixed order, each rejecting with no mutation:
    ///
    /// 1. `amount` must be strictly positive
    /// 2. The sender identity must resolve to an account
    /// 3. The recipient address must resolve to an account
    /// 4. The recipient must not be the sender (self-transfers are
    ///    disallowed by policy)
    /// 5. The sender's balance of `symbol` must cover `amount`
    ///
    /// A unique transaction id is then derived (retrying on collision
    /// with a fresh timestamp and nonce), and the debit, credit, and
    /// ledger append are committed as one atomic unit: staged, durably
    /// flushed, and only then installed in memory.
    ///
    /// # Returns
    ///
    /// The persisted transaction record on success.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation fails, the id budget is
    /// exhausted, or the durable commit fails. In every case both stores
    /// keep their pre-transfer state.
    pub fn transfer(
        &self,
        sender: &str,
        recipient_address: &str,
        symbol: Symbol,
        amount: Decimal,
    ) -> Result<Transaction, LedgerError> {
        let mut state = self.state.write();

        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        let sender_account = state
            .accounts
            .get(sender)
            .ok_or_else(|| LedgerError::sender_not_found(sender))?
            .clone();

        let recipient_account = state
            .accounts
            .find_by_address(recipient_address)
            .ok_or_else(|| LedgerError::recipient_not_found(recipient_address))?
            .clone();

        if recipient_account.identity == sender_account.identity {
            return Err(LedgerError::self_transfer(sender));
        }

        let available = sender_account.balance(symbol);
        if available < amount {
            return Err(LedgerError::insufficient_funds(
                sender, symbol, available, amount,
            ));
        }

        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", sender))?;
        let credited = recipient_account
            .balance(symbol)
            .checked_add(amount)
            .ok_or_else(|| {
                LedgerError::arithmetic_overflow("credit", &recipient_account.identity)
            })?;

        let (id, timestamp) =
            next_transaction_id(&state.ledger, sender, recipient_address, symbol, amount)?;

        let tx = Transaction {
            id,
            sender: sender_account.identity.clone(),
            recipient: recipient_account.identity.clone(),
            sender_address: sender_account.address.clone(),
            recipient_address: recipient_account.address.clone(),
            symbol,
            amount,
            timestamp,
        };

        // Stage the post-transfer state and flush it before any live
        // structure changes.
        let mut staged_sender = sender_account;
        staged_sender.balances.insert(symbol, debited);
        let mut staged_recipient = recipient_account;
        staged_recipient.balances.insert(symbol, credited);

        let mut snapshot = state.snapshot();
        snapshot.upsert_account(staged_sender);
        snapshot.upsert_account(staged_recipient);
        snapshot.transactions.push(tx.clone());
        state.store.commit(&snapshot)?;

        // Durable; install in memory.
        state.accounts.apply(&tx.sender, symbol, -amount)?;
        state.accounts.apply(&tx.recipient, symbol, amount)?;
        state.ledger.append(tx.clone())?;

        info!(
            id = %tx.id,
            sender = %tx.sender,
            recipient = %tx.recipient,
            symbol = %symbol,
            amount = %amount,
            "transfer committed"
        );
        Ok(tx)
    }

    /// Balances of every supported symbol for an account
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn get_balances(&self, identity: &str) -> Result<HashMap<Symbol, Decimal>, LedgerError> {
        self.queries().balances(identity)
    }

    /// Every committed transaction involving an account, in timestamp
    /// order
    pub fn get_history(&self, identity: &str) -> Vec<Transaction> {
        self.queries().history(identity)
    }

    /// The full account record for an identity
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn get_account(&self, identity: &str) -> Result<Account, LedgerError> {
        self.queries().account(identity)
    }
}

/// Derive a fresh transaction id, retrying on collision
///
/// Each attempt hashes the current time, an attempt nonce, and the
/// transfer's content; a collision gets a fresh timestamp on the next
/// attempt, so only an adversarial clock could exhaust the budget.
fn next_transaction_id(
    ledger: &LedgerStore,
    sender: &str,
    recipient_address: &str,
    symbol: Symbol,
    amount: Decimal,
) -> Result<(TxId, DateTime<Utc>), LedgerError> {
    for nonce in 0..MAX_TX_ID_ATTEMPTS {
        let now = Utc::now();
        let id = derive_tx_id(now, nonce, sender, recipient_address, symbol, amount);

        if !ledger.contains(&id) {
            // Records carry second precision; the full-precision instant
            // only feeds the hash.
            let timestamp = now.with_nanosecond(0).unwrap_or(now);
            return Ok((id, timestamp));
        }

        warn!(nonce, "transaction id collision, regenerating");
    }

    Err(LedgerError::TransactionIdExhausted {
        attempts: MAX_TX_ID_ATTEMPTS,
    })
}

/// Hash one id candidate from the commit instant and transfer content
fn derive_tx_id(
    now: DateTime<Utc>,
    nonce: u32,
    sender: &str,
    recipient_address: &str,
    symbol: Symbol,
    amount: Decimal,
) -> TxId {
    let mut hasher = Sha256::new();
    hasher.update(
        now.timestamp_nanos_opt()
            .unwrap_or_default()
            .to_be_bytes(),
    );
    hasher.update(nonce.to_be_bytes());
    hasher.update(sender.as_bytes());
    hasher.update(recipient_address.as_bytes());
    hasher.update(symbol.code().as_bytes());
    hasher.update(amount.to_string().as_bytes());

    hex::encode(&hasher.finalize()[..TX_ID_BYTES])
}
