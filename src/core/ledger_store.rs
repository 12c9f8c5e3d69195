//! Ledger store
//!
//! This module provides the `LedgerStore` component: an append-only,
//! in-memory sequence of committed transactions with duplicate-id
//! detection. It is the source of truth for history queries.
//!
//! # Ordering
//!
//! Entries are kept in timestamp order, ties broken by insertion order.
//! Appends happen at commit time under the engine's writer lock with a
//! just-taken wall-clock timestamp, so the sequence stays sorted on its
//! own; a stable sort at load time re-establishes the invariant for
//! snapshots written across clock adjustments.
//!
//! # Immutability
//!
//! No update or delete operation is exposed. A transaction that enters
//! the store stays there verbatim.

use std::collections::HashSet;

use crate::types::{LedgerError, Transaction, TxId};

/// Append-only store of committed transactions
#[derive(Debug, Default)]
pub struct LedgerStore {
    /// Committed transactions in timestamp order
    transactions: Vec<Transaction>,

    /// Ids of every stored transaction, for duplicate detection
    ids: HashSet<TxId>,
}

impl LedgerStore {
    /// Create a new empty ledger store
    pub fn new() -> Self {
        LedgerStore {
            transactions: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Rebuild a store from persisted transaction records
    ///
    /// Applies a stable sort by timestamp (preserving insertion order for
    /// equal timestamps) and verifies id uniqueness.
    ///
    /// # Errors
    ///
    /// Returns an error if two records share a transaction id; such a
    /// snapshot is corrupt and must not be loaded.
    pub fn from_transactions(mut records: Vec<Transaction>) -> Result<Self, LedgerError> {
        records.sort_by_key(|tx| tx.timestamp);

        let mut ids = HashSet::with_capacity(records.len());
        for tx in &records {
            if !ids.insert(tx.id.clone()) {
                return Err(LedgerError::duplicate_transaction_id(&tx.id));
            }
        }

        Ok(LedgerStore {
            transactions: records,
            ids,
        })
    }

    /// Append a committed transaction
    ///
    /// # Errors
    ///
    /// Returns an error if a transaction with the same id already exists;
    /// the store is left unchanged.
    pub fn append(&mut self, transaction: Transaction) -> Result<(), LedgerError> {
        if self.ids.contains(&transaction.id) {
            return Err(LedgerError::duplicate_transaction_id(&transaction.id));
        }

        self.ids.insert(transaction.id.clone());
        self.transactions.push(transaction);
        Ok(())
    }

    /// Whether a transaction with this id is already stored
    ///
    /// Collision probe for transaction-id generation.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Lazy sequence of every transaction involving the given identity
    ///
    /// Yields transactions where the identity is sender or recipient, in
    /// timestamp order (ties by insertion order). Restartable: each call
    /// produces a fresh iterator over the same committed state.
    pub fn by_participant<'a>(
        &'a self,
        identity: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |tx| tx.involves(identity))
    }

    /// All committed transactions in timestamp order
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Number of committed transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the ledger holds no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
