//! Read-only query service
//!
//! This module provides the `QueryService`, the read side of the ledger:
//! balance lookups, account resolution, and transfer history. It never
//! mutates and only ever observes fully committed state — queries take
//! the shared read lock, which the transfer engine's writer excludes for
//! the whole of its commit.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::debug;

use crate::core::engine::LedgerState;
use crate::types::{Account, LedgerError, Symbol, Transaction};

/// Read-only views over the account and ledger stores
///
/// Obtained from [`LedgerEngine::queries`](crate::core::engine::LedgerEngine::queries);
/// cheap to clone and safe to use from any thread alongside concurrent
/// writers.
#[derive(Clone)]
pub struct QueryService {
    /// The engine's shared state, accessed through the read lock only
    state: Arc<RwLock<LedgerState>>,
}

impl QueryService {
    /// Create a query service over shared engine state
    pub(crate) fn new(state: Arc<RwLock<LedgerState>>) -> Self {
        QueryService { state }
    }

    /// Balances of every supported symbol for an account
    ///
    /// The returned map carries an entry for each member of
    /// [`Symbol::ALL`], zero included.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn balances(&self, identity: &str) -> Result<HashMap<Symbol, Decimal>, LedgerError> {
        let state = self.state.read();

        let account = state
            .accounts
            .get(identity)
            .ok_or_else(|| LedgerError::account_not_found(identity))?;

        debug!(identity, "balances queried");
        Ok(Symbol::ALL
            .iter()
            .map(|symbol| (*symbol, account.balance(*symbol)))
            .collect())
    }

    /// The full account record for an identity
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub fn account(&self, identity: &str) -> Result<Account, LedgerError> {
        let state = self.state.read();

        state
            .accounts
            .get(identity)
            .cloned()
            .ok_or_else(|| LedgerError::account_not_found(identity))
    }

    /// Every committed transaction involving an account
    ///
    /// Ordered by timestamp ascending, ties broken by commit order. An
    /// identity with no account simply has an empty history.
    pub fn history(&self, identity: &str) -> Vec<Transaction> {
        let state = self.state.read();

        let history: Vec<Transaction> = state.ledger.by_participant(identity).cloned().collect();
        debug!(identity, entries = history.len(), "history queried");
        history
    }
}
