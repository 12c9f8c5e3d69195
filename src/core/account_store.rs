//! Account store
//!
//! This module provides the `AccountStore` struct which maintains the
//! in-memory state of all wallet accounts and provides operations for
//! account creation, lookup, and balance adjustment.
//!
//! The AccountStore is responsible for:
//! - Creating accounts with unique identities and generated addresses
//! - Resolving accounts by identity or by wallet address
//! - Applying signed balance deltas with non-negativity enforcement
//!
//! Address resolution goes through a secondary index rather than a full
//! scan; the index and the primary map are always updated together, so
//! address uniqueness holds whenever identity uniqueness does.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::core::address::{AddressGenerator, MAX_ADDRESS_ATTEMPTS};
use crate::types::{Account, Identity, LedgerError, Symbol, WalletAddress};

/// In-memory store of all wallet accounts
///
/// Accounts are keyed by identity with an address-to-identity index for
/// recipient resolution. The store is plain data with no locking of its
/// own: the engine serializes every mutation behind its writer lock.
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Map of identities to account states
    accounts: HashMap<Identity, Account>,

    /// Index of wallet addresses to owning identities
    by_address: HashMap<WalletAddress, Identity>,
}

impl AccountStore {
    /// Create a new AccountStore with no accounts
    pub fn new() -> Self {
        AccountStore {
            accounts: HashMap::new(),
            by_address: HashMap::new(),
        }
    }

    /// Rebuild a store from persisted account records
    ///
    /// Re-derives the address index and verifies the uniqueness
    /// invariants the snapshot is supposed to carry.
    ///
    /// # Errors
    ///
    /// Returns an error if two records share an identity or a wallet
    /// address; such a snapshot is corrupt and must not be loaded.
    pub fn from_accounts(records: Vec<Account>) -> Result<Self, LedgerError> {
        let mut store = AccountStore::new();
        for account in records {
            store.insert(account)?;
        }
        Ok(store)
    }

    /// Create a new account with a freshly generated wallet address
    ///
    /// Initializes every supported symbol to a zero balance. Address
    /// generation is retried on collision with existing addresses, up to
    /// [`MAX_ADDRESS_ATTEMPTS`] times.
    ///
    /// # Arguments
    ///
    /// * `identity` - The unique identity handle for the new account
    /// * `generator` - Source of candidate wallet addresses
    ///
    /// # Returns
    ///
    /// A clone of the newly created account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identity is empty
    /// - An account with this identity already exists
    /// - Address generation exhausts its retry budget
    pub fn create(
        &mut self,
        identity: &str,
        generator: &AddressGenerator,
    ) -> Result<Account, LedgerError> {
        let account = self.allocate(identity, generator)?;
        self.insert(account.clone())?;
        Ok(account)
    }

    /// Validate a registration and build the would-be account without
    /// inserting it
    ///
    /// The transfer engine uses this to stage the new account, commit it
    /// durably, and only then [`insert`](Self::insert) it, so a failed
    /// flush leaves the in-memory store untouched.
    ///
    /// # Errors
    ///
    /// Same conditions as [`create`](Self::create).
    pub(crate) fn allocate(
        &self,
        identity: &str,
        generator: &AddressGenerator,
    ) -> Result<Account, LedgerError> {
        if identity.is_empty() {
            return Err(LedgerError::EmptyIdentity);
        }
        if self.accounts.contains_key(identity) {
            return Err(LedgerError::duplicate_identity(identity));
        }

        let mut attempts = 0;
        let address = loop {
            let candidate = generator.generate();
            attempts += 1;
            if !self.by_address.contains_key(&candidate) {
                break candidate;
            }
            if attempts >= MAX_ADDRESS_ATTEMPTS {
                return Err(LedgerError::AddressCollision { attempts });
            }
        };

        Ok(Account::new(identity, address))
    }

    /// Install a previously allocated account
    ///
    /// # Errors
    ///
    /// Returns an error if the identity or the wallet address is already
    /// taken; the store is left unchanged.
    pub(crate) fn insert(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.accounts.contains_key(&account.identity) {
            return Err(LedgerError::duplicate_identity(&account.identity));
        }
        if self.by_address.contains_key(&account.address) {
            return Err(LedgerError::corrupt(
                "accounts",
                format!("wallet address {} owned by two accounts", account.address),
            ));
        }

        self.by_address
            .insert(account.address.clone(), account.identity.clone());
        self.accounts.insert(account.identity.clone(), account);
        Ok(())
    }

    /// Look up an account by identity
    pub fn get(&self, identity: &str) -> Option<&Account> {
        self.accounts.get(identity)
    }

    /// Resolve the account owning a wallet address
    ///
    /// Used by the transfer engine to resolve recipients.
    pub fn find_by_address(&self, address: &str) -> Option<&Account> {
        self.by_address
            .get(address)
            .and_then(|identity| self.accounts.get(identity))
    }

    /// Whether an account with this identity exists
    pub fn contains_identity(&self, identity: &str) -> bool {
        self.accounts.contains_key(identity)
    }

    /// All accounts sorted by identity
    ///
    /// Deterministic order for snapshot serialization.
    pub fn all_sorted(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.identity.cmp(&b.identity));
        accounts
    }

    /// Number of accounts in the store
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Adjust one balance by a signed delta
    ///
    /// Crate-private: balances may only change inside the transfer
    /// engine's atomic commit, never through direct calls from the
    /// public interface.
    ///
    /// # Arguments
    ///
    /// * `identity` - The account whose balance is adjusted
    /// * `symbol` - The asset symbol being adjusted
    /// * `delta` - Signed adjustment; negative for debits
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist
    /// - The adjusted balance would be negative
    /// - The addition would overflow the decimal range
    pub(crate) fn apply(
        &mut self,
        identity: &str,
        symbol: Symbol,
        delta: Decimal,
    ) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(identity)
            .ok_or_else(|| LedgerError::account_not_found(identity))?;

        let current = account.balance(symbol);
        let updated = current
            .checked_add(delta)
            .ok_or_else(|| LedgerError::arithmetic_overflow("apply", identity))?;

        if updated < Decimal::ZERO {
            return Err(LedgerError::insufficient_funds(
                identity,
                symbol,
                current,
                delta.abs(),
            ));
        }

        account.balances.insert(symbol, updated);
        Ok(())
    }
}
