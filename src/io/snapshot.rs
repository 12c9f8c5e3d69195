//! Durable snapshot storage
//!
//! This module persists the full ledger state — every account and every
//! committed transaction — as a single JSON snapshot file. The one-file
//! layout makes the two logical stores (accounts and ledger) a single
//! atomic unit on disk: a commit either replaces the whole snapshot or
//! leaves the previous one intact.
//!
//! # Commit Protocol
//!
//! `commit` serializes into a named temporary file in the data directory,
//! syncs it, and renames it over the live snapshot. The rename is the
//! commit point; a crash before it leaves the old snapshot readable, a
//! crash after it leaves the new one. Partial field-by-field writes never
//! touch the live file.
//!
//! # Lifecycle
//!
//! `SnapshotStore::open` is called once at process start, creating the
//! data directory and an empty snapshot on first use. The handle is then
//! injected into the engine; there is no ambient global state. A corrupt
//! snapshot is a startup error, never silently replaced.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::types::{Account, LedgerError, Transaction};

/// File name of the snapshot inside the data directory
pub const SNAPSHOT_FILE: &str = "ledger.json";

/// Serializable image of the complete ledger state
///
/// Accounts are kept sorted by identity and transactions in commit order
/// so repeated commits of the same state produce identical files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every account record
    pub accounts: Vec<Account>,

    /// Every committed transaction, in timestamp order
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Replace an existing account record (matched by identity) or append
    /// a new one
    pub fn upsert_account(&mut self, account: Account) {
        match self
            .accounts
            .iter_mut()
            .find(|a| a.identity == account.identity)
        {
            Some(slot) => *slot = account,
            None => {
                self.accounts.push(account);
                self.accounts
                    .sort_by(|a, b| a.identity.cmp(&b.identity));
            }
        }
    }
}

/// Handle on the durable snapshot file
///
/// Owns the data-directory paths; all reads and writes of persisted state
/// go through this handle.
#[derive(Debug)]
pub struct SnapshotStore {
    /// Directory holding the snapshot and its temporary siblings
    dir: PathBuf,

    /// Path of the live snapshot file
    path: PathBuf,
}

impl SnapshotStore {
    /// Open (or initialize) the snapshot store in the given directory
    ///
    /// Creates the directory and, when no snapshot exists yet, commits an
    /// empty one so the lifecycle is explicit from the first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the initial
    /// snapshot cannot be written.
    pub fn open(dir: &Path) -> Result<Self, LedgerError> {
        fs::create_dir_all(dir)?;

        let store = SnapshotStore {
            dir: dir.to_path_buf(),
            path: dir.join(SNAPSHOT_FILE),
        };

        if !store.path.exists() {
            store.commit(&Snapshot::default())?;
            debug!(path = %store.path.display(), "initialized empty snapshot");
        }

        Ok(store)
    }

    /// Path of the live snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current snapshot from disk
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read, or a corrupt
    /// error if it exists but cannot be decoded.
    pub fn load(&self) -> Result<Snapshot, LedgerError> {
        let raw = fs::read_to_string(&self.path)?;

        serde_json::from_str(&raw)
            .map_err(|e| LedgerError::corrupt(self.path.display().to_string(), e.to_string()))
    }

    /// Durably commit a snapshot, replacing the live file atomically
    ///
    /// # Errors
    ///
    /// Returns a storage error if serialization, the temporary write, the
    /// sync, or the final rename fails. On any of these the live snapshot
    /// is untouched.
    pub fn commit(&self, snapshot: &Snapshot) -> Result<(), LedgerError> {
        let serialized = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| LedgerError::storage(e.to_string()))?;

        // Temp file in the same directory so the rename never crosses a
        // filesystem boundary.
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(&serialized)?;
        staged.flush()?;
        staged.as_file().sync_all()?;

        staged
            .persist(&self.path)
            .map_err(|e| LedgerError::storage(e.to_string()))?;

        debug!(
            accounts = snapshot.accounts.len(),
            transactions = snapshot.transactions.len(),
            "snapshot committed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbol;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let mut alice = Account::new("alice", "0xAAAA");
        alice.balances.insert(Symbol::Btc, Decimal::new(5, 1));

        Snapshot {
            accounts: vec![alice, Account::new("bob", "0xBBBB")],
            transactions: vec![Transaction {
                id: "a1b2c3d4e5f60718".to_string(),
                sender: "alice".to_string(),
                recipient: "bob".to_string(),
                sender_address: "0xAAAA".to_string(),
                recipient_address: "0xBBBB".to_string(),
                symbol: Symbol::Btc,
                amount: Decimal::new(3, 1),
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            }],
        }
    }

    #[test]
    fn test_open_initializes_empty_snapshot() {
        let dir = tempdir().unwrap();

        let store = SnapshotStore::open(dir.path()).unwrap();

        assert!(store.path().exists());
        let loaded = store.load().unwrap();
        assert!(loaded.accounts.is_empty());
        assert!(loaded.transactions.is_empty());
    }

    #[test]
    fn test_open_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("ledger-data");

        let store = SnapshotStore::open(&nested).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn test_commit_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        let snapshot = sample_snapshot();

        store.commit(&snapshot).unwrap();

        assert_eq!(store.load().unwrap(), snapshot);
    }

    #[test]
    fn test_commit_replaces_previous_snapshot() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        store.commit(&sample_snapshot()).unwrap();
        let mut second = sample_snapshot();
        second.accounts.push(Account::new("carol", "0xCCCC"));
        store.commit(&second).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.accounts.len(), 3);
    }

    #[test]
    fn test_open_preserves_existing_snapshot() {
        let dir = tempdir().unwrap();
        {
            let store = SnapshotStore::open(dir.path()).unwrap();
            store.commit(&sample_snapshot()).unwrap();
        }

        // Reopening must not reinitialize
        let store = SnapshotStore::open(dir.path()).unwrap();
        assert_eq!(store.load().unwrap(), sample_snapshot());
    }

    #[test]
    fn test_load_rejects_corrupt_snapshot() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        let result = store.load();
        assert!(matches!(result.unwrap_err(), LedgerError::Corrupt { .. }));
    }

    #[test]
    fn test_commit_leaves_no_temp_files_behind() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::open(dir.path()).unwrap();

        store.commit(&sample_snapshot()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![SNAPSHOT_FILE]);
    }

    #[test]
    fn test_upsert_account_replaces_by_identity() {
        let mut snapshot = sample_snapshot();
        let mut updated = Account::new("alice", "0xAAAA");
        updated.balances.insert(Symbol::Eth, Decimal::ONE);

        snapshot.upsert_account(updated.clone());

        assert_eq!(snapshot.accounts.len(), 2);
        let alice = snapshot
            .accounts
            .iter()
            .find(|a| a.identity == "alice")
            .unwrap();
        assert_eq!(alice, &updated);
    }

    #[test]
    fn test_upsert_account_appends_new_identity_in_order() {
        let mut snapshot = sample_snapshot();

        snapshot.upsert_account(Account::new("aaron", "0xDDDD"));

        let identities: Vec<&str> = snapshot
            .accounts
            .iter()
            .map(|a| a.identity.as_str())
            .collect();
        assert_eq!(identities, vec!["aaron", "alice", "bob"]);
    }
}
