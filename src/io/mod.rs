//! I/O module
//!
//! Durable storage for the ledger: snapshot serialization and the atomic
//! commit protocol that keeps the account and ledger stores consistent on
//! disk.

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotStore, SNAPSHOT_FILE};
