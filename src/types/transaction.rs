//! Transaction types for the Crypto Ledger
//!
//! This module defines the immutable transaction record appended to the
//! ledger for every committed transfer, plus the transaction identifier
//! alias and its format constants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::{Identity, Symbol, WalletAddress};

/// Transaction identifier
///
/// A 16-character lowercase hexadecimal string: the first [`TX_ID_BYTES`]
/// bytes of a SHA-256 digest over the transfer's content and commit time,
/// hex-encoded. Unique within the ledger; collisions are detected at
/// generation time and retried with a fresh timestamp and nonce.
pub type TxId = String;

/// Number of digest bytes kept when deriving a transaction id
pub const TX_ID_BYTES: usize = 8;

/// Length of a transaction id in hexadecimal characters
pub const TX_ID_LEN: usize = TX_ID_BYTES * 2;

/// An immutable record of a committed transfer
///
/// Written exactly once per successful transfer, never mutated or
/// deleted. Both participant identities and both wallet addresses are
/// captured at commit time so history remains self-contained even if
/// lookups change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TxId,

    /// Identity of the sending account
    pub sender: Identity,

    /// Identity of the receiving account
    pub recipient: Identity,

    /// Wallet address the funds were debited from
    pub sender_address: WalletAddress,

    /// Wallet address the funds were credited to
    pub recipient_address: WalletAddress,

    /// Asset symbol this transfer moved
    pub symbol: Symbol,

    /// Transferred amount, strictly positive
    pub amount: Decimal,

    /// Commit wall-clock time, truncated to whole seconds
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Whether the given identity is the sender or recipient of this record
    pub fn involves(&self, identity: &str) -> bool {
        self.sender == identity || self.recipient == identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction {
            id: "a1b2c3d4e5f60718".to_string(),
            sender: "alice".to_string(),
            recipient: "bob".to_string(),
            sender_address: "0xAAAA".to_string(),
            recipient_address: "0xBBBB".to_string(),
            symbol: Symbol::Btc,
            amount: Decimal::new(3, 1), // 0.3
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_involves_matches_sender_and_recipient() {
        let tx = sample();

        assert!(tx.involves("alice"));
        assert!(tx.involves("bob"));
        assert!(!tx.involves("carol"));
    }

    #[test]
    fn test_transaction_round_trips_through_json() {
        let tx = sample();

        let json = serde_json::to_string(&tx).unwrap();
        let parsed: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, tx);
    }

    #[test]
    fn test_id_length_constant_is_consistent() {
        assert_eq!(TX_ID_LEN, 16);
        assert_eq!(sample().id.len(), TX_ID_LEN);
    }
}
