//! Transaction records and their lifecycle.

use crate::address::shorten;
use crate::amount::Amount;
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Submitted, waiting for resolution
    Pending,
    /// Resolved successfully
    Success,
    /// Resolved as failed
    Failed,
}

impl TransactionStatus {
    /// Returns true once the transaction has been resolved
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    /// Only `Pending -> Success` and `Pending -> Failed` are allowed
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(self, TransactionStatus::Pending) && next.is_terminal()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Success => "Success",
            TransactionStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Opaque identifier returned by the ledger backend for a submission
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId(pub String);

impl TxId {
    /// Creates a new TxId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form used in notifications
    pub fn short(&self) -> String {
        shorten(&self.0)
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Content hash attached to a transaction for display: `0x` + 64 hex digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl TxHash {
    /// Length of a well-formed content hash
    pub const LEN: usize = 66;

    /// Creates a new TxHash from a string
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Generates a random content hash
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Returns the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for `0x` followed by exactly 64 hex digits
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN
            && self
                .0
                .strip_prefix("0x")
                .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A submitted transaction as tracked by the session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier assigned by the ledger backend
    pub id: TxId,
    /// Lifecycle state
    pub status: TransactionStatus,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Recipient address
    pub to: String,
    /// Amount sent
    pub amount: Amount,
    /// Display content hash
    pub hash: TxHash,
}

impl Transaction {
    /// Creates a pending transaction stamped with the current time and a fresh content hash
    pub fn pending(id: TxId, to: impl Into<String>, amount: Amount) -> Self {
        Self {
            id,
            status: TransactionStatus::Pending,
            timestamp: Utc::now(),
            to: to.into(),
            amount,
            hash: TxHash::random(),
        }
    }

    /// Creation time in milliseconds since the Unix epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Returns true while awaiting resolution
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }
}
