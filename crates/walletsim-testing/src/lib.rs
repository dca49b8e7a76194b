//! # walletsim Testing Infrastructure
//!
//! Testing utilities for the walletsim crates:
//! - Deterministic backend and settlement doubles
//! - Edge case fixtures for addresses and amounts
//! - Property-based testing strategies
//!
//! ## Usage
//!
//! ```rust,ignore
//! use walletsim_testing::*;
//!
//! let ledger = ScriptedLedger::new().with_balance(Amount::from_ether(5));
//! let settlement = ScriptedSettlement::always(TransactionStatus::Success);
//!
//! proptest! {
//!     #[test]
//!     fn rejects_malformed(to in invalid_address()) {
//!         // ...
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use walletsim_traits::{
    is_valid_address, Amount, LedgerBackend, Result, Settlement, Transaction, TransactionStatus,
    TxId, WalletsimError,
};

// ============================================================================
// Scripted Backend
// ============================================================================

/// Deterministic [`LedgerBackend`]: zero latency, sequential identifiers,
/// fixed balance, and switches that force each call to fail.
#[derive(Debug)]
pub struct ScriptedLedger {
    address: String,
    balance: Mutex<Amount>,
    next_id: AtomicU64,
    fail_connect: AtomicBool,
    fail_disconnect: AtomicBool,
    fail_balance: AtomicBool,
    submit_error: Mutex<Option<WalletsimError>>,
    submissions: Mutex<Vec<(String, Amount)>>,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl ScriptedLedger {
    /// Address returned by `connect` unless overridden
    pub const ADDRESS: &'static str = "0x1111111111111111111111111111111111111111";

    /// Creates a backend that reports 5 ether and succeeds at everything
    pub fn new() -> Self {
        Self {
            address: Self::ADDRESS.to_string(),
            balance: Mutex::new(Amount::from_ether(5)),
            next_id: AtomicU64::new(1),
            fail_connect: AtomicBool::new(false),
            fail_disconnect: AtomicBool::new(false),
            fail_balance: AtomicBool::new(false),
            submit_error: Mutex::new(None),
            submissions: Mutex::new(Vec::new()),
            connects: AtomicUsize::new(0),
            disconnects: AtomicUsize::new(0),
        }
    }

    /// Sets the balance reported by `query_balance`
    pub fn with_balance(self, balance: Amount) -> Self {
        *self.balance.lock() = balance;
        self
    }

    /// Sets the address returned by `connect`
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Changes the balance reported by later queries
    pub fn set_balance(&self, balance: Amount) {
        *self.balance.lock() = balance;
    }

    /// Makes `connect` fail with `ConnectionFailure`
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Makes `disconnect` fail with `DisconnectFailure`
    pub fn set_fail_disconnect(&self, fail: bool) {
        self.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    /// Makes `query_balance` fail with `BalanceQuery`
    pub fn set_fail_balance(&self, fail: bool) {
        self.fail_balance.store(fail, Ordering::SeqCst);
    }

    /// Makes every `submit_transaction` fail with `error` until cleared with `None`
    pub fn set_submit_error(&self, error: Option<WalletsimError>) {
        *self.submit_error.lock() = error;
    }

    /// Accepted submissions in call order
    pub fn submissions(&self) -> Vec<(String, Amount)> {
        self.submissions.lock().clone()
    }

    /// Number of `connect` calls
    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of `disconnect` calls
    pub fn disconnect_calls(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// The identifier the n-th accepted submission receives (1-based)
    pub fn tx_id(n: u64) -> TxId {
        TxId::new(format!("0x{n:040x}"))
    }
}

impl Default for ScriptedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerBackend for ScriptedLedger {
    async fn connect(&self) -> Result<String> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(WalletsimError::ConnectionFailure("scripted connect failure".into()));
        }
        Ok(self.address.clone())
    }

    async fn submit_transaction(&self, to: &str, amount: Amount) -> Result<TxId> {
        if to.is_empty() || amount.is_zero() {
            return Err(WalletsimError::InvalidParameters);
        }
        let forced = self.submit_error.lock().clone();
        if let Some(err) = forced {
            return Err(err);
        }
        self.submissions.lock().push((to.to_string(), amount));
        Ok(Self::tx_id(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn disconnect(&self) -> Result<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(WalletsimError::DisconnectFailure("scripted disconnect failure".into()));
        }
        Ok(())
    }

    async fn query_balance(&self, _address: &str) -> Result<Amount> {
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(WalletsimError::BalanceQuery("scripted balance failure".into()));
        }
        Ok(*self.balance.lock())
    }
}

// ============================================================================
// Scripted Settlement
// ============================================================================

/// Replays queued outcomes in order, then falls back to a fixed outcome
#[derive(Debug)]
pub struct ScriptedSettlement {
    queue: Mutex<VecDeque<TransactionStatus>>,
    fallback: TransactionStatus,
}

impl ScriptedSettlement {
    /// Resolves every transaction to `status`
    pub fn always(status: TransactionStatus) -> Self {
        Self::sequence(std::iter::empty(), status)
    }

    /// Resolves transactions to `outcomes` in resolution order, then to `fallback`
    pub fn sequence(
        outcomes: impl IntoIterator<Item = TransactionStatus>,
        fallback: TransactionStatus,
    ) -> Self {
        Self {
            queue: Mutex::new(outcomes.into_iter().collect()),
            fallback,
        }
    }
}

impl Settlement for ScriptedSettlement {
    fn settle(&self, _tx: &Transaction) -> TransactionStatus {
        self.queue.lock().pop_front().unwrap_or(self.fallback)
    }
}

// ============================================================================
// Edge Case Addresses
// ============================================================================

/// Edge case addresses for testing
pub struct EdgeCaseAddresses;

impl EdgeCaseAddresses {
    /// Checksummed mainnet-style address
    pub const MIXED_CASE: &'static str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

    /// Upper-case recipient used in walkthroughs
    pub const ALL_A: &'static str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    /// Second recipient for batch scenarios
    pub const ALL_B: &'static str = "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";

    /// Zero address
    pub const ZERO: &'static str = "0x0000000000000000000000000000000000000000";

    /// Shape-valid addresses
    pub fn valid() -> Vec<&'static str> {
        vec![Self::MIXED_CASE, Self::ALL_A, Self::ALL_B, Self::ZERO]
    }

    /// Malformed recipients
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "",
            "0x",
            "0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG", // Invalid hex
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5",     // Too short
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e1", // Too long
            "742d35Cc6634C0532925a3b844Bc454e4438f44e00", // Missing 0x
            "0X742d35Cc6634C0532925a3b844Bc454e4438f44e", // Upper-case prefix
            "0x742d35Cc6634C0532925a3b844Bc454e4438f4 e", // Embedded space
        ]
    }
}

// ============================================================================
// Edge Case Amounts
// ============================================================================

/// Edge case amount inputs
pub struct EdgeCaseAmounts;

impl EdgeCaseAmounts {
    /// One wei
    pub const ONE_WEI: Amount = Amount::from_smallest_unit(1);

    /// Text that parses to a non-positive value
    pub fn non_positive_text() -> Vec<&'static str> {
        vec!["0", "0.0", "-1", "-0.0001", "+0"]
    }

    /// Text that is not a decimal number
    pub fn malformed_text() -> Vec<&'static str> {
        vec!["", "abc", "1,5", "1.2.3", "NaN", "1e18", "--2"]
    }
}

// ============================================================================
// Property-Based Testing Strategies
// ============================================================================

/// Generates shape-valid `0x` + 40 hex digit addresses
pub fn valid_address() -> impl Strategy<Value = String> {
    "0x[0-9a-fA-F]{40}"
}

/// Generates strings that are not shape-valid addresses
pub fn invalid_address() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "0x[0-9a-fA-F]{0,39}",
        "0x[0-9a-fA-F]{41,48}",
        "[0-9a-fA-F]{42}",
        "0x[g-zG-Z]{40}",
    ]
    .prop_filter("must not be a valid address", |s| !is_valid_address(s))
}

/// Generates strictly positive amounts up to `max_ether`
pub fn positive_amount(max_ether: u64) -> impl Strategy<Value = Amount> {
    (1u128..=Amount::from_ether(max_ether).smallest_unit()).prop_map(Amount::from_smallest_unit)
}

/// Generates 1 to 4 distinct recipients
pub fn recipient_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(valid_address(), 1..=4).prop_map(|set| set.into_iter().collect())
}

/// Deterministic distinct address for the n-th recipient of a fixture
pub fn address_from_index(index: u32) -> String {
    let mut bytes = [0u8; 20];
    bytes[16..].copy_from_slice(&index.to_be_bytes());
    format!("0x{}", hex::encode(bytes))
}

// ============================================================================
// Tests
// ============================================================================
