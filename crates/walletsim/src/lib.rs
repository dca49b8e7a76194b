//! # walletsim - Simulated Wallet Session SDK
//!
//! walletsim models the client side of a wallet: connecting, reading the
//! balance, sending transfers and watching them resolve. The backend is a
//! trait, so the same session store runs against the bundled simulator, a
//! scripted test double or a real chain client.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `default` | Session store + simulated ledger |
//! | `mock` | Simulated ledger with configurable latency |
//! | `testing` | Scripted ledger, fixtures and proptest strategies |
//! | `full` | Everything |
//!
//! ## Example
//!
//! ```ignore
//! use walletsim::prelude::*;
//!
//! let store = SessionStore::new(MockLedger::new(LedgerConfig::default())?);
//! store.connect().await?;
//! let id = store
//!     .send_transaction("0x742d35Cc6634C0532925a3b844Bc454e4438f44e", "0.25".parse()?)
//!     .await?;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

// ============================================================================
// Re-exports
// ============================================================================

pub use walletsim_session as session;
pub use walletsim_traits as traits;

/// Simulated ledger backend
#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock {
    pub use walletsim_ledger::*;
}

/// Test doubles and property strategies
#[cfg(feature = "testing")]
#[cfg_attr(docsrs, doc(cfg(feature = "testing")))]
pub mod testing {
    pub use walletsim_testing::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Common imports
pub mod prelude {
    pub use walletsim_session::{
        parse_recipients, BatchReport, ConnectionPhase, FixedSettlement, Notification,
        RandomSettlement, SessionConfig, SessionState, SessionStore, Severity,
    };
    pub use walletsim_traits::{
        is_valid_address, shorten, Amount, ErrorCode, LedgerBackend, Result, Settlement,
        Transaction, TransactionStatus, TxHash, TxId, WalletsimError,
    };

    #[cfg(feature = "mock")]
    pub use walletsim_ledger::{LedgerConfig, MockLedger, MOCK_ADDRESS};
}

// ============================================================================
// Version information
// ============================================================================

/// Returns the walletsim SDK version
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns enabled optional features
pub fn enabled_features() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut features = Vec::new();

    #[cfg(feature = "mock")]
    features.push("mock");

    #[cfg(feature = "testing")]
    features.push("testing");

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }

    #[test]
    fn test_enabled_features() {
        let features = enabled_features();
        #[cfg(feature = "mock")]
        assert!(features.contains(&"mock"));
        #[cfg(not(feature = "testing"))]
        assert!(!features.contains(&"testing"));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let amount: Amount = "1.5".parse().unwrap();
        assert_eq!(amount.to_string(), "1.5000");
        assert!(is_valid_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"));
        assert_eq!(SessionConfig::default().history_capacity, 5);
    }

    #[cfg(feature = "mock")]
    #[tokio::test(start_paused = true)]
    async fn test_default_stack_round_trip() {
        use crate::prelude::*;

        let store = SessionStore::new(MockLedger::default());
        let address = store.connect().await.unwrap();
        assert_eq!(address, MOCK_ADDRESS);
        assert!(store.snapshot().is_connected());
        store.disconnect().unwrap();
        assert_eq!(store.snapshot().balance_text(), "0.0");
    }
}
