//! # walletsim Session
//!
//! Client-side wallet session: connection lifecycle, balance, a bounded
//! transaction history and delayed resolution of pending transactions, all
//! driven through a [`LedgerBackend`](walletsim_traits::LedgerBackend).
//!
//! ## Example
//!
//! ```ignore
//! use walletsim_ledger::{LedgerConfig, MockLedger};
//! use walletsim_session::SessionStore;
//!
//! let store = SessionStore::new(MockLedger::new(LedgerConfig::default())?);
//! let mut events = store.subscribe();
//! store.connect().await?;
//! let id = store.send_transaction("0x742d35Cc6634C0532925a3b844Bc454e4438f44e", "0.1".parse()?).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod events;
pub mod settlement;
pub mod state;
pub mod store;

pub use batch::{parse_recipients, BatchReport};
pub use config::SessionConfig;
pub use events::{Notification, Severity};
pub use settlement::{FixedSettlement, RandomSettlement};
pub use state::{ConnectionPhase, SessionState};
pub use store::{SessionStore, SessionStoreBuilder};
