//! # walletsim Traits
//!
//! Domain types shared by the walletsim crates and the capability traits the
//! session store is written against.
//!
//! ## Core Traits
//!
//! - [`LedgerBackend`] - wallet/chain backend: connect, submit, disconnect, balance
//! - [`Settlement`] - decides how a pending transaction resolves
//!
//! ## Example
//!
//! ```ignore
//! use walletsim_traits::prelude::*;
//!
//! async fn pay<L: LedgerBackend>(ledger: &L, to: &str) -> Result<TxId> {
//!     ledger.submit_transaction(to, "1.5".parse()?).await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod amount;
pub mod transaction;

use async_trait::async_trait;
use std::sync::Arc;

pub use address::{is_valid_address, shorten, ADDRESS_LEN};
pub use amount::{Amount, DECIMALS, DISPLAY_PLACES};
pub use transaction::{Transaction, TransactionStatus, TxHash, TxId};
pub use walletsim_error::{ErrorCode, Result, WalletsimError};

/// Wallet/chain backend the session store talks to.
///
/// Implementations own no session data. Balance accounting is the caller's
/// job; `submit_transaction` only hands back an identifier.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Connects the wallet and returns its address
    async fn connect(&self) -> Result<String>;

    /// Submits a transfer and returns the backend's identifier for it
    ///
    /// # Errors
    /// [`WalletsimError::InvalidParameters`] if `to` is empty or `amount` is zero
    async fn submit_transaction(&self, to: &str, amount: Amount) -> Result<TxId>;

    /// Tears the connection down
    fn disconnect(&self) -> Result<()>;

    /// Reports the on-chain balance of `address`
    async fn query_balance(&self, address: &str) -> Result<Amount>;
}

#[async_trait]
impl<T: LedgerBackend + ?Sized> LedgerBackend for Arc<T> {
    async fn connect(&self) -> Result<String> {
        (**self).connect().await
    }

    async fn submit_transaction(&self, to: &str, amount: Amount) -> Result<TxId> {
        (**self).submit_transaction(to, amount).await
    }

    fn disconnect(&self) -> Result<()> {
        (**self).disconnect()
    }

    async fn query_balance(&self, address: &str) -> Result<Amount> {
        (**self).query_balance(address).await
    }
}

/// Decides the terminal status of a pending transaction when its resolution fires
pub trait Settlement: Send + Sync {
    /// Returns `Success` or `Failed` for `tx`
    fn settle(&self, tx: &Transaction) -> TransactionStatus;
}

impl<T: Settlement + ?Sized> Settlement for Arc<T> {
    fn settle(&self, tx: &Transaction) -> TransactionStatus {
        (**self).settle(tx)
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        is_valid_address, shorten, Amount, ErrorCode, LedgerBackend, Result, Settlement,
        Transaction, TransactionStatus, TxHash, TxId, WalletsimError,
    };
}
