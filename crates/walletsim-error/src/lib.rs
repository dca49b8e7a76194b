//! # walletsim Error
//!
//! Unified error types for the walletsim session store and ledger simulator.
//!
//! Every error raised by the simulated backend or by the store's own
//! validation is one of the [`WalletsimError`] variants. The store records the
//! rendered message in its session state and publishes it as a notification,
//! so the `Display` strings below are what a user ends up reading.
//!
//! ## Example
//!
//! ```
//! use walletsim_error::{ErrorCode, WalletsimError, Result};
//!
//! fn require_recipient(to: &str) -> Result<()> {
//!     if to.is_empty() {
//!         return Err(WalletsimError::InvalidParameters);
//!     }
//!     Ok(())
//! }
//!
//! let err = require_recipient("").unwrap_err();
//! assert_eq!(err.code(), ErrorCode::InvalidParameters);
//! assert_eq!(err.to_string(), "Invalid transaction parameters");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;

/// The main error type for walletsim operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletsimError {
    // ============ Validation Errors ============
    /// Recipient is not a `0x`-prefixed 40 hex digit address
    #[error("Invalid Ethereum address format: '{address}'")]
    InvalidAddress {
        /// The rejected address
        address: String,
    },

    /// Amount is zero or negative
    #[error("Amount must be greater than 0")]
    InvalidAmount,

    /// Amount text could not be parsed as a decimal number
    #[error("Invalid amount: {0}")]
    MalformedAmount(String),

    /// Amount exceeds the current session balance
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Balance at validation time
        have: String,
        /// Requested amount
        need: String,
    },

    /// Simulator-level input rejection
    #[error("Invalid transaction parameters")]
    InvalidParameters,

    // ============ Backend Errors ============
    /// The backend refused or failed the connection
    #[error("Connection failed: {0}")]
    ConnectionFailure(String),

    /// The backend failed to tear down the connection
    #[error("Disconnect failed: {0}")]
    DisconnectFailure(String),

    /// The backend could not report a balance
    #[error("Balance query failed: {0}")]
    BalanceQuery(String),

    // ============ Session State Errors ============
    /// Operation requires a connected wallet
    #[error("Wallet not connected")]
    NotConnected,

    /// A connect call is already in flight
    #[error("Wallet connection already in progress")]
    ConnectInProgress,

    /// The session was reset while the operation was in flight
    #[error("Session was reset while the transaction was in flight")]
    SessionReset,

    // ============ Configuration ============
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    // ============ Generic ============
    /// Unknown/other error
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using WalletsimError
pub type Result<T> = std::result::Result<T, WalletsimError>;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Invalid address
    InvalidAddress = 1001,
    /// Invalid amount (non-positive or unparseable)
    InvalidAmount = 2001,
    /// Insufficient balance
    InsufficientBalance = 2002,
    /// Simulator rejected its inputs
    InvalidParameters = 3001,
    /// Session was reset under an in-flight transaction
    SessionReset = 3002,
    /// Connection failure
    ConnectionFailure = 4001,
    /// Disconnect failure
    DisconnectFailure = 4002,
    /// Balance query failure
    BalanceQuery = 4003,
    /// Wallet not connected
    NotConnected = 6001,
    /// Connect already in flight
    ConnectInProgress = 6002,
    /// Configuration error
    Config = 9001,
}

impl WalletsimError {
    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            WalletsimError::InvalidAddress { .. } => ErrorCode::InvalidAddress,
            WalletsimError::InvalidAmount | WalletsimError::MalformedAmount(_) => {
                ErrorCode::InvalidAmount
            }
            WalletsimError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            WalletsimError::InvalidParameters => ErrorCode::InvalidParameters,
            WalletsimError::SessionReset => ErrorCode::SessionReset,
            WalletsimError::ConnectionFailure(_) => ErrorCode::ConnectionFailure,
            WalletsimError::DisconnectFailure(_) => ErrorCode::DisconnectFailure,
            WalletsimError::BalanceQuery(_) => ErrorCode::BalanceQuery,
            WalletsimError::NotConnected => ErrorCode::NotConnected,
            WalletsimError::ConnectInProgress => ErrorCode::ConnectInProgress,
            WalletsimError::Config(_) => ErrorCode::Config,
            WalletsimError::Other(_) => ErrorCode::Unknown,
        }
    }

    /// Returns true if re-invoking the same operation may succeed.
    ///
    /// Nothing in walletsim retries on its own; this only tells a caller
    /// whether trying again is worthwhile.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WalletsimError::ConnectionFailure(_)
                | WalletsimError::BalanceQuery(_)
                | WalletsimError::ConnectInProgress
        )
    }

    /// Returns true for errors produced by input validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WalletsimError::InvalidAddress { .. }
                | WalletsimError::InvalidAmount
                | WalletsimError::MalformedAmount(_)
                | WalletsimError::InsufficientBalance { .. }
                | WalletsimError::InvalidParameters
        )
    }
}

impl From<std::num::ParseIntError> for WalletsimError {
    fn from(err: std::num::ParseIntError) -> Self {
        WalletsimError::MalformedAmount(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WalletsimError::InvalidAddress {
            address: "0x123".to_string(),
        };
        assert!(err.to_string().contains("Invalid Ethereum address format"));
        assert!(err.to_string().contains("0x123"));

        assert_eq!(
            WalletsimError::InvalidAmount.to_string(),
            "Amount must be greater than 0"
        );
    }

    #[test]
    fn test_insufficient_balance_display() {
        let err = WalletsimError::InsufficientBalance {
            have: "0.5000".into(),
            need: "1.0000".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Insufficient balance"));
        assert!(msg.contains("0.5000"));
        assert!(msg.contains("1.0000"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            WalletsimError::InvalidParameters.code(),
            ErrorCode::InvalidParameters
        );
        assert_eq!(
            WalletsimError::MalformedAmount("abc".into()).code(),
            ErrorCode::InvalidAmount
        );
        assert_eq!(WalletsimError::Other("x".into()).code(), ErrorCode::Unknown);
        assert_eq!(ErrorCode::ConnectionFailure as u32, 4001);
    }

    #[test]
    fn test_retryable() {
        assert!(WalletsimError::ConnectionFailure("refused".into()).is_retryable());
        assert!(WalletsimError::ConnectInProgress.is_retryable());
        assert!(!WalletsimError::InvalidAmount.is_retryable());
        assert!(!WalletsimError::NotConnected.is_retryable());
    }

    #[test]
    fn test_validation_classification() {
        assert!(WalletsimError::InvalidParameters.is_validation());
        assert!(WalletsimError::InvalidAddress { address: String::new() }.is_validation());
        assert!(!WalletsimError::SessionReset.is_validation());
        assert!(!WalletsimError::ConnectionFailure("x".into()).is_validation());
    }

    #[test]
    fn test_parse_int_conversion() {
        let err: WalletsimError = "x1".parse::<u128>().unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
    }
}
