//! # walletsim Ledger
//!
//! A simulated wallet/chain backend. [`MockLedger`] answers the
//! [`LedgerBackend`] calls the session store makes, after an artificial
//! delay, without keeping any state of its own.
//!
//! ## Features
//!
//! - Fixed wallet address returned by `connect`
//! - Configurable connect and submit latency
//! - Optional connect failure injection
//! - Random opaque transaction identifiers
//! - Random balance reports with 4 fractional digits
//!
//! ## Example
//!
//! ```no_run
//! use walletsim_ledger::{LedgerConfig, MockLedger};
//! use walletsim_traits::{Amount, LedgerBackend};
//! use std::time::Duration;
//!
//! # async fn example() -> walletsim_traits::Result<()> {
//! let config = LedgerConfig::new()
//!     .with_connect_delay(Duration::from_millis(200))
//!     .with_submit_delay(Duration::from_millis(500));
//!
//! let ledger = MockLedger::new(config)?;
//! let address = ledger.connect().await?;
//! let tx_id = ledger
//!     .submit_transaction("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", Amount::from_ether(1))
//!     .await?;
//! println!("{address} sent {tx_id}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use walletsim_traits::{is_valid_address, Amount, LedgerBackend, Result, TxId, WalletsimError};

/// Address every simulated connection resolves to
pub const MOCK_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// Configuration for the simulated backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Latency of `connect` in milliseconds
    pub connect_delay_ms: u64,
    /// Latency of `submit_transaction` in milliseconds
    pub submit_delay_ms: u64,
    /// Address returned by `connect`
    pub address: String,
    /// Probability in `[0, 1]` that `connect` fails
    pub connect_failure_rate: f64,
    /// Exclusive upper bound, in whole ether, of reported balances
    pub max_balance: u64,
}

impl LedgerConfig {
    /// Creates a configuration with the default latencies
    pub fn new() -> Self {
        Self {
            connect_delay_ms: 1000,
            submit_delay_ms: 2000,
            address: MOCK_ADDRESS.to_string(),
            connect_failure_rate: 0.0,
            max_balance: 10,
        }
    }

    /// Zero-latency configuration
    pub fn instant() -> Self {
        Self::new()
            .with_connect_delay(Duration::ZERO)
            .with_submit_delay(Duration::ZERO)
    }

    /// Sets the connect latency
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the submit latency
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the address returned by `connect`
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the probability that `connect` fails
    pub fn with_connect_failure_rate(mut self, rate: f64) -> Self {
        self.connect_failure_rate = rate;
        self
    }

    /// Sets the exclusive upper bound of reported balances
    pub fn with_max_balance(mut self, ether: u64) -> Self {
        self.max_balance = ether;
        self
    }

    /// Connect latency as a duration
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// Submit latency as a duration
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !is_valid_address(&self.address) {
            return Err(WalletsimError::Config(format!(
                "mock address '{}' is not a 0x-prefixed 40 hex digit address",
                self.address
            )));
        }
        if !(0.0..=1.0).contains(&self.connect_failure_rate) {
            return Err(WalletsimError::Config(format!(
                "connect_failure_rate must be within [0, 1], got {}",
                self.connect_failure_rate
            )));
        }
        if self.max_balance == 0 {
            return Err(WalletsimError::Config("max_balance must be positive".into()));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulated backend with artificial latency.
#[derive(Debug, Clone)]
pub struct MockLedger {
    config: LedgerConfig,
}

impl MockLedger {
    /// Creates a simulator after validating `config`
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the simulator configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn random_tx_id() -> TxId {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        TxId::new(format!("0x{}", hex::encode(bytes)))
    }

    fn random_balance(&self) -> Amount {
        // Whole ten-thousandths keep the report at 4 fractional digits.
        // u64::MAX ether in wei still fits a u128.
        let bound = u128::from(self.config.max_balance) * 10_000;
        let ten_thousandths = rand::thread_rng().gen_range(0..bound);
        Amount::from_smallest_unit(ten_thousandths * 100_000_000_000_000)
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self {
            config: LedgerConfig::default(),
        }
    }
}

#[async_trait]
impl LedgerBackend for MockLedger {
    async fn connect(&self) -> Result<String> {
        tokio::time::sleep(self.config.connect_delay()).await;

        let roll: f64 = rand::thread_rng().gen();
        if roll < self.config.connect_failure_rate {
            tracing::warn!(rate = self.config.connect_failure_rate, "simulated connect failure");
            return Err(WalletsimError::ConnectionFailure(
                "simulated wallet rejected the connection".into(),
            ));
        }

        tracing::debug!(address = %self.config.address, "simulated wallet connected");
        Ok(self.config.address.clone())
    }

    async fn submit_transaction(&self, to: &str, amount: Amount) -> Result<TxId> {
        if to.is_empty() || amount.is_zero() {
            return Err(WalletsimError::InvalidParameters);
        }

        tokio::time::sleep(self.config.submit_delay()).await;

        let tx_id = Self::random_tx_id();
        tracing::debug!(tx_id = %tx_id, to, amount = %amount, "simulated transaction accepted");
        Ok(tx_id)
    }

    fn disconnect(&self) -> Result<()> {
        tracing::debug!("simulated wallet disconnected");
        Ok(())
    }

    async fn query_balance(&self, address: &str) -> Result<Amount> {
        let balance = self.random_balance();
        tracing::debug!(address, balance = %balance, "simulated balance query");
        Ok(balance)
    }
}
