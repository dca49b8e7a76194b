//! Session state and its pure transitions.

use serde::Serialize;
use std::collections::VecDeque;
use walletsim_traits::{
    is_valid_address, Amount, Result, Transaction, TransactionStatus, TxId, WalletsimError,
    DISPLAY_PLACES,
};

/// Wallet connection lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConnectionPhase {
    /// No wallet attached
    Disconnected,
    /// A connect call is in flight
    Connecting,
    /// Connected to `address`
    Connected {
        /// Wallet address reported by the backend
        address: String,
    },
}

impl ConnectionPhase {
    /// Connected address, if any
    pub fn address(&self) -> Option<&str> {
        match self {
            ConnectionPhase::Connected { address } => Some(address),
            _ => None,
        }
    }
}

/// Snapshot of everything the presentation layer renders.
///
/// The history is ordered most recent first and never exceeds the configured
/// capacity. `epoch` changes every time the session is reset; work started
/// under an older epoch must not touch this state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    phase: ConnectionPhase,
    balance: Amount,
    transactions: VecDeque<Transaction>,
    in_flight: usize,
    error: Option<String>,
    epoch: u64,
}

impl SessionState {
    /// Fresh disconnected state
    pub fn new() -> Self {
        Self {
            phase: ConnectionPhase::Disconnected,
            balance: Amount::ZERO,
            transactions: VecDeque::new(),
            in_flight: 0,
            error: None,
            epoch: 0,
        }
    }

    /// Connection phase
    pub fn phase(&self) -> &ConnectionPhase {
        &self.phase
    }

    /// Connected address, if any
    pub fn address(&self) -> Option<&str> {
        self.phase.address()
    }

    /// True once a wallet address is known
    pub fn is_connected(&self) -> bool {
        matches!(self.phase, ConnectionPhase::Connected { .. })
    }

    /// True while a connect call is in flight
    pub fn is_connecting(&self) -> bool {
        self.phase == ConnectionPhase::Connecting
    }

    /// Last known balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Balance as rendered: `"0.0"` when disconnected, four decimals otherwise
    pub fn balance_text(&self) -> String {
        if self.is_connected() {
            self.balance.to_fixed(DISPLAY_PLACES)
        } else {
            "0.0".to_string()
        }
    }

    /// Transaction history, most recent first
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Number of transactions in history
    pub fn history_len(&self) -> usize {
        self.transactions.len()
    }

    /// Looks up a transaction by id
    pub fn transaction(&self, id: &TxId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| &tx.id == id)
    }

    /// True while any connect or send is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Message of the last failed operation
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Reset counter
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn set_phase(&mut self, phase: ConnectionPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }

    pub(crate) fn set_error(&mut self, error: &WalletsimError) {
        self.error = Some(error.to_string());
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn begin_operation(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn end_operation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Checks a send request against the current session. Address and amount
    /// are checked before connection and funds.
    pub(crate) fn validate_send(&self, to: &str, amount: Amount) -> Result<()> {
        if !is_valid_address(to) {
            return Err(WalletsimError::InvalidAddress {
                address: to.to_string(),
            });
        }
        if amount.is_zero() {
            return Err(WalletsimError::InvalidAmount);
        }
        if !self.is_connected() {
            return Err(WalletsimError::NotConnected);
        }
        if amount > self.balance {
            return Err(WalletsimError::InsufficientBalance {
                have: self.balance.to_string(),
                need: amount.to_string(),
            });
        }
        Ok(())
    }

    /// Prepends `tx` and drops the oldest entries beyond `capacity`
    pub(crate) fn record(&mut self, tx: Transaction, capacity: usize) {
        self.transactions.push_front(tx);
        self.transactions.truncate(capacity);
    }

    /// Moves a pending transaction to `status`. Returns false when the id is
    /// unknown or the transition is not allowed.
    pub(crate) fn apply_status(&mut self, id: &TxId, status: TransactionStatus) -> bool {
        match self.transactions.iter_mut().find(|tx| &tx.id == id) {
            Some(tx) if tx.status.can_transition_to(status) => {
                tx.status = status;
                true
            }
            _ => false,
        }
    }

    /// Returns to the disconnected state and starts a new epoch
    pub(crate) fn reset(&mut self) {
        let epoch = self.epoch.wrapping_add(1);
        let in_flight = self.in_flight;
        *self = Self::new();
        self.epoch = epoch;
        // Operations still running hold loading guards that will decrement.
        self.in_flight = in_flight;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
