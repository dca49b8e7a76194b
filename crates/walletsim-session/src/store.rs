//! The session store.
//!
//! [`SessionStore`] owns the session state and coordinates the backend. Every
//! operation records its failure in the state, publishes a [`Notification`]
//! and returns the error to the caller.
//!
//! Pending transactions resolve on spawned tasks. Disconnecting aborts them
//! and starts a new epoch, so a resolution that still gets through never
//! touches the fresh session.

use crate::config::SessionConfig;
use crate::events::{Notification, Severity};
use crate::settlement::RandomSettlement;
use crate::state::{ConnectionPhase, SessionState};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use walletsim_traits::{
    Amount, LedgerBackend, Result, Settlement, Transaction, TransactionStatus, TxId,
    WalletsimError, DISPLAY_PLACES,
};

/// Shared wallet session. Cloning yields another handle to the same session.
pub struct SessionStore<L> {
    inner: Arc<Inner<L>>,
}

struct Inner<L> {
    ledger: L,
    settlement: Box<dyn Settlement>,
    config: SessionConfig,
    state: RwLock<SessionState>,
    events: broadcast::Sender<Notification>,
    resolutions: DashMap<TxId, JoinHandle<()>>,
}

impl<L> Clone for SessionStore<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for [`SessionStore`]
pub struct SessionStoreBuilder<L> {
    ledger: L,
    config: SessionConfig,
    settlement: Option<Box<dyn Settlement>>,
}

impl<L: LedgerBackend + 'static> SessionStoreBuilder<L> {
    /// Sets the configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default random settlement
    pub fn settlement(mut self, settlement: impl Settlement + 'static) -> Self {
        self.settlement = Some(Box::new(settlement));
        self
    }

    /// Validates the configuration and builds the store
    pub fn build(self) -> Result<SessionStore<L>> {
        self.config.validate()?;
        let settlement = self
            .settlement
            .unwrap_or_else(|| Box::new(RandomSettlement::new(self.config.success_rate)));
        let (events, _) = broadcast::channel(self.config.event_capacity);
        Ok(SessionStore {
            inner: Arc::new(Inner {
                ledger: self.ledger,
                settlement,
                config: self.config,
                state: RwLock::new(SessionState::new()),
                events,
                resolutions: DashMap::new(),
            }),
        })
    }
}

/// Holds the loading flag up for the lifetime of an operation
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    /// Expects `begin_operation` to have been called under the same lock
    fn adopt(state: &'a RwLock<SessionState>) -> Self {
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.write().end_operation();
    }
}

impl<L: LedgerBackend + 'static> SessionStore<L> {
    /// Creates a store with the default configuration and random settlement
    pub fn new(ledger: L) -> Self {
        let config = SessionConfig::default();
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            inner: Arc::new(Inner {
                ledger,
                settlement: Box::new(RandomSettlement::new(config.success_rate)),
                config,
                state: RwLock::new(SessionState::new()),
                events,
                resolutions: DashMap::new(),
            }),
        }
    }

    /// Starts building a store around `ledger`
    pub fn builder(ledger: L) -> SessionStoreBuilder<L> {
        SessionStoreBuilder {
            ledger,
            config: SessionConfig::default(),
            settlement: None,
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// The backend this store talks to
    pub fn ledger(&self) -> &L {
        &self.inner.ledger
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.read().clone()
    }

    /// Receives every notification published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.events.subscribe()
    }

    /// Number of transactions still waiting for resolution
    pub fn pending_resolutions(&self) -> usize {
        self.inner
            .resolutions
            .iter()
            .filter(|entry| !entry.value().is_finished())
            .count()
    }

    /// Connects the wallet and loads its balance.
    ///
    /// On failure the previous phase is restored. A second call while one is
    /// in flight fails with `ConnectInProgress` and changes nothing. If the
    /// session is reset before the backend answers, the result is dropped and
    /// the call fails with `SessionReset`.
    pub async fn connect(&self) -> Result<String> {
        let (previous, epoch) = {
            let mut state = self.inner.state.write();
            if state.is_connecting() {
                tracing::debug!("connect ignored: already connecting");
                return Err(WalletsimError::ConnectInProgress);
            }
            let previous = state.phase().clone();
            state.set_phase(ConnectionPhase::Connecting);
            state.clear_error();
            state.begin_operation();
            (previous, state.epoch())
        };
        let _loading = LoadingGuard::adopt(&self.inner.state);

        match self.inner.ledger.connect().await {
            Ok(address) => {
                {
                    let mut state = self.inner.state.write();
                    if state.epoch() != epoch {
                        drop(state);
                        tracing::warn!(%address, "session reset during connect; connection dropped");
                        let err = WalletsimError::SessionReset;
                        self.notify(
                            Severity::Error,
                            format!("Failed to connect wallet: {err}"),
                            true,
                        );
                        return Err(err);
                    }
                    state.set_phase(ConnectionPhase::Connected {
                        address: address.clone(),
                    });
                }
                self.update_balance(None).await;
                tracing::info!(%address, "wallet connected");
                self.notify(Severity::Success, "Wallet connected successfully!", false);
                Ok(address)
            }
            Err(err) => {
                {
                    // A reset in between owns the phase now.
                    let mut state = self.inner.state.write();
                    if state.epoch() == epoch {
                        state.set_phase(previous);
                        state.set_error(&err);
                    }
                }
                tracing::warn!(error = %err, "failed to connect wallet");
                self.notify(
                    Severity::Error,
                    format!("Failed to connect wallet: {err}"),
                    true,
                );
                Err(err)
            }
        }
    }

    /// Disconnects and resets the session.
    ///
    /// Pending resolutions are cancelled. If the backend refuses, the session
    /// is left untouched.
    pub fn disconnect(&self) -> Result<()> {
        if let Err(err) = self.inner.ledger.disconnect() {
            tracing::warn!(error = %err, "failed to disconnect wallet");
            self.notify(
                Severity::Error,
                format!("Error disconnecting wallet: {err}"),
                true,
            );
            return Err(err);
        }

        self.inner.state.write().reset();
        let cancelled = self.cancel_resolutions();
        tracing::info!(cancelled, "wallet disconnected");
        self.notify(Severity::Info, "Wallet disconnected", false);
        Ok(())
    }

    /// Sets the balance to `explicit`, or refreshes it from the backend.
    ///
    /// A refresh is skipped while disconnected. Backend failures are logged
    /// and leave the balance unchanged.
    pub async fn update_balance(&self, explicit: Option<Amount>) {
        let balance = match explicit {
            Some(balance) => balance,
            None => {
                let Some(address) = self.connected_address() else {
                    tracing::debug!("balance refresh skipped: wallet not connected");
                    return;
                };
                match self.inner.ledger.query_balance(&address).await {
                    Ok(balance) => balance.round_to(DISPLAY_PLACES),
                    Err(err) => {
                        tracing::error!(error = %err, %address, "failed to update balance");
                        return;
                    }
                }
            }
        };
        self.inner.state.write().set_balance(balance);
    }

    /// Validates and submits a transfer, then schedules its resolution.
    ///
    /// Validation order: recipient address, amount, connection, funds.
    /// Nothing reaches the backend unless all four pass.
    pub async fn send_transaction(&self, to: &str, amount: Amount) -> Result<TxId> {
        let admitted = {
            let mut state = self.inner.state.write();
            match state.validate_send(to, amount) {
                Ok(()) => {
                    state.clear_error();
                    state.begin_operation();
                    Ok((state.balance(), state.epoch()))
                }
                Err(err) => {
                    state.set_error(&err);
                    Err(err)
                }
            }
        };
        let (balance_at_submission, epoch) = match admitted {
            Ok(admitted) => admitted,
            Err(err) => return Err(self.reject(err)),
        };
        let _loading = LoadingGuard::adopt(&self.inner.state);

        let id = match self.inner.ledger.submit_transaction(to, amount).await {
            Ok(id) => id,
            Err(err) => {
                self.inner.state.write().set_error(&err);
                return Err(self.reject(err));
            }
        };

        let tx = Transaction::pending(id.clone(), to, amount);
        {
            let mut state = self.inner.state.write();
            if state.epoch() != epoch {
                drop(state);
                tracing::warn!(tx_id = %id, "session reset during submission; transaction dropped");
                return Err(self.reject(WalletsimError::SessionReset));
            }
            state.record(tx.clone(), self.inner.config.history_capacity);
        }

        tracing::info!(tx_id = %id, %to, %amount, "transaction submitted");
        self.notify(
            Severity::Info,
            format!("Transaction initiated: {}", id.short()),
            false,
        );
        self.schedule_resolution(tx, balance_at_submission, epoch);
        Ok(id)
    }

    /// Moves a pending transaction to a terminal status.
    ///
    /// Returns false if the id is not in history or the transaction has
    /// already been resolved.
    pub fn update_transaction_status(&self, id: &TxId, status: TransactionStatus) -> bool {
        let applied = self.inner.state.write().apply_status(id, status);
        if !applied {
            tracing::debug!(tx_id = %id, %status, "status update ignored");
        }
        applied
    }

    fn connected_address(&self) -> Option<String> {
        self.inner.state.read().address().map(str::to_owned)
    }

    fn schedule_resolution(&self, tx: Transaction, balance_at_submission: Amount, epoch: u64) {
        let id = tx.id.clone();
        let store = self.clone();
        let delay = self.inner.config.resolution_delay();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.resolve(tx, balance_at_submission, epoch);
        });
        self.inner.resolutions.retain(|_, handle| !handle.is_finished());
        self.inner.resolutions.insert(id, handle);
    }

    fn resolve(&self, tx: Transaction, balance_at_submission: Amount, epoch: u64) {
        self.inner.resolutions.remove(&tx.id);
        let status = self.inner.settlement.settle(&tx);

        {
            let mut state = self.inner.state.write();
            if state.epoch() != epoch {
                tracing::debug!(tx_id = %tx.id, "stale resolution ignored");
                return;
            }
            // Resolved by hand in the meantime; evicted entries still settle.
            if state.transaction(&tx.id).is_some() && !state.apply_status(&tx.id, status) {
                tracing::debug!(tx_id = %tx.id, %status, "resolution ignored: already terminal");
                return;
            }
            if status == TransactionStatus::Success {
                let balance = balance_at_submission
                    .saturating_sub(tx.amount)
                    .round_to(DISPLAY_PLACES);
                state.set_balance(balance);
            }
        }

        let short = tx.id.short();
        match status {
            TransactionStatus::Success => {
                tracing::info!(tx_id = %tx.id, "transaction completed");
                self.notify(
                    Severity::Success,
                    format!("Transaction {short} completed"),
                    true,
                );
            }
            _ => {
                tracing::warn!(tx_id = %tx.id, %status, "transaction failed");
                self.notify(Severity::Error, format!("Transaction {short} failed"), true);
            }
        }
    }

    fn cancel_resolutions(&self) -> usize {
        let mut cancelled = 0;
        self.inner.resolutions.retain(|_, handle| {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
            false
        });
        cancelled
    }

    fn reject(&self, err: WalletsimError) -> WalletsimError {
        tracing::warn!(error = %err, "transaction rejected");
        self.notify(Severity::Error, format!("Transaction failed: {err}"), true);
        err
    }

    fn notify(&self, severity: Severity, message: impl Into<String>, long: bool) {
        let display_for: Duration = if long {
            self.inner.config.long_notice()
        } else {
            self.inner.config.short_notice()
        };
        // No subscribers is not an error.
        let _ = self
            .inner
            .events
            .send(Notification::new(severity, message, display_for));
    }
}

impl<L> std::fmt::Debug for SessionStore<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.state.read())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
