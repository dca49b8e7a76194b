//! Outcome sources for pending transactions.

use rand::Rng;
use walletsim_traits::{Settlement, Transaction, TransactionStatus};

/// Resolves to `Success` with probability `success_rate`, otherwise `Failed`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomSettlement {
    success_rate: f64,
}

impl RandomSettlement {
    /// Creates a random settlement; `success_rate` is clamped to `[0, 1]`
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }

    /// Probability of `Success`
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl Default for RandomSettlement {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Settlement for RandomSettlement {
    fn settle(&self, _tx: &Transaction) -> TransactionStatus {
        let roll: f64 = rand::thread_rng().gen();
        if roll < self.success_rate {
            TransactionStatus::Success
        } else {
            TransactionStatus::Failed
        }
    }
}

/// Always resolves to the same status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSettlement(pub TransactionStatus);

impl Settlement for FixedSettlement {
    fn settle(&self, _tx: &Transaction) -> TransactionStatus {
        self.0
    }
}
