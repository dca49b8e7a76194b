//! Splitting one transfer across several recipients.

use crate::store::SessionStore;
use walletsim_traits::{Amount, LedgerBackend, Result, TxId};

/// Splits a comma-separated recipient list, trimming whitespace and dropping
/// empty entries.
pub fn parse_recipients(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Outcome of [`SessionStore::send_split`]
#[derive(Debug)]
pub struct BatchReport {
    /// Amount sent to each recipient
    pub share: Amount,
    /// Per-recipient result, in submission order
    pub results: Vec<(String, Result<TxId>)>,
}

impl BatchReport {
    /// Ids of the accepted submissions
    pub fn submitted(&self) -> Vec<&TxId> {
        self.results
            .iter()
            .filter_map(|(_, result)| result.as_ref().ok())
            .collect()
    }

    /// Number of rejected submissions
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }

    /// True when every recipient was accepted
    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

impl<L: LedgerBackend + 'static> SessionStore<L> {
    /// Sends `total / n` to each of the `n` recipients, one after another.
    ///
    /// A rejected recipient does not stop the remaining ones. Each send is
    /// validated against the balance at that moment, which pending earlier
    /// shares have not reduced yet.
    pub async fn send_split<S: AsRef<str>>(&self, recipients: &[S], total: Amount) -> BatchReport {
        let share = total.split(recipients.len());
        let mut results = Vec::with_capacity(recipients.len());
        for to in recipients {
            let to = to.as_ref();
            let result = self.send_transaction(to, share).await;
            if let Err(err) = &result {
                tracing::debug!(%to, error = %err, "batch entry rejected");
            }
            results.push((to.to_string(), result));
        }
        tracing::info!(
            recipients = recipients.len(),
            %share,
            "batch submitted"
        );
        BatchReport { share, results }
    }
}
