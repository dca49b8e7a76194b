use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use walletsim_session::{parse_recipients, SessionStore};
use walletsim_testing::{address_from_index, EdgeCaseAddresses, ScriptedLedger, ScriptedSettlement};
use walletsim_traits::{Amount, TransactionStatus, WalletsimError};

fn store(ledger: &Arc<ScriptedLedger>) -> SessionStore<Arc<ScriptedLedger>> {
    SessionStore::builder(Arc::clone(ledger))
        .settlement(ScriptedSettlement::always(TransactionStatus::Success))
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_split_evenly_across_recipients() {
    let ledger = Arc::new(ScriptedLedger::new());
    let store = store(&ledger);
    store.connect().await.unwrap();
    let recipients: Vec<String> = (1..=3).map(address_from_index).collect();

    let report = store.send_split(&recipients, "0.3".parse().unwrap()).await;

    assert!(report.is_complete());
    assert_eq!(report.share, "0.1".parse().unwrap());
    assert_eq!(report.submitted().len(), 3);
    let sent: Vec<_> = ledger.submissions().into_iter().map(|(to, _)| to).collect();
    assert_eq!(sent, recipients);
    assert_eq!(store.snapshot().history_len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_bad_recipient_does_not_stop_batch() {
    let ledger = Arc::new(ScriptedLedger::new());
    let store = store(&ledger);
    store.connect().await.unwrap();
    let recipients = parse_recipients(&format!(
        "{}, 0xnot-an-address, {}",
        address_from_index(1),
        address_from_index(2)
    ));

    let report = store.send_split(&recipients, Amount::from_ether(3)).await;

    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.results[1].1,
        Err(WalletsimError::InvalidAddress { .. })
    ));
    assert_eq!(report.submitted().len(), 2);
    assert_eq!(ledger.submissions().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_each_share_checked_against_unsettled_balance() {
    let ledger = Arc::new(ScriptedLedger::new().with_balance(Amount::from_ether(2)));
    let store = store(&ledger);
    store.connect().await.unwrap();
    let recipients: Vec<String> = (1..=4).map(address_from_index).collect();

    // Shares of 2 ether each all fit the pre-settlement balance.
    let report = store.send_split(&recipients, Amount::from_ether(8)).await;
    assert!(report.is_complete());

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(store.snapshot().balance(), Amount::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_empty_recipient_list_sends_nothing() {
    let ledger = Arc::new(ScriptedLedger::new());
    let store = store(&ledger);
    store.connect().await.unwrap();

    let report = store.send_split::<String>(&[], Amount::from_ether(1)).await;

    assert!(report.results.is_empty());
    assert_eq!(report.share, Amount::ZERO);
    assert!(ledger.submissions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_two_recipients_produce_two_records() {
    let ledger = Arc::new(ScriptedLedger::new());
    let store = store(&ledger);
    store.connect().await.unwrap();
    let recipients = parse_recipients(&format!(
        "{},{}",
        EdgeCaseAddresses::ALL_A,
        EdgeCaseAddresses::ALL_B
    ));

    let report = store.send_split(&recipients, Amount::from_ether(2)).await;

    assert_eq!(report.share, Amount::from_ether(1));
    let state = store.snapshot();
    let recorded: Vec<_> = state
        .transactions()
        .map(|tx| (tx.to.as_str(), tx.amount))
        .collect();
    assert_eq!(
        recorded,
        vec![
            (EdgeCaseAddresses::ALL_B, Amount::from_ether(1)),
            (EdgeCaseAddresses::ALL_A, Amount::from_ether(1)),
        ]
    );
}
