//! Property-based tests for send validation and history bounds.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use walletsim_session::{SessionConfig, SessionStore};
use walletsim_testing::{
    invalid_address, positive_amount, recipient_list, valid_address, ScriptedLedger,
    ScriptedSettlement,
};
use walletsim_traits::{Amount, TransactionStatus, WalletsimError};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
}

fn connected_store(
    balance: Amount,
    capacity: usize,
) -> (Arc<ScriptedLedger>, SessionStore<Arc<ScriptedLedger>>) {
    let ledger = Arc::new(ScriptedLedger::new().with_balance(balance));
    let store = SessionStore::builder(Arc::clone(&ledger))
        .config(SessionConfig::new().with_history_capacity(capacity))
        .settlement(ScriptedSettlement::always(TransactionStatus::Success))
        .build()
        .unwrap();
    (ledger, store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invalid_recipient_never_reaches_backend(to in invalid_address(), amount in positive_amount(5)) {
        let (history, submissions, err) = runtime().block_on(async {
            let (ledger, store) = connected_store(Amount::from_ether(5), 5);
            store.connect().await.unwrap();
            let err = store.send_transaction(&to, amount).await.unwrap_err();
            (store.snapshot().history_len(), ledger.submissions().len(), err)
        });
        prop_assert_eq!(history, 0);
        prop_assert_eq!(submissions, 0);
        let is_invalid_address = matches!(err, WalletsimError::InvalidAddress { .. });
        prop_assert!(is_invalid_address);
    }

    #[test]
    fn amount_above_balance_rejected(to in valid_address(), balance in 0u64..10, excess in positive_amount(3)) {
        let balance = Amount::from_ether(balance);
        let amount = balance.checked_add(excess).unwrap();
        let (state, err) = runtime().block_on(async {
            let (_ledger, store) = connected_store(balance, 5);
            store.connect().await.unwrap();
            let err = store.send_transaction(&to, amount).await.unwrap_err();
            (store.snapshot(), err)
        });
        let is_insufficient = matches!(err, WalletsimError::InsufficientBalance { .. });
        prop_assert!(is_insufficient);
        prop_assert_eq!(state.history_len(), 0);
        prop_assert_eq!(state.balance(), balance);
    }

    #[test]
    fn history_bounded_and_newest_first(sends in 1usize..12, capacity in 1usize..8) {
        let (ids, expected) = runtime().block_on(async {
            let (_ledger, store) = connected_store(Amount::from_ether(1_000), capacity);
            store.connect().await.unwrap();
            let mut submitted = Vec::new();
            for _ in 0..sends {
                submitted.push(
                    store
                        .send_transaction(walletsim_testing::EdgeCaseAddresses::ALL_B, Amount::from_ether(1))
                        .await
                        .unwrap(),
                );
            }
            let ids: Vec<_> = store.snapshot().transactions().map(|tx| tx.id.clone()).collect();
            let expected: Vec<_> = submitted.into_iter().rev().take(capacity).collect();
            (ids, expected)
        });
        prop_assert!(ids.len() <= capacity);
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn success_deducts_exactly_once(amount in positive_amount(5)) {
        let (before, after, status) = runtime().block_on(async {
            let (_ledger, store) = connected_store(Amount::from_ether(5), 5);
            store.connect().await.unwrap();
            let before = store.snapshot().balance();
            let id = store.send_transaction(walletsim_testing::EdgeCaseAddresses::ALL_A, amount).await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            let state = store.snapshot();
            (before, state.balance(), state.transaction(&id).unwrap().status)
        });
        prop_assert_eq!(status, TransactionStatus::Success);
        prop_assert_eq!(after, before.saturating_sub(amount).round_to(4));
    }

    #[test]
    fn split_records_one_share_per_recipient(recipients in recipient_list(), total in positive_amount(4)) {
        let (share, recorded, submitted) = runtime().block_on(async {
            let (ledger, store) = connected_store(Amount::from_ether(5), 5);
            store.connect().await.unwrap();
            let report = store.send_split(&recipients, total).await;
            let recorded: Vec<_> = store
                .snapshot()
                .transactions()
                .map(|tx| (tx.to.clone(), tx.amount))
                .collect();
            (report.share, recorded, ledger.submissions())
        });
        prop_assert!(share.smallest_unit() * recipients.len() as u128 <= total.smallest_unit());
        prop_assert_eq!(submitted.len(), if share.is_zero() { 0 } else { recipients.len() });
        let expected: Vec<_> = submitted.into_iter().rev().collect();
        prop_assert_eq!(recorded, expected);
    }
}
