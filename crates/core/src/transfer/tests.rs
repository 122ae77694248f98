//! Engine behavior tests against the in-memory store.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use centime_shared::types::money;

use super::engine::TransferEngine;
use super::error::TransferError;
use super::memory::MemoryStore;
use super::types::AccountStatus;

fn engine_with(store: MemoryStore) -> (TransferEngine<Arc<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(store);
    (TransferEngine::new(Arc::clone(&store)), store)
}

#[tokio::test]
async fn transfer_moves_funds_and_appends_one_record() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));
    let recipient = store.insert_account("bob@example.com", dec!(50.00));

    let record = engine
        .transfer(sender, "bob@example.com", dec!(30.00))
        .await
        .unwrap();

    assert_eq!(record.amount, dec!(30.00));
    assert_eq!(record.sender_id, sender);
    assert_eq!(record.receiver_id, recipient);
    assert_eq!(store.balance_of(sender), Some(dec!(70.00)));
    assert_eq!(store.balance_of(recipient), Some(dec!(80.00)));
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn transfer_conserves_total_balance() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(123.45));
    let recipient = store.insert_account("bob@example.com", dec!(6.78));
    let before = dec!(123.45) + dec!(6.78);

    engine
        .transfer(sender, "bob@example.com", dec!(19.99))
        .await
        .unwrap();

    let after = store.balance_of(sender).unwrap() + store.balance_of(recipient).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn transfer_one_cent_over_balance_is_rejected() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(10.00));
    store.insert_account("bob@example.com", dec!(0.00));

    let result = engine.transfer(sender, "bob@example.com", dec!(10.01)).await;

    assert!(matches!(result, Err(TransferError::InsufficientFunds)));
    assert_eq!(store.balance_of(sender), Some(dec!(10.00)));
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn transfer_of_exact_balance_drains_to_zero() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(10.00));
    store.insert_account("bob@example.com", dec!(0.00));

    engine
        .transfer(sender, "bob@example.com", dec!(10.00))
        .await
        .unwrap();

    assert_eq!(store.balance_of(sender), Some(dec!(0.00)));
    assert_eq!(money::display(store.balance_of(sender).unwrap()), "0.00");
}

#[tokio::test]
async fn transfer_rejects_malformed_recipient_email() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));

    for bad in ["", "plain", "@x.com", "a@nodot", "a@.com"] {
        let result = engine.transfer(sender, bad, dec!(1.00)).await;
        assert!(
            matches!(result, Err(TransferError::InvalidRecipient)),
            "email {bad:?} should be rejected"
        );
    }
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn transfer_rejects_non_positive_amounts() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));
    store.insert_account("bob@example.com", dec!(0.00));

    for amount in [Decimal::ZERO, dec!(-5.00), dec!(0.001)] {
        let result = engine.transfer(sender, "bob@example.com", amount).await;
        assert!(
            matches!(result, Err(TransferError::InvalidAmount)),
            "amount {amount} should be rejected"
        );
    }
}

#[tokio::test]
async fn transfer_resolves_recipient_case_insensitively() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));
    let recipient = store.insert_account("bob@example.com", dec!(0.00));

    engine
        .transfer(sender, "Bob@Example.COM", dec!(25.00))
        .await
        .unwrap();

    assert_eq!(store.balance_of(recipient), Some(dec!(25.00)));
}

#[tokio::test]
async fn transfer_reports_missing_parties() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));

    let result = engine.transfer(sender, "ghost@example.com", dec!(1.00)).await;
    assert!(matches!(result, Err(TransferError::RecipientNotFound)));

    let result = engine
        .transfer(Uuid::new_v4(), "alice@example.com", dec!(1.00))
        .await;
    assert!(matches!(result, Err(TransferError::SenderNotFound)));
}

#[tokio::test]
async fn transfer_rejects_inactive_sender_but_not_inactive_recipient() {
    let (engine, store) = engine_with(MemoryStore::new());
    let inactive = store.insert_account_with_status(
        "pending@example.com",
        dec!(100.00),
        AccountStatus::Inactive,
    );
    let blocked =
        store.insert_account_with_status("frozen@example.com", dec!(0.00), AccountStatus::Blocked);
    let active = store.insert_account("alice@example.com", dec!(100.00));

    let result = engine.transfer(inactive, "alice@example.com", dec!(1.00)).await;
    assert!(matches!(result, Err(TransferError::SenderNotActive)));

    // Receiver status is deliberately not checked.
    engine
        .transfer(active, "frozen@example.com", dec!(5.00))
        .await
        .unwrap();
    assert_eq!(store.balance_of(blocked), Some(dec!(5.00)));
}

#[tokio::test]
async fn transfer_to_self_is_rejected() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));

    let result = engine.transfer(sender, "alice@example.com", dec!(10.00)).await;

    assert!(matches!(result, Err(TransferError::SelfTransfer)));
    assert_eq!(store.balance_of(sender), Some(dec!(100.00)));
}

#[tokio::test]
async fn failed_atomic_commit_leaves_no_partial_effect() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));
    let recipient = store.insert_account("bob@example.com", dec!(50.00));

    store.fail_next_append();
    let result = engine.transfer(sender, "bob@example.com", dec!(30.00)).await;

    assert!(matches!(result, Err(TransferError::Store(_))));
    assert_eq!(store.balance_of(sender), Some(dec!(100.00)));
    assert_eq!(store.balance_of(recipient), Some(dec!(50.00)));
    assert!(store.records().is_empty());
}

#[tokio::test]
async fn sequential_fallback_applies_all_three_writes() {
    let (engine, store) = engine_with(MemoryStore::without_atomic_writes());
    let sender = store.insert_account("alice@example.com", dec!(100.00));
    let recipient = store.insert_account("bob@example.com", dec!(50.00));

    let record = engine
        .transfer(sender, "bob@example.com", dec!(30.00))
        .await
        .unwrap();

    assert_eq!(record.amount, dec!(30.00));
    assert_eq!(store.balance_of(sender), Some(dec!(70.00)));
    assert_eq!(store.balance_of(recipient), Some(dec!(80.00)));
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn sequential_fallback_rechecks_funds_against_fresh_state() {
    let (engine, store) = engine_with(MemoryStore::without_atomic_writes());
    let sender = store.insert_account("alice@example.com", dec!(10.00));
    store.insert_account("bob@example.com", dec!(0.00));

    let result = engine.transfer(sender, "bob@example.com", dec!(10.01)).await;

    assert!(matches!(result, Err(TransferError::InsufficientFunds)));
    assert_eq!(store.balance_of(sender), Some(dec!(10.00)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_debits_cannot_jointly_overdraw() {
    let (engine, store) = engine_with(MemoryStore::new());
    let sender = store.insert_account("alice@example.com", dec!(100.00));
    store.insert_account("bob@example.com", dec!(0.00));
    let engine = Arc::new(engine);

    let first = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.transfer(sender, "bob@example.com", dec!(60.00)).await })
    };
    let second = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.transfer(sender, "bob@example.com", dec!(60.00)).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let insufficient = results
        .iter()
        .filter(|r| matches!(r, Err(TransferError::InsufficientFunds)))
        .count();

    assert_eq!(successes, 1, "exactly one concurrent debit must win");
    assert_eq!(insufficient, 1, "the loser must see insufficient funds");
    assert_eq!(store.balance_of(sender), Some(dec!(40.00)));
    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn deposit_adds_and_quantizes() {
    let (engine, store) = engine_with(MemoryStore::new());
    let account = store.insert_account("alice@example.com", dec!(100.00));

    let new_balance = engine.adjust_balance(account, dec!(25.5)).await.unwrap();

    assert_eq!(new_balance, dec!(125.50));
    assert_eq!(money::display(new_balance), "125.50");
}

#[tokio::test]
async fn withdrawal_beyond_balance_is_rejected() {
    let (engine, store) = engine_with(MemoryStore::new());
    let account = store.insert_account("alice@example.com", dec!(30.00));

    let result = engine.adjust_balance(account, dec!(-40)).await;

    assert!(matches!(result, Err(TransferError::InsufficientFunds)));
    assert_eq!(store.balance_of(account), Some(dec!(30.00)));
}

#[tokio::test]
async fn withdrawal_of_exact_balance_is_allowed() {
    let (engine, store) = engine_with(MemoryStore::new());
    let account = store.insert_account("alice@example.com", dec!(30.00));

    let new_balance = engine.adjust_balance(account, dec!(-30.00)).await.unwrap();

    assert_eq!(new_balance, Decimal::ZERO);
}

#[tokio::test]
async fn zero_delta_is_a_no_op() {
    let (engine, store) = engine_with(MemoryStore::new());
    let account = store.insert_account("alice@example.com", dec!(42.00));

    let balance = engine.adjust_balance(account, Decimal::ZERO).await.unwrap();

    assert_eq!(balance, dec!(42.00));
    assert_eq!(store.balance_of(account), Some(dec!(42.00)));
}

#[tokio::test]
async fn adjustments_produce_no_ledger_records() {
    let (engine, store) = engine_with(MemoryStore::new());
    let account = store.insert_account("alice@example.com", dec!(100.00));

    engine.adjust_balance(account, dec!(10.00)).await.unwrap();
    engine.adjust_balance(account, dec!(-5.00)).await.unwrap();

    assert!(store.records().is_empty());
}

#[tokio::test]
async fn balance_read_reports_missing_account() {
    let (engine, store) = engine_with(MemoryStore::new());
    let account = store.insert_account("alice@example.com", dec!(12.30));

    assert_eq!(engine.balance(account).await.unwrap(), dec!(12.30));
    assert!(matches!(
        engine.balance(Uuid::new_v4()).await,
        Err(TransferError::AccountNotFound)
    ));
}
