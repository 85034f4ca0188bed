use chrono::{Duration, Utc};
use cryptal_wallet_bot::entity::{TransactionRecord, TransactionStatus, TransactionType};
use cryptal_wallet_bot::storage::keys::{account_index_key, transactions_key};
use cryptal_wallet_bot::storage::{AppendOutcome, KeyValueStore, MemoryStore, TransactionStore};
use rust_decimal::Decimal;
use std::sync::Arc;

const OWNER_KEY: &str = "0xowner";

fn record(hash: &str, minutes_ago: i64, status: TransactionStatus) -> TransactionRecord {
    let mut record = TransactionRecord::new(
        "0xaaa",
        "0xbbb",
        Decimal::new(15, 1),
        TransactionType::Sent,
        hash,
        status,
    );
    record.timestamp = Utc::now() - Duration::minutes(minutes_ago);
    record
}

fn store() -> (Arc<MemoryStore>, TransactionStore) {
    let memory = Arc::new(MemoryStore::new());
    let transactions = TransactionStore::new(memory.clone());
    (memory, transactions)
}

#[tokio::test]
async fn ledger_is_returned_newest_first() {
    let (_, transactions) = store();

    for (hash, age) in [("0x1", 30), ("0x2", 5), ("0x3", 60), ("0x4", 1)] {
        let outcome = transactions
            .add_transaction(OWNER_KEY, record(hash, age, TransactionStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(outcome, AppendOutcome::Appended);
    }

    let hashes: Vec<String> = transactions
        .get_stored_transactions(OWNER_KEY)
        .await
        .unwrap()
        .into_iter()
        .map(|record| record.hash)
        .collect();
    assert_eq!(hashes, vec!["0x4", "0x2", "0x1", "0x3"]);
}

#[tokio::test]
async fn known_hash_is_merged_not_duplicated() {
    let (_, transactions) = store();

    transactions
        .add_transaction(OWNER_KEY, record("0xabc", 2, TransactionStatus::Pending))
        .await
        .unwrap();

    let outcome = transactions
        .add_transaction(OWNER_KEY, record("0xabc", 1, TransactionStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Updated);

    // confirmed never goes back to pending
    let outcome = transactions
        .add_transaction(OWNER_KEY, record("0xabc", 0, TransactionStatus::Pending))
        .await
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Ignored);

    let records = transactions.get_stored_transactions(OWNER_KEY).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, TransactionStatus::Confirmed);
}

#[tokio::test]
async fn hashes_differing_in_case_are_the_same_transaction() {
    let (_, transactions) = store();

    let outcome = transactions
        .add_transaction(OWNER_KEY, record("0xABCD", 2, TransactionStatus::Pending))
        .await
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Appended);

    let outcome = transactions
        .add_transaction(OWNER_KEY, record("0xabcd", 1, TransactionStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(outcome, AppendOutcome::Updated);

    let records = transactions.get_stored_transactions(OWNER_KEY).await.unwrap();
    assert_eq!(records.len(), 1);
    let stored = transactions.find(OWNER_KEY, "0xabcd").await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Confirmed);
}

#[tokio::test]
async fn status_update_matches_hash_in_any_case() {
    let (_, transactions) = store();
    transactions
        .add_transaction(OWNER_KEY, record("0xBEEF", 1, TransactionStatus::Pending))
        .await
        .unwrap();

    transactions
        .update_status(OWNER_KEY, "0xbeef", TransactionStatus::Confirmed)
        .await
        .unwrap();

    let stored = transactions.find(OWNER_KEY, "0xBEEF").await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Confirmed);
}

#[tokio::test]
async fn status_updates_only_leave_pending() {
    let (_, transactions) = store();
    transactions
        .add_transaction(OWNER_KEY, record("0xdef", 1, TransactionStatus::Pending))
        .await
        .unwrap();

    transactions
        .update_status(OWNER_KEY, "0xdef", TransactionStatus::Failed)
        .await
        .unwrap();
    assert!(transactions
        .update_status(OWNER_KEY, "0xdef", TransactionStatus::Confirmed)
        .await
        .is_err());
    assert!(transactions
        .update_status(OWNER_KEY, "0xmissing", TransactionStatus::Confirmed)
        .await
        .is_err());

    let stored = transactions.find(OWNER_KEY, "0xDEF").await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Failed);
}

#[tokio::test]
async fn corrupted_ledger_reads_as_empty() {
    let (memory, transactions) = store();
    memory
        .set(&transactions_key(OWNER_KEY), "{not json")
        .await
        .unwrap();

    let records = transactions.get_stored_transactions(OWNER_KEY).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn ledger_owners_lists_every_public_key() {
    let (_, transactions) = store();
    for key in ["0xb", "0xa"] {
        transactions
            .add_transaction(key, record("0x1", 1, TransactionStatus::Pending))
            .await
            .unwrap();
    }

    assert_eq!(transactions.ledger_owners().await.unwrap(), vec!["0xa", "0xb"]);
}

const RECIPIENT_KEY: &str = "0xrecipient_key";

fn transfer(from: &str, to: &str, hash: &str, status: TransactionStatus) -> TransactionRecord {
    TransactionRecord::new(from, to, Decimal::ONE, TransactionType::Sent, hash, status)
}

#[tokio::test]
async fn transfer_to_a_managed_wallet_lands_in_both_ledgers() {
    let (memory, transactions) = store();
    memory
        .set(&account_index_key("0xbbb"), RECIPIENT_KEY)
        .await
        .unwrap();

    let mut sent = transfer("0xaaa", "0xbbb", "0x77", TransactionStatus::Pending);
    let outcomes = transactions.record_transfer(OWNER_KEY, &sent).await.unwrap();
    assert_eq!(
        outcomes,
        (AppendOutcome::Appended, Some(AppendOutcome::Appended))
    );

    sent.status = TransactionStatus::Confirmed;
    let outcomes = transactions.record_transfer(OWNER_KEY, &sent).await.unwrap();
    assert_eq!(outcomes, (AppendOutcome::Updated, Some(AppendOutcome::Updated)));

    let sender_side = transactions.get_stored_transactions(OWNER_KEY).await.unwrap();
    assert_eq!(sender_side.len(), 1);
    assert_eq!(sender_side[0].tx_type, TransactionType::Sent);
    assert_eq!(sender_side[0].status, TransactionStatus::Confirmed);

    let recipient_side = transactions
        .get_stored_transactions(RECIPIENT_KEY)
        .await
        .unwrap();
    assert_eq!(recipient_side.len(), 1);
    assert_eq!(recipient_side[0].tx_type, TransactionType::Received);
    assert_eq!(recipient_side[0].status, TransactionStatus::Confirmed);
}

#[tokio::test]
async fn transfer_to_an_outside_address_stays_in_the_sender_ledger() {
    let (_, transactions) = store();

    let sent = transfer("0xaaa", "0xccc", "0x78", TransactionStatus::Pending);
    let outcomes = transactions.record_transfer(OWNER_KEY, &sent).await.unwrap();

    assert_eq!(outcomes, (AppendOutcome::Appended, None));
    assert_eq!(transactions.ledger_owners().await.unwrap(), vec![OWNER_KEY]);
}

#[tokio::test]
async fn self_transfer_keeps_a_single_record() {
    let (memory, transactions) = store();
    memory
        .set(&account_index_key("0xaaa"), OWNER_KEY)
        .await
        .unwrap();

    let sent = transfer("0xaaa", "0xaaa", "0x79", TransactionStatus::Pending);
    let outcomes = transactions.record_transfer(OWNER_KEY, &sent).await.unwrap();

    assert_eq!(
        outcomes,
        (AppendOutcome::Appended, Some(AppendOutcome::Ignored))
    );
    let records = transactions.get_stored_transactions(OWNER_KEY).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tx_type, TransactionType::Sent);
}
