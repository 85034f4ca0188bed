use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::keys::{account_index_key, transactions_key, TRANSACTIONS_PREFIX};
use super::{load_json, save_json, KeyValueStore, StorageError};
use crate::entity::{BotError, TransactionRecord, TransactionStatus, TransactionType};

/// What `add_transaction` did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// New hash, record appended
    Appended,
    /// Known hash in `pending`, status moved forward
    Updated,
    /// Known hash, nothing changed
    Ignored,
}

/// Append-only per-account transaction ledger.
///
/// Records live under `transactions_<publicKey>`. A record is never removed;
/// the only mutation is the status leaving `pending`. Writes go through one
/// lock so read-modify-write cycles from concurrent handlers do not drop
/// records.
pub struct TransactionStore {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl TransactionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn load_raw(&self, public_key: &str) -> Result<Vec<TransactionRecord>, StorageError> {
        Ok(load_json(self.store.as_ref(), &transactions_key(public_key))
            .await?
            .unwrap_or_default())
    }

    /// Appends `record` to the ledger of `public_key`.
    ///
    /// A hash that is already stored (compared case-insensitively) is merged
    /// instead of duplicated: a legal status transition updates the stored
    /// record, anything else is ignored.
    pub async fn add_transaction(
        &self,
        public_key: &str,
        record: TransactionRecord,
    ) -> Result<AppendOutcome, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_raw(public_key).await?;

        let known = records
            .iter_mut()
            .find(|stored| stored.hash.eq_ignore_ascii_case(&record.hash));
        let outcome = match known {
            None => {
                info!(
                    "Recording {} transaction {} for {}",
                    record.tx_type, record.hash, public_key
                );
                records.push(record);
                AppendOutcome::Appended
            }
            Some(stored) if stored.status.can_transition_to(record.status) => {
                info!(
                    "Transaction {} moved from {} to {}",
                    stored.hash, stored.status, record.status
                );
                stored.status = record.status;
                AppendOutcome::Updated
            }
            Some(stored) => {
                if stored.status != record.status {
                    warn!(
                        "Ignoring duplicate transaction {} ({} stored, {} offered)",
                        stored.hash, stored.status, record.status
                    );
                }
                return Ok(AppendOutcome::Ignored);
            }
        };

        save_json(self.store.as_ref(), &transactions_key(public_key), &records).await?;
        Ok(outcome)
    }

    /// Records a transfer in the sender's ledger and, when the recipient
    /// address belongs to a wallet managed here, mirrors it into the
    /// recipient's ledger. Returns the outcome for each side.
    pub async fn record_transfer(
        &self,
        sender_public_key: &str,
        record: &TransactionRecord,
    ) -> Result<(AppendOutcome, Option<AppendOutcome>), StorageError> {
        let sent = self
            .add_transaction(sender_public_key, record.clone())
            .await?;

        let received = match self.store.get(&account_index_key(&record.to)).await? {
            Some(recipient_key) => Some(
                self.add_transaction(&recipient_key, record.mirrored_for_recipient())
                    .await?,
            ),
            None => None,
        };
        Ok((sent, received))
    }

    /// The ledger of `public_key`, newest first
    pub async fn get_stored_transactions(
        &self,
        public_key: &str,
    ) -> Result<Vec<TransactionRecord>, StorageError> {
        let mut records = self.load_raw(public_key).await?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    pub async fn find(
        &self,
        public_key: &str,
        hash: &str,
    ) -> Result<Option<TransactionRecord>, StorageError> {
        let records = self.load_raw(public_key).await?;
        Ok(records
            .into_iter()
            .find(|record| record.hash.eq_ignore_ascii_case(hash)))
    }

    /// Moves a pending record to `status`
    pub async fn update_status(
        &self,
        public_key: &str,
        hash: &str,
        status: TransactionStatus,
    ) -> Result<(), BotError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load_raw(public_key).await?;

        let record = records
            .iter_mut()
            .find(|record| record.hash.eq_ignore_ascii_case(hash))
            .ok_or_else(|| BotError::TransactionNotFound(hash.to_string()))?;

        if !record.status.can_transition_to(status) {
            return Err(BotError::InvalidStatusTransition {
                hash: hash.to_string(),
                from: record.status,
                to: status,
            });
        }
        record.status = status;

        save_json(self.store.as_ref(), &transactions_key(public_key), &records).await?;
        Ok(())
    }

    /// Public keys that have a ledger
    pub async fn ledger_owners(&self) -> Result<Vec<String>, StorageError> {
        let keys = self.store.keys_with_prefix(TRANSACTIONS_PREFIX).await?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(TRANSACTIONS_PREFIX).map(str::to_string))
            .collect())
    }
}

pub fn sort_newest_first(records: &mut [TransactionRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Display filter over a ledger
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub tx_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    /// Case-insensitive match against hash, sender and recipient
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Parses a `/history` argument: `sent`, `received`, `pending`,
    /// `confirmed`, `failed`, or free text to search for
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().to_lowercase();
        match query.as_str() {
            "" | "all" => Self::default(),
            "sent" => Self {
                tx_type: Some(TransactionType::Sent),
                ..Self::default()
            },
            "received" => Self {
                tx_type: Some(TransactionType::Received),
                ..Self::default()
            },
            "pending" => Self {
                status: Some(TransactionStatus::Pending),
                ..Self::default()
            },
            "confirmed" => Self {
                status: Some(TransactionStatus::Confirmed),
                ..Self::default()
            },
            "failed" => Self {
                status: Some(TransactionStatus::Failed),
                ..Self::default()
            },
            _ => Self {
                search: Some(query),
                ..Self::default()
            },
        }
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if self.tx_type.map_or(false, |tx_type| tx_type != record.tx_type) {
            return false;
        }
        if self.status.map_or(false, |status| status != record.status) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                record.hash.to_lowercase().contains(&needle)
                    || record.from.to_lowercase().contains(&needle)
                    || record.to.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    pub fn apply(&self, records: &[TransactionRecord]) -> Vec<TransactionRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(hash: &str, tx_type: TransactionType, status: TransactionStatus) -> TransactionRecord {
        TransactionRecord::new("0xaaa", "0xbbb", Decimal::ONE, tx_type, hash, status)
    }

    #[test]
    fn filter_by_type_and_status() {
        let records = vec![
            record("0x1", TransactionType::Sent, TransactionStatus::Confirmed),
            record("0x2", TransactionType::Received, TransactionStatus::Pending),
            record("0x3", TransactionType::Sent, TransactionStatus::Failed),
        ];

        let sent = TransactionFilter::from_query("sent").apply(&records);
        assert_eq!(sent.len(), 2);

        let pending = TransactionFilter::from_query("PENDING").apply(&records);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].hash, "0x2");

        assert_eq!(TransactionFilter::from_query("all").apply(&records).len(), 3);
    }

    #[test]
    fn free_text_searches_hash_and_parties() {
        let records = vec![
            record("0xdeadbeef", TransactionType::Sent, TransactionStatus::Confirmed),
            record("0xcafe", TransactionType::Sent, TransactionStatus::Confirmed),
        ];
        let found = TransactionFilter::from_query("BEEF").apply(&records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].hash, "0xdeadbeef");

        assert_eq!(TransactionFilter::from_query("0xbbb").apply(&records).len(), 2);
    }
}
