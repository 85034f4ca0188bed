//! Key/value persistence for wallet client state.
//!
//! Every piece of client state (wallets, ledgers, cached contract ids) lives
//! under a string key as a JSON document, the same way a browser client keeps
//! it in local storage. Corrupted documents are reported and read as absent.

use async_trait::async_trait;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod keys;
pub mod memory;
pub mod postgres;
pub mod transaction_store;

pub use memory::MemoryStore;
pub use postgres::PgKeyValueStore;
pub use transaction_store::{AppendOutcome, TransactionFilter, TransactionStore};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String-keyed document store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// All keys starting with `prefix`, in lexicographic order
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// Loads and parses a JSON document. Unparseable data is logged and read as `None`.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let raw = match store.get(key).await? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Ignoring corrupted data under key {}: {}", key, e);
            Ok(None)
        }
    }
}

pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}

/// Appends `id` to the cached id list under `key` unless it is already there.
/// Returns whether the list changed.
pub async fn push_unique_id(
    store: &dyn KeyValueStore,
    key: &str,
    id: u64,
) -> Result<bool, StorageError> {
    let mut ids: Vec<u64> = load_json(store, key).await?.unwrap_or_default();
    if ids.contains(&id) {
        return Ok(false);
    }
    ids.push(id);
    save_json(store, key, &ids).await?;
    Ok(true)
}

pub async fn load_ids(store: &dyn KeyValueStore, key: &str) -> Result<Vec<u64>, StorageError> {
    Ok(load_json(store, key).await?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn corrupted_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").await.unwrap();

        let value: Option<Vec<u64>> = load_json(&store, "broken").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn id_lists_stay_unique() {
        let store = MemoryStore::new();
        assert!(push_unique_id(&store, "ids", 3).await.unwrap());
        assert!(push_unique_id(&store, "ids", 5).await.unwrap());
        assert!(!push_unique_id(&store, "ids", 3).await.unwrap());
        assert_eq!(load_ids(&store, "ids").await.unwrap(), vec![3, 5]);
    }
}
