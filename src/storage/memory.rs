use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{KeyValueStore, StorageError};

/// In-process store. Used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .await
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prefix_scan_returns_only_matching_keys() {
        let store = MemoryStore::new();
        store.set("transactions_a", "[]").await.unwrap();
        store.set("transactions_b", "[]").await.unwrap();
        store.set("transactionsx", "[]").await.unwrap();
        store.set("offer_nfts_a", "[]").await.unwrap();

        let keys = store.keys_with_prefix("transactions_").await.unwrap();
        assert_eq!(keys, vec!["transactions_a", "transactions_b"]);
    }
}
