use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use super::{KeyValueStore, StorageError};

/// Postgres-backed store over the `local_storage` table
pub struct PgKeyValueStore {
    db_pool: Arc<PgPool>,
}

impl PgKeyValueStore {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = $1")
            .bind(key)
            .fetch_optional(&*self.db_pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at) VALUES ($1, $2, $3)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&*self.db_pool)
        .await?;

        debug!("Stored {} bytes under key {}", value.len(), key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        // left() instead of LIKE: prefixes contain '_', a LIKE wildcard
        let rows = sqlx::query(
            "SELECT key FROM local_storage WHERE left(key, length($1)) = $1 ORDER BY key",
        )
        .bind(prefix)
        .fetch_all(&*self.db_pool)
        .await?;

        let mut keys = Vec::with_capacity(rows.len());
        for row in rows {
            keys.push(row.try_get("key")?);
        }
        Ok(keys)
    }
}
