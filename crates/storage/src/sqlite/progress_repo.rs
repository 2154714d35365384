use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use tokio::sync::broadcast;

use crate::repository::{ProgressKey, ProgressStore, StorageError, StoreEvent};

use super::SqliteRepository;

#[async_trait]
impl ProgressStore for SqliteRepository {
    async fn get(&self, key: ProgressKey) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM progress_entries WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    async fn set(&self, key: ProgressKey, value: String) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        self.publish(StoreEvent::Set(key));
        Ok(())
    }

    async fn remove(&self, key: ProgressKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM progress_entries WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        self.publish(StoreEvent::Removed(key));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}
