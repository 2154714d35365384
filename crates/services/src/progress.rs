use std::sync::Arc;

use reader_core::model::{BookId, ProgressState};
use storage::repository::{ProgressKey, ProgressStore, StorageError, StoreEvent};
use tokio::sync::broadcast;

/// Typed access to the progress entries of a `ProgressStore`.
///
/// Counters that are missing or unparsable read as zero. Every update is a
/// read-modify-write against the store, so concurrent writers can lose
/// updates.
#[derive(Clone)]
pub struct ProgressLedger {
    store: Arc<dyn ProgressStore>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }

    /// Read a counter, treating missing or unparsable values as zero.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn counter(&self, key: ProgressKey) -> Result<u32, StorageError> {
        let raw = self.store.get(key).await?;
        Ok(raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(0))
    }

    /// Add one to a counter and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub async fn increment(&self, key: ProgressKey) -> Result<u32, StorageError> {
        let updated = self.counter(key).await?.saturating_add(1);
        self.store.set(key, updated.to_string()).await?;
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn snapshot(&self) -> Result<ProgressState, StorageError> {
        Ok(ProgressState::from_persisted(
            self.counter(ProgressKey::LevelProgress).await?,
            self.counter(ProgressKey::CompletedProgress).await?,
        ))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn books_read(&self) -> Result<u32, StorageError> {
        self.counter(ProgressKey::BooksRead).await
    }

    /// Add `gained` points to level progress, clamped, and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub async fn credit_level_progress(&self, gained: u32) -> Result<u32, StorageError> {
        let updated = self.snapshot().await?.with_credit(gained).level_progress();
        self.store
            .set(ProgressKey::LevelProgress, updated.to_string())
            .await?;
        Ok(updated)
    }

    /// Epoch milliseconds of the current reading start, if one is recorded.
    ///
    /// A zero or unparsable value counts as absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn reading_start(&self) -> Result<Option<i64>, StorageError> {
        let raw = self.store.get(ProgressKey::ReadingStartTime).await?;
        Ok(raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .filter(|millis| *millis != 0))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_reading_start(&self, millis: i64) -> Result<(), StorageError> {
        self.store
            .set(ProgressKey::ReadingStartTime, millis.to_string())
            .await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn clear_reading_start(&self) -> Result<(), StorageError> {
        self.store.remove(ProgressKey::ReadingStartTime).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn set_current_book(&self, id: &BookId) -> Result<(), StorageError> {
        self.store
            .set(ProgressKey::CurrentBookId, id.to_string())
            .await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn current_book(&self) -> Result<Option<BookId>, StorageError> {
        let raw = self.store.get(ProgressKey::CurrentBookId).await?;
        Ok(raw.and_then(|value| BookId::new(value).ok()))
    }
}
