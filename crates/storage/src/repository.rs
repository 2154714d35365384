use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::broadcast;

/// Buffered change events per subscriber before old ones are dropped.
pub const EVENT_CAPACITY: usize = 64;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Keys of the reader's persisted key-value entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKey {
    /// Level progress, `0..=100`.
    LevelProgress,
    /// Books finished since the last rank change.
    CompletedProgress,
    /// Books opened or finished, ever.
    BooksRead,
    /// Epoch milliseconds when the current book was opened.
    ReadingStartTime,
    CurrentBookId,
}

impl ProgressKey {
    pub const ALL: [ProgressKey; 5] = [
        ProgressKey::LevelProgress,
        ProgressKey::CompletedProgress,
        ProgressKey::BooksRead,
        ProgressKey::ReadingStartTime,
        ProgressKey::CurrentBookId,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressKey::LevelProgress => "levelProgress",
            ProgressKey::CompletedProgress => "completedProgress",
            ProgressKey::BooksRead => "booksRead",
            ProgressKey::ReadingStartTime => "readingStartTime",
            ProgressKey::CurrentBookId => "currentBookId",
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressKey {
    type Err = StorageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ProgressKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| StorageError::Serialization(format!("unknown progress key: {value}")))
    }
}

/// Published after every mutation of a `ProgressStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Set(ProgressKey),
    Removed(ProgressKey),
}

impl StoreEvent {
    #[must_use]
    pub fn key(&self) -> ProgressKey {
        match self {
            StoreEvent::Set(key) | StoreEvent::Removed(key) => *key,
        }
    }
}

/// Shared key-value store for reading progress.
///
/// Writes are last-write-wins; there is no cross-process locking.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Read the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: ProgressKey) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key` and publish `StoreEvent::Set`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: ProgressKey, value: String) -> Result<(), StorageError>;

    /// Delete `key` (a no-op if absent) and publish `StoreEvent::Removed`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: ProgressKey) -> Result<(), StorageError>;

    /// Receive change events published after this call.
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone)]
pub struct InMemoryProgressStore {
    entries: Arc<Mutex<HashMap<ProgressKey, String>>>,
    events: broadcast::Sender<StoreEvent>,
}

impl InMemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    fn publish(&self, event: StoreEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn get(&self, key: ProgressKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: ProgressKey, value: String) -> Result<(), StorageError> {
        {
            let mut guard = self
                .entries
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.insert(key, value);
        }
        self.publish(StoreEvent::Set(key));
        Ok(())
    }

    async fn remove(&self, key: ProgressKey) -> Result<(), StorageError> {
        {
            let mut guard = self
                .entries
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.remove(&key);
        }
        self.publish(StoreEvent::Removed(key));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressStore> = Arc::new(InMemoryProgressStore::new());
        Self { progress }
    }
}
