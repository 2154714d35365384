use std::sync::Arc;

use reader_core::model::{BookId, CompletionEvent};
use storage::repository::{ProgressKey, StorageError};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::api::{QuestProgressRequest, QuestReporter};
use crate::progress::ProgressLedger;

/// Published on the services event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// Local completion counters were updated.
    CompletionRecorded {
        book_id: BookId,
        completed_count: u32,
        books_read: u32,
    },
    /// The quest backend accepted the completion.
    BookCompleted { book_id: BookId },
}

/// How the remote half of a completion was handled.
///
/// Local counters are updated in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReport {
    /// The report was handed to a background task; its outcome arrives as
    /// `ReaderEvent::BookCompleted` or a logged warning.
    Dispatched,
    /// No auth token configured.
    Skipped,
}

/// Records book completion locally and reports it to the quest backend.
///
/// Remote reporting is fire-and-forget: it runs on a detached task, failures
/// are logged, never retried, and never roll back local counters.
pub struct CompletionNotifier {
    ledger: ProgressLedger,
    reporter: Arc<dyn QuestReporter>,
    events: broadcast::Sender<ReaderEvent>,
}

impl CompletionNotifier {
    #[must_use]
    pub fn new(
        ledger: ProgressLedger,
        reporter: Arc<dyn QuestReporter>,
        events: broadcast::Sender<ReaderEvent>,
    ) -> Self {
        Self {
            ledger,
            reporter,
            events,
        }
    }

    /// Update local counters, then dispatch the remote report without
    /// waiting for it. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the local counters cannot be updated.
    pub async fn notify(&self, event: &CompletionEvent) -> Result<CompletionReport, StorageError> {
        let completed_count = self
            .ledger
            .increment(ProgressKey::CompletedProgress)
            .await?;
        let books_read = self.ledger.increment(ProgressKey::BooksRead).await?;
        let _ = self.events.send(ReaderEvent::CompletionRecorded {
            book_id: event.book_id.clone(),
            completed_count,
            books_read,
        });
        info!(book_id = %event.book_id, completed_count, "book completed");

        if !self.reporter.enabled() {
            return Ok(CompletionReport::Skipped);
        }

        let start_time = self.start_time(event).await;
        let request = QuestProgressRequest::book_completed(event.book_id.clone(), start_time);
        let reporter = Arc::clone(&self.reporter);
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = reporter.report(&request).await;
            match outcome {
                Ok(_) => {
                    let _ = events.send(ReaderEvent::BookCompleted {
                        book_id: request.book_id,
                    });
                }
                Err(err) => warn!(
                    book_id = %request.book_id,
                    error = %err,
                    "failed to report book completion"
                ),
            }
        });

        Ok(CompletionReport::Dispatched)
    }

    // Stored start time, else the session's own start; a failed read is not fatal.
    async fn start_time(&self, event: &CompletionEvent) -> i64 {
        let fallback = event.started_at.timestamp_millis();
        match self.ledger.reading_start().await {
            Ok(stored) => stored.unwrap_or(fallback),
            Err(err) => {
                warn!(
                    book_id = %event.book_id,
                    error = %err,
                    "reading start time unavailable"
                );
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use reader_core::time::fixed_now;
    use serde_json::Value;
    use std::sync::Mutex;
    use std::time::Duration;
    use storage::repository::{InMemoryProgressStore, ProgressStore, StoreEvent};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingReporter {
        enabled: bool,
        fail: bool,
        hang: bool,
        requests: Mutex<Vec<QuestProgressRequest>>,
        reported: Notify,
    }

    impl RecordingReporter {
        fn enabled() -> Self {
            Self {
                enabled: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl QuestReporter for RecordingReporter {
        fn enabled(&self) -> bool {
            self.enabled
        }

        async fn report(&self, request: &QuestProgressRequest) -> Result<Value, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reported.notify_one();
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                Err(ApiError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
            } else {
                Ok(serde_json::json!({ "success": true }))
            }
        }
    }

    /// Serves every key except the reading start time, which always errors.
    struct BrokenStartStore {
        inner: InMemoryProgressStore,
    }

    #[async_trait]
    impl ProgressStore for BrokenStartStore {
        async fn get(&self, key: ProgressKey) -> Result<Option<String>, StorageError> {
            if key == ProgressKey::ReadingStartTime {
                return Err(StorageError::Connection("disk unplugged".into()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: ProgressKey, value: String) -> Result<(), StorageError> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: ProgressKey) -> Result<(), StorageError> {
            self.inner.remove(key).await
        }

        fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
            self.inner.subscribe()
        }
    }

    fn event() -> CompletionEvent {
        CompletionEvent {
            book_id: BookId::new("1342").unwrap(),
            started_at: fixed_now(),
        }
    }

    fn notifier(
        reporter: Arc<RecordingReporter>,
    ) -> (
        CompletionNotifier,
        Arc<InMemoryProgressStore>,
        broadcast::Receiver<ReaderEvent>,
    ) {
        let store = Arc::new(InMemoryProgressStore::new());
        let (tx, rx) = broadcast::channel(8);
        let notifier = CompletionNotifier::new(ProgressLedger::new(store.clone()), reporter, tx);
        (notifier, store, rx)
    }

    #[tokio::test]
    async fn dispatched_completion_reports_stored_start_time() {
        let reporter = Arc::new(RecordingReporter::enabled());
        let (notifier, store, mut events) = notifier(reporter.clone());
        store
            .set(ProgressKey::ReadingStartTime, "1700000000123".into())
            .await
            .unwrap();

        let report = notifier.notify(&event()).await.unwrap();
        assert_eq!(report, CompletionReport::Dispatched);

        assert!(matches!(
            events.recv().await.unwrap(),
            ReaderEvent::CompletionRecorded {
                completed_count: 1,
                books_read: 1,
                ..
            }
        ));
        assert_eq!(
            events.recv().await.unwrap(),
            ReaderEvent::BookCompleted {
                book_id: BookId::new("1342").unwrap()
            }
        );

        let requests = reporter.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].start_time, 1_700_000_000_123);
        assert_eq!(requests[0].event_type, "book_completed");
    }

    #[tokio::test]
    async fn missing_start_time_falls_back_to_session_start() {
        let reporter = Arc::new(RecordingReporter::enabled());
        let (notifier, _, _) = notifier(reporter.clone());

        notifier.notify(&event()).await.unwrap();
        reporter.reported.notified().await;
        let requests = reporter.requests.lock().unwrap().clone();
        assert_eq!(requests[0].start_time, fixed_now().timestamp_millis());
    }

    #[tokio::test]
    async fn unreadable_start_time_falls_back_to_session_start() {
        let reporter = Arc::new(RecordingReporter::enabled());
        let store = Arc::new(BrokenStartStore {
            inner: InMemoryProgressStore::new(),
        });
        let (tx, _rx) = broadcast::channel(8);
        let notifier = CompletionNotifier::new(
            ProgressLedger::new(store.clone()),
            reporter.clone(),
            tx,
        );

        let report = notifier.notify(&event()).await.unwrap();
        assert_eq!(report, CompletionReport::Dispatched);
        reporter.reported.notified().await;

        let requests = reporter.requests.lock().unwrap().clone();
        assert_eq!(requests[0].start_time, fixed_now().timestamp_millis());
        assert_eq!(
            store.get(ProgressKey::CompletedProgress).await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn remote_failure_keeps_local_counters() {
        let reporter = Arc::new(RecordingReporter {
            fail: true,
            ..RecordingReporter::enabled()
        });
        let (notifier, store, mut events) = notifier(reporter.clone());

        let report = notifier.notify(&event()).await.unwrap();
        assert_eq!(report, CompletionReport::Dispatched);
        reporter.reported.notified().await;
        tokio::task::yield_now().await;

        assert!(matches!(
            events.recv().await.unwrap(),
            ReaderEvent::CompletionRecorded { .. }
        ));
        assert!(events.try_recv().is_err());
        assert_eq!(
            store.get(ProgressKey::CompletedProgress).await.unwrap().as_deref(),
            Some("1")
        );
        assert_eq!(
            store.get(ProgressKey::BooksRead).await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn hanging_reporter_does_not_hold_up_notify() {
        let reporter = Arc::new(RecordingReporter {
            hang: true,
            ..RecordingReporter::enabled()
        });
        let (notifier, store, _) = notifier(reporter.clone());

        let report = tokio::time::timeout(Duration::from_secs(2), notifier.notify(&event()))
            .await
            .expect("notify returns while the report is still in flight")
            .unwrap();
        assert_eq!(report, CompletionReport::Dispatched);
        assert_eq!(
            store.get(ProgressKey::CompletedProgress).await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn disabled_reporter_is_skipped() {
        let reporter = Arc::new(RecordingReporter::default());
        let (notifier, store, _) = notifier(reporter.clone());

        let report = notifier.notify(&event()).await.unwrap();
        assert_eq!(report, CompletionReport::Skipped);
        tokio::task::yield_now().await;
        assert!(reporter.requests.lock().unwrap().is_empty());
        assert_eq!(
            store.get(ProgressKey::CompletedProgress).await.unwrap().as_deref(),
            Some("1")
        );
    }
}
