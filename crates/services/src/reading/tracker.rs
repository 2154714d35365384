use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reader_core::model::{BookId, EXIT_CREDIT_MIN_MINUTES, gained_progress};
use reader_core::time::elapsed_minutes;
use storage::repository::{ProgressKey, StorageError};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use crate::Clock;
use crate::progress::ProgressLedger;

/// Result of one progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub elapsed_minutes: i64,
    pub gained: u32,
    pub level_progress: u32,
}

/// Credit granted when the reader leaves a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCredit {
    pub elapsed_minutes: i64,
    pub gained: u32,
    pub level_progress: u32,
    pub completed_count: u32,
}

/// Converts reading time into level progress.
pub struct ReadingTracker {
    clock: Clock,
    ledger: ProgressLedger,
}

impl ReadingTracker {
    #[must_use]
    pub fn new(clock: Clock, ledger: ProgressLedger) -> Self {
        Self { clock, ledger }
    }

    /// Record that a book was opened: start time, current book, books-read count.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    pub async fn record_open(&self, book_id: &BookId) -> Result<DateTime<Utc>, StorageError> {
        let now = self.clock.now();
        self.ledger.set_reading_start(now.timestamp_millis()).await?;
        self.ledger.set_current_book(book_id).await?;
        self.ledger.increment(ProgressKey::BooksRead).await?;
        Ok(now)
    }

    /// Credit progress for the time elapsed since the recorded start.
    ///
    /// Returns `None` without touching the store when no start is recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub async fn tick(&self) -> Result<Option<TickOutcome>, StorageError> {
        let Some(start) = self.ledger.reading_start().await? else {
            return Ok(None);
        };
        let elapsed = elapsed_minutes(start, self.clock.now_millis());
        let gained = gained_progress(elapsed);
        let level_progress = self.ledger.credit_level_progress(gained).await?;
        Ok(Some(TickOutcome {
            elapsed_minutes: elapsed,
            gained,
            level_progress,
        }))
    }

    /// Consume the recorded start time and grant leave-the-book credit.
    ///
    /// Credit (and one completed-progress step) is granted only after at
    /// least two minutes of reading. Returns `None` when no start is recorded
    /// or the session was too short.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or written.
    pub async fn flush_on_exit(&self) -> Result<Option<ExitCredit>, StorageError> {
        let Some(start) = self.ledger.reading_start().await? else {
            return Ok(None);
        };
        self.ledger.clear_reading_start().await?;

        let elapsed = elapsed_minutes(start, self.clock.now_millis());
        if elapsed < EXIT_CREDIT_MIN_MINUTES {
            return Ok(None);
        }

        let gained = gained_progress(elapsed);
        let level_progress = self.ledger.credit_level_progress(gained).await?;
        let completed_count = self
            .ledger
            .increment(ProgressKey::CompletedProgress)
            .await?;
        Ok(Some(ExitCredit {
            elapsed_minutes: elapsed,
            gained,
            level_progress,
            completed_count,
        }))
    }

    /// Run `tick` every `period` on a background task.
    ///
    /// The first tick happens one full period after spawning. Dropping the
    /// handle stops the ticker.
    #[must_use]
    pub fn spawn_ticker(self: &Arc<Self>, period: Duration) -> TickerHandle {
        let tracker = Arc::clone(self);
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                match tracker.tick().await {
                    Ok(Some(outcome)) => debug!(
                        elapsed_minutes = outcome.elapsed_minutes,
                        level_progress = outcome.level_progress,
                        "reading progress tick"
                    ),
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "reading progress tick failed"),
                }
            }
        });
        TickerHandle { task }
    }
}

/// Owns the background ticker task; aborts it on drop.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
