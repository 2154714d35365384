use std::sync::Arc;
use std::time::Duration;

use reader_core::model::ReaderSettings;
use reqwest::Client;
use storage::repository::Storage;
use tokio::sync::broadcast;

use crate::Clock;
use crate::api::{BookSource, HttpBookSource, HttpQuestReporter, QuestReporter};
use crate::error::{ApiError, AppServicesError};
use crate::progress::ProgressLedger;
use crate::reading::{
    CompletionNotifier, ReaderEvent, ReaderService, ReadingTracker, TickerHandle,
};

const EVENT_CAPACITY: usize = 32;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    settings: ReaderSettings,
    ledger: ProgressLedger,
    tracker: Arc<ReadingTracker>,
    reader: Arc<ReaderService>,
    events: broadcast::Sender<ReaderEvent>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP backend.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: ReaderSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::new_http(storage, clock, settings)
    }

    /// Build services over `storage` using the HTTP backend from `settings`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn new_http(
        storage: Storage,
        clock: Clock,
        settings: ReaderSettings,
    ) -> Result<Self, AppServicesError> {
        let client = build_client(&settings)?;
        let books: Arc<dyn BookSource> = Arc::new(HttpBookSource::new(
            client.clone(),
            settings.api_base_url(),
        ));
        let reporter: Arc<dyn QuestReporter> = Arc::new(HttpQuestReporter::new(
            client,
            settings.api_base_url(),
            settings.auth_token().map(str::to_owned),
        ));
        Ok(Self::with_backends(storage, clock, settings, books, reporter))
    }

    /// Build services with explicit remote backends.
    #[must_use]
    pub fn with_backends(
        storage: Storage,
        clock: Clock,
        settings: ReaderSettings,
        books: Arc<dyn BookSource>,
        reporter: Arc<dyn QuestReporter>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let ledger = ProgressLedger::new(Arc::clone(&storage.progress));
        let tracker = Arc::new(ReadingTracker::new(clock, ledger.clone()));
        let notifier = Arc::new(CompletionNotifier::new(
            ledger.clone(),
            reporter,
            events.clone(),
        ));
        let reader = Arc::new(ReaderService::new(
            clock,
            settings.pagination(),
            books,
            Arc::clone(&tracker),
            notifier,
        ));

        Self {
            settings,
            ledger,
            tracker,
            reader,
            events,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    #[must_use]
    pub fn progress(&self) -> ProgressLedger {
        self.ledger.clone()
    }

    #[must_use]
    pub fn reader(&self) -> Arc<ReaderService> {
        Arc::clone(&self.reader)
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ReaderEvent> {
        self.events.subscribe()
    }

    /// Start the periodic progress tick at the configured interval.
    #[must_use]
    pub fn start_ticker(&self) -> TickerHandle {
        self.tracker
            .spawn_ticker(Duration::from_secs(self.settings.tick_secs()))
    }
}

fn build_client(settings: &ReaderSettings) -> Result<Client, ApiError> {
    let mut builder = Client::builder();
    if let Some(secs) = settings.http_timeout_secs() {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}
