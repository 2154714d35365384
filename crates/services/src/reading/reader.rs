use std::sync::Arc;

use reader_core::model::{
    Book, CompletionEvent, Document, Navigation, PaginationSettings, ReadingSession, View,
};
use reader_core::text::Layout;
use tracing::warn;

use super::notifier::{CompletionNotifier, CompletionReport};
use super::tracker::{ExitCredit, ReadingTracker};
use crate::Clock;
use crate::api::BookSource;
use crate::error::ReaderError;

/// A navigation request from the reader UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    Next,
    Previous,
    /// Zero-based view index, clamped into range.
    GoTo(usize),
    /// One-based page number as typed by the reader; out-of-range is ignored.
    PageNumber(usize),
}

/// Outcome of one navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub position: usize,
    pub moved: bool,
    /// Present only on the step that completed the book.
    pub completion: Option<CompletionReport>,
}

/// A document together with its live reading session.
pub struct OpenBook {
    document: Document,
    session: ReadingSession,
    opening_report: Option<CompletionReport>,
}

impl OpenBook {
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    #[must_use]
    pub fn current_view(&self) -> Option<View<'_>> {
        self.document.view(self.session.position())
    }

    /// Completion report when the book was already on its last view at open.
    #[must_use]
    pub fn opening_report(&self) -> Option<&CompletionReport> {
        self.opening_report.as_ref()
    }
}

/// Opens books, drives navigation, and attaches progress side effects.
pub struct ReaderService {
    clock: Clock,
    pagination: PaginationSettings,
    books: Arc<dyn BookSource>,
    tracker: Arc<ReadingTracker>,
    notifier: Arc<CompletionNotifier>,
}

impl ReaderService {
    #[must_use]
    pub fn new(
        clock: Clock,
        pagination: PaginationSettings,
        books: Arc<dyn BookSource>,
        tracker: Arc<ReadingTracker>,
        notifier: Arc<CompletionNotifier>,
    ) -> Self {
        Self {
            clock,
            pagination,
            books,
            tracker,
            notifier,
        }
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<ReadingTracker> {
        Arc::clone(&self.tracker)
    }

    /// Load, sanitize and paginate a book, then start its session.
    ///
    /// Content already attached to `book` is used as-is; otherwise it is
    /// fetched. Fetch failures are logged and produce a placeholder document.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError` if the open cannot be recorded in the store.
    pub async fn open(&self, book: Book, layout: Layout) -> Result<OpenBook, ReaderError> {
        self.tracker.record_open(book.id()).await?;

        let document = match book.content().map(str::to_owned) {
            Some(raw) => Document::from_raw(book, &raw, layout, &self.pagination),
            None => match self.books.fetch_content(book.id()).await {
                Ok(raw) => Document::from_raw(book, &raw, layout, &self.pagination),
                Err(err) => {
                    warn!(book_id = %book.id(), error = %err, "failed to load book content");
                    Document::load_failed(book, layout)
                }
            },
        };

        let mut session = document.session();
        let completion = session.start(self.clock.now())?;
        let opening_report = self.complete(completion).await?;

        Ok(OpenBook {
            document,
            session,
            opening_report,
        })
    }

    /// Move within an open book, firing completion side effects on the
    /// first arrival at the final view.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError` if the session is idle or local counters cannot
    /// be updated.
    pub async fn navigate(
        &self,
        open: &mut OpenBook,
        request: NavRequest,
    ) -> Result<Step, ReaderError> {
        let session = &mut open.session;
        let Navigation {
            position,
            moved,
            completion,
        } = match request {
            NavRequest::Next => session.next()?,
            NavRequest::Previous => session.previous()?,
            NavRequest::GoTo(index) => session.go_to(index)?,
            NavRequest::PageNumber(number) => session.go_to_page_number(number)?,
        };

        Ok(Step {
            position,
            moved,
            completion: self.complete(completion).await?,
        })
    }

    /// Reflow an open book for another layout.
    ///
    /// The position goes back to the first view and the session starts over,
    /// keeping its original start time, so the end of the book can complete
    /// it again. Switching to the current layout does nothing.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError` if local counters cannot be updated.
    pub async fn relayout(
        &self,
        open: &mut OpenBook,
        layout: Layout,
    ) -> Result<Option<CompletionReport>, ReaderError> {
        if open.document.layout() == layout {
            return Ok(None);
        }

        let started_at = open.session.started_at().unwrap_or_else(|| self.clock.now());
        let document = open.document.relayout(layout, &self.pagination);
        let mut session = document.session();
        let completion = session.start(started_at)?;
        open.document = document;
        open.session = session;
        self.complete(completion).await
    }

    /// Leave the book, flushing reading-time credit.
    ///
    /// # Errors
    ///
    /// Returns `ReaderError` if the store cannot be updated.
    pub async fn close(&self, open: OpenBook) -> Result<Option<ExitCredit>, ReaderError> {
        drop(open);
        Ok(self.tracker.flush_on_exit().await?)
    }

    async fn complete(
        &self,
        completion: Option<CompletionEvent>,
    ) -> Result<Option<CompletionReport>, ReaderError> {
        match completion {
            Some(event) => Ok(Some(self.notifier.notify(&event).await?)),
            None => Ok(None),
        }
    }
}
