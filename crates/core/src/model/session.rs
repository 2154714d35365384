use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::BookId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionTransitionError {
    #[error("reading session already started")]
    AlreadyStarted,

    #[error("reading session has not started")]
    NotStarted,
}

/// Lifecycle of a reading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Completed,
}

/// Emitted once, on the `Active -> Completed` transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    pub book_id: BookId,
    pub started_at: DateTime<Utc>,
}

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub position: usize,
    pub moved: bool,
    pub completion: Option<CompletionEvent>,
}

/// Position tracking and completion guard for one opened book.
///
/// Views are pages in the mobile layout and spreads in the desktop layout.
/// The position always stays within `[0, view_count)`.
#[derive(Debug, Clone)]
pub struct ReadingSession {
    book_id: BookId,
    view_count: usize,
    completable: bool,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    position: usize,
}

impl ReadingSession {
    /// Create an idle session over `view_count` views.
    ///
    /// A zero count is treated as a single view. Sessions that are not
    /// `completable` (placeholder documents) never reach `Completed`.
    #[must_use]
    pub fn new(book_id: BookId, view_count: usize, completable: bool) -> Self {
        Self {
            book_id,
            view_count: view_count.max(1),
            completable,
            state: SessionState::Idle,
            started_at: None,
            position: 0,
        }
    }

    /// `Idle -> Active`.
    ///
    /// A one-view book is already on its final view, so starting it may
    /// complete it straight away.
    ///
    /// # Errors
    ///
    /// Returns `SessionTransitionError::AlreadyStarted` unless the session is idle.
    pub fn start(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Option<CompletionEvent>, SessionTransitionError> {
        if self.state != SessionState::Idle {
            return Err(SessionTransitionError::AlreadyStarted);
        }
        self.state = SessionState::Active;
        self.started_at = Some(now);
        Ok(self.observe())
    }

    #[must_use]
    pub fn book_id(&self) -> &BookId {
        &self.book_id
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn view_count(&self) -> usize {
        self.view_count
    }

    #[must_use]
    pub fn is_first_view(&self) -> bool {
        self.position == 0
    }

    #[must_use]
    pub fn is_last_view(&self) -> bool {
        self.position + 1 == self.view_count
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Re-check the terminal condition for the current position.
    ///
    /// Returns the completion event only on the first observation of the
    /// final view; every later call returns `None`.
    pub fn observe(&mut self) -> Option<CompletionEvent> {
        if self.state != SessionState::Active || !self.completable || !self.is_last_view() {
            return None;
        }
        let started_at = self.started_at?;
        self.state = SessionState::Completed;
        Some(CompletionEvent {
            book_id: self.book_id.clone(),
            started_at,
        })
    }

    /// # Errors
    ///
    /// Returns `SessionTransitionError::NotStarted` while idle.
    pub fn next(&mut self) -> Result<Navigation, SessionTransitionError> {
        self.go_to(self.position.saturating_add(1))
    }

    /// # Errors
    ///
    /// Returns `SessionTransitionError::NotStarted` while idle.
    pub fn previous(&mut self) -> Result<Navigation, SessionTransitionError> {
        self.go_to(self.position.saturating_sub(1))
    }

    /// Move to a zero-based view index, clamped into range.
    ///
    /// # Errors
    ///
    /// Returns `SessionTransitionError::NotStarted` while idle.
    pub fn go_to(&mut self, index: usize) -> Result<Navigation, SessionTransitionError> {
        if self.state == SessionState::Idle {
            return Err(SessionTransitionError::NotStarted);
        }
        let target = index.min(self.view_count - 1);
        let moved = target != self.position;
        self.position = target;
        let completion = self.observe();
        Ok(Navigation {
            position: self.position,
            moved,
            completion,
        })
    }

    /// Jump to a one-based page number as typed by the reader.
    ///
    /// Numbers outside `1..=view_count` leave the position unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionTransitionError::NotStarted` while idle.
    pub fn go_to_page_number(
        &mut self,
        number: usize,
    ) -> Result<Navigation, SessionTransitionError> {
        if self.state == SessionState::Idle {
            return Err(SessionTransitionError::NotStarted);
        }
        if number == 0 || number > self.view_count {
            return Ok(Navigation {
                position: self.position,
                moved: false,
                completion: None,
            });
        }
        self.go_to(number - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn session(views: usize) -> ReadingSession {
        ReadingSession::new(BookId::new("7").unwrap(), views, true)
    }

    #[test]
    fn navigation_requires_start() {
        let mut s = session(3);
        assert_eq!(s.next(), Err(SessionTransitionError::NotStarted));
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.start(fixed_now()).unwrap().is_none());
        assert_eq!(s.start(fixed_now()), Err(SessionTransitionError::AlreadyStarted));
    }

    #[test]
    fn completion_fires_once() {
        let mut s = session(3);
        s.start(fixed_now()).unwrap();
        assert!(s.next().unwrap().completion.is_none());

        let nav = s.next().unwrap();
        let event = nav.completion.expect("reaching the last view completes");
        assert_eq!(event.started_at, fixed_now());
        assert_eq!(s.state(), SessionState::Completed);

        // Re-observing the final view, or leaving and coming back, does nothing.
        assert!(s.observe().is_none());
        assert!(s.next().unwrap().completion.is_none());
        s.previous().unwrap();
        assert!(s.next().unwrap().completion.is_none());
        assert!(s.is_completed());
    }

    #[test]
    fn single_view_completes_on_start() {
        let mut s = session(1);
        assert!(s.start(fixed_now()).unwrap().is_some());
        assert!(s.observe().is_none());
    }

    #[test]
    fn placeholder_never_completes() {
        let mut s = ReadingSession::new(BookId::new("7").unwrap(), 1, false);
        assert!(s.start(fixed_now()).unwrap().is_none());
        assert!(s.observe().is_none());
        assert_eq!(s.state(), SessionState::Active);
    }

    #[test]
    fn position_stays_in_range() {
        let mut s = session(4);
        s.start(fixed_now()).unwrap();
        assert_eq!(s.previous().unwrap().position, 0);
        assert!(!s.previous().unwrap().moved);
        assert_eq!(s.go_to(99).unwrap().position, 3);
        assert!(s.is_last_view());
    }

    #[test]
    fn page_number_jump_ignores_out_of_range() {
        let mut s = session(4);
        s.start(fixed_now()).unwrap();
        let nav = s.go_to_page_number(0).unwrap();
        assert!(!nav.moved);
        let nav = s.go_to_page_number(5).unwrap();
        assert!(!nav.moved);
        assert_eq!(s.position(), 0);
        let nav = s.go_to_page_number(3).unwrap();
        assert_eq!(nav.position, 2);
    }
}
