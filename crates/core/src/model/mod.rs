mod book;
mod document;
mod ids;
mod progress;
mod session;
mod settings;

pub use ids::{BookId, ParseIdError};

pub use book::{Author, Book, BookError, UNKNOWN_AUTHOR};
pub use document::{Document, LOAD_FAILED_TEXT, NO_CONTENT_TEXT, View};
pub use progress::{EXIT_CREDIT_MIN_MINUTES, LEVEL_PROGRESS_MAX, ProgressState, gained_progress};
pub use session::{
    CompletionEvent, Navigation, ReadingSession, SessionState, SessionTransitionError,
};
pub use settings::{
    DEFAULT_API_BASE_URL, DEFAULT_CHARS_PER_PAGE, DEFAULT_TICK_SECS, DEFAULT_WORDS_PER_PAGE,
    PaginationSettings, ReaderSettings, ReaderSettingsDraft, SettingsError,
};
