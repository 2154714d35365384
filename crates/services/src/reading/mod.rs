//! Reading sessions: opening books, navigation, progress credit, completion.

pub mod notifier;
pub mod reader;
pub mod tracker;

pub use notifier::{CompletionNotifier, CompletionReport, ReaderEvent};
pub use reader::{NavRequest, OpenBook, ReaderService, Step};
pub use tracker::{ExitCredit, ReadingTracker, TickOutcome, TickerHandle};
