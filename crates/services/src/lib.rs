#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod config;
pub mod error;
pub mod progress;
pub mod reading;

pub use reader_core::Clock;

pub use app_services::AppServices;
pub use error::{ApiError, AppServicesError, ReaderError};
pub use progress::ProgressLedger;

pub use reading::{
    CompletionNotifier, CompletionReport, ExitCredit, NavRequest, OpenBook, ReaderEvent,
    ReaderService, ReadingTracker, Step, TickOutcome, TickerHandle,
};
