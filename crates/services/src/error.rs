//! Shared error types for the services crate.

use thiserror::Error;

use reader_core::model::{SessionTransitionError, SettingsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the remote book and quest clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("quest reporting is not configured")]
    Disabled,
    #[error("response did not include book content")]
    MissingContent,
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ReaderService` and the reading-progress components.
///
/// Remote failures never show up here; they degrade to placeholder pages or
/// skipped reports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReaderError {
    #[error(transparent)]
    Session(#[from] SessionTransitionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
