use thiserror::Error;

use crate::model::{BookError, SessionTransitionError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Book(#[from] BookError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] SessionTransitionError),
}
