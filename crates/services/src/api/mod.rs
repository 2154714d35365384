//! Clients for the remote reading backend.

pub mod books;
pub mod quest;

use url::Url;

use crate::error::ApiError;

pub use books::{BookSource, HttpBookSource};
pub use quest::{BOOK_COMPLETED_EVENT, HttpQuestReporter, QuestProgressRequest, QuestReporter};

/// `base` with `segments` appended as percent-encoded path segments.
///
/// A trailing slash on `base` is ignored, and each segment stays a single
/// segment even if it contains `/`, `?` or `#`.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let invalid = || ApiError::InvalidBaseUrl(base.to_string());
    let mut url = Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
