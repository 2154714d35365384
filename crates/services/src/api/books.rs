use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use reader_core::model::BookId;
use url::Url;

use crate::api::endpoint;
use crate::error::ApiError;

/// Source of raw (possibly HTML-laced) book text.
#[async_trait]
pub trait BookSource: Send + Sync {
    /// Fetch the raw content of a book.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses, or a
    /// response without content.
    async fn fetch_content(&self, id: &BookId) -> Result<String, ApiError>;
}

/// Fetches `GET {base}/stories/{id}`.
#[derive(Clone)]
pub struct HttpBookSource {
    client: Client,
    base_url: String,
}

impl HttpBookSource {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn story_url(&self, id: &BookId) -> Result<Url, ApiError> {
        endpoint(&self.base_url, &["stories", id.as_str()])
    }
}

#[async_trait]
impl BookSource for HttpBookSource {
    async fn fetch_content(&self, id: &BookId) -> Result<String, ApiError> {
        let response = self.client.get(self.story_url(id)?).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        let body: StoryEnvelope = response.json().await?;
        body.into_content()
    }
}

#[derive(Debug, Deserialize)]
struct StoryEnvelope {
    story: Option<Story>,
}

#[derive(Debug, Deserialize)]
struct Story {
    content: Option<String>,
}

impl StoryEnvelope {
    fn into_content(self) -> Result<String, ApiError> {
        self.story
            .and_then(|story| story.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ApiError::MissingContent)
    }
}
