use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use reader_core::model::BookId;
use url::Url;

use crate::api::endpoint;
use crate::error::ApiError;

pub const BOOK_COMPLETED_EVENT: &str = "book_completed";

/// Body of `POST {base}/quest/update-progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestProgressRequest {
    pub event_type: &'static str,
    pub book_id: BookId,
    /// Epoch milliseconds when reading started.
    pub start_time: i64,
}

impl QuestProgressRequest {
    #[must_use]
    pub fn book_completed(book_id: BookId, start_time: i64) -> Self {
        Self {
            event_type: BOOK_COMPLETED_EVENT,
            book_id,
            start_time,
        }
    }
}

/// Remote quest-progress endpoint.
#[async_trait]
pub trait QuestReporter: Send + Sync {
    /// Whether reports can be sent at all (an auth token is configured).
    fn enabled(&self) -> bool;

    /// Send one progress event and return the success envelope.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when disabled, on transport failures, or on a
    /// non-success status.
    async fn report(&self, request: &QuestProgressRequest) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct HttpQuestReporter {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpQuestReporter {
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    fn update_url(&self) -> Result<Url, ApiError> {
        endpoint(&self.base_url, &["quest", "update-progress"])
    }
}

#[async_trait]
impl QuestReporter for HttpQuestReporter {
    fn enabled(&self) -> bool {
        self.token.is_some()
    }

    async fn report(&self, request: &QuestProgressRequest) -> Result<Value, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::Disabled)?;

        let response = self
            .client
            .post(self.update_url()?)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}
