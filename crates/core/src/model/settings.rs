use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://czc-eight.vercel.app/api";
pub const DEFAULT_WORDS_PER_PAGE: usize = 200;
pub const DEFAULT_CHARS_PER_PAGE: usize = 1800;
pub const DEFAULT_TICK_SECS: u64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
    #[error("words per page must be greater than zero")]
    ZeroWordsPerPage,
    #[error("characters per page must be greater than zero")]
    ZeroCharsPerPage,
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Page sizing for both layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationSettings {
    words_per_page: usize,
    chars_per_page: usize,
}

impl PaginationSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if either bound is zero.
    pub fn new(words_per_page: usize, chars_per_page: usize) -> Result<Self, SettingsError> {
        if words_per_page == 0 {
            return Err(SettingsError::ZeroWordsPerPage);
        }
        if chars_per_page == 0 {
            return Err(SettingsError::ZeroCharsPerPage);
        }
        Ok(Self {
            words_per_page,
            chars_per_page,
        })
    }

    /// Token window for the mobile layout.
    #[must_use]
    pub fn words_per_page(&self) -> usize {
        self.words_per_page
    }

    /// Character budget for the desktop layout.
    #[must_use]
    pub fn chars_per_page(&self) -> usize {
        self.chars_per_page
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            words_per_page: DEFAULT_WORDS_PER_PAGE,
            chars_per_page: DEFAULT_CHARS_PER_PAGE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderSettings {
    api_base_url: String,
    auth_token: Option<String>,
    pagination: PaginationSettings,
    tick_secs: u64,
    http_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct ReaderSettingsDraft {
    pub api_base_url: Option<String>,
    pub auth_token: Option<String>,
    pub words_per_page: Option<usize>,
    pub chars_per_page: Option<usize>,
    pub tick_secs: Option<u64>,
    pub http_timeout_secs: Option<u64>,
}

impl ReaderSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft, filling defaults for unset values.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the base URL is invalid or a numeric bound is zero.
    pub fn validate(self) -> Result<ReaderSettings, SettingsError> {
        let api_base_url = normalize_optional(self.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if Url::parse(&api_base_url).is_err() {
            return Err(SettingsError::InvalidBaseUrl);
        }
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let pagination = PaginationSettings::new(
            self.words_per_page.unwrap_or(DEFAULT_WORDS_PER_PAGE),
            self.chars_per_page.unwrap_or(DEFAULT_CHARS_PER_PAGE),
        )?;

        let tick_secs = self.tick_secs.unwrap_or(DEFAULT_TICK_SECS);
        if tick_secs == 0 {
            return Err(SettingsError::ZeroTickInterval);
        }

        Ok(ReaderSettings {
            api_base_url,
            auth_token: normalize_optional(self.auth_token),
            pagination,
            tick_secs,
            http_timeout_secs: self.http_timeout_secs.filter(|secs| *secs > 0),
        })
    }
}

impl ReaderSettings {
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    #[must_use]
    pub fn pagination(&self) -> PaginationSettings {
        self.pagination
    }

    #[must_use]
    pub fn tick_secs(&self) -> u64 {
        self.tick_secs
    }

    #[must_use]
    pub fn http_timeout_secs(&self) -> Option<u64> {
        self.http_timeout_secs
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
            pagination: PaginationSettings::default(),
            tick_secs: DEFAULT_TICK_SECS,
            http_timeout_secs: None,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
