use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::PaginationSettings;

// A run of non-terminal characters closed by terminal punctuation, or a
// trailing run with no terminal punctuation at all.
static SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^.!?]*[.!?]+|[^.!?]+").expect("sentence pattern should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Single column, fixed word windows.
    Mobile,
    /// Two-page spreads, sentence-aligned character budget.
    Desktop,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Mobile => "mobile",
            Layout::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLayoutError(String);

impl fmt::Display for ParseLayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown layout: {}", self.0)
    }
}

impl std::error::Error for ParseLayoutError {}

impl FromStr for Layout {
    type Err = ParseLayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mobile" => Ok(Layout::Mobile),
            "desktop" => Ok(Layout::Desktop),
            _ => Err(ParseLayoutError(value.to_string())),
        }
    }
}

/// One page of reflowed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page(String);

impl Page {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reflow sanitized text into pages for the given layout.
///
/// Blank input yields no pages. Joining the pages with single spaces gives
/// back the (whitespace-normalized) input.
#[must_use]
pub fn paginate(text: &str, layout: Layout, settings: &PaginationSettings) -> Vec<Page> {
    match layout {
        Layout::Mobile => paginate_words(text, settings.words_per_page()),
        Layout::Desktop => paginate_sentences(text, settings.chars_per_page()),
    }
}

fn paginate_words(text: &str, words_per_page: usize) -> Vec<Page> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(words_per_page.max(1))
        .map(|chunk| Page::new(chunk.join(" ")))
        .collect()
}

fn paginate_sentences(text: &str, chars_per_page: usize) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0_usize;

    for sentence in split_sentences(text) {
        let sentence_chars = sentence.chars().count();
        if current_chars > 0 && current_chars + 1 + sentence_chars > chars_per_page {
            pages.push(Page::new(std::mem::take(&mut current)));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(sentence);
        current_chars += sentence_chars;
    }

    if !current.is_empty() {
        pages.push(Page::new(current));
    }
    pages
}

/// Split text into trimmed, non-blank sentences ending in `.`, `!` or `?`.
///
/// Trailing text without terminal punctuation is kept as a final sentence.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}
