use crate::model::{Book, PaginationSettings, ReadingSession};
use crate::text::{Layout, Page, Spread, paginate, sanitize, spread_at, spread_count};

/// Substituted when the book text cannot be fetched or parsed.
pub const LOAD_FAILED_TEXT: &str = "Failed to load content. Please try again later.";

/// Substituted when the fetched text has nothing left after sanitizing.
pub const NO_CONTENT_TEXT: &str = "This book has no readable content.";

/// A book reflowed for one layout.
///
/// Pages are recomputed per session and never persisted.
#[derive(Debug, Clone)]
pub struct Document {
    book: Book,
    layout: Layout,
    /// Sanitized text, or the placeholder message.
    text: String,
    pages: Vec<Page>,
    placeholder: bool,
}

/// What the reader sees at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Page(&'a Page),
    Spread(Spread<'a>),
}

impl Document {
    /// Sanitize and paginate raw text for `layout`.
    ///
    /// Text that sanitizes to nothing becomes a placeholder document.
    #[must_use]
    pub fn from_raw(
        book: Book,
        raw: &str,
        layout: Layout,
        settings: &PaginationSettings,
    ) -> Self {
        Self::from_sanitized(book, sanitize(raw), layout, settings)
    }

    fn from_sanitized(
        book: Book,
        text: String,
        layout: Layout,
        settings: &PaginationSettings,
    ) -> Self {
        let pages = paginate(&text, layout, settings);
        if pages.is_empty() {
            return Self::placeholder(book, layout, NO_CONTENT_TEXT);
        }
        Self {
            book,
            layout,
            text,
            pages,
            placeholder: false,
        }
    }

    /// The same book reflowed for another layout.
    ///
    /// Placeholders stay placeholders with the same message.
    #[must_use]
    pub fn relayout(&self, layout: Layout, settings: &PaginationSettings) -> Self {
        if self.placeholder {
            return Self::placeholder(self.book.clone(), layout, &self.text);
        }
        Self::from_sanitized(self.book.clone(), self.text.clone(), layout, settings)
    }

    /// A single-page document showing `message` instead of book text.
    #[must_use]
    pub fn placeholder(book: Book, layout: Layout, message: &str) -> Self {
        Self {
            book,
            layout,
            text: message.to_string(),
            pages: vec![Page::new(message)],
            placeholder: true,
        }
    }

    #[must_use]
    pub fn load_failed(book: Book, layout: Layout) -> Self {
        Self::placeholder(book, layout, LOAD_FAILED_TEXT)
    }

    #[must_use]
    pub fn book(&self) -> &Book {
        &self.book
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Navigable positions: pages on mobile, spreads on desktop.
    #[must_use]
    pub fn view_count(&self) -> usize {
        match self.layout {
            Layout::Mobile => self.pages.len(),
            Layout::Desktop => spread_count(self.pages.len()),
        }
    }

    #[must_use]
    pub fn view(&self, index: usize) -> Option<View<'_>> {
        match self.layout {
            Layout::Mobile => self.pages.get(index).map(View::Page),
            Layout::Desktop => spread_at(&self.pages, index).map(View::Spread),
        }
    }

    /// An idle session over this document's views.
    #[must_use]
    pub fn session(&self) -> ReadingSession {
        ReadingSession::new(self.book.id().clone(), self.view_count(), !self.placeholder)
    }
}
