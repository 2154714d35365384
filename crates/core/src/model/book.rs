use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::BookId;

/// Shown on the title page when a book lists no authors.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BookError {
    #[error("book title must not be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// A book as described by the remote catalog.
///
/// Immutable for the lifetime of a reading session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: BookId,
    title: String,
    authors: Vec<Author>,
    content: Option<String>,
}

impl Book {
    /// Build a book from catalog metadata.
    ///
    /// # Errors
    ///
    /// Returns `BookError::EmptyTitle` if the title is blank.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        authors: Vec<Author>,
    ) -> Result<Self, BookError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(BookError::EmptyTitle);
        }
        let authors = authors
            .into_iter()
            .map(|a| Author {
                name: a.name.trim().to_string(),
            })
            .filter(|a| !a.name.is_empty())
            .collect();

        Ok(Self {
            id,
            title,
            authors,
            content: None,
        })
    }

    /// Attach already-fetched raw content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &BookId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// The first listed author, or `UNKNOWN_AUTHOR`.
    #[must_use]
    pub fn primary_author(&self) -> &str {
        self.authors
            .first()
            .map_or(UNKNOWN_AUTHOR, |a| a.name.as_str())
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> BookId {
        BookId::new("1342").unwrap()
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(
            Book::new(id(), "  ", Vec::new()).unwrap_err(),
            BookError::EmptyTitle
        );
    }

    #[test]
    fn primary_author_falls_back() {
        let book = Book::new(id(), "Pride and Prejudice", Vec::new()).unwrap();
        assert_eq!(book.primary_author(), UNKNOWN_AUTHOR);

        let book = Book::new(
            id(),
            "Pride and Prejudice",
            vec![
                Author { name: " ".into() },
                Author {
                    name: "Austen, Jane".into(),
                },
            ],
        )
        .unwrap();
        assert_eq!(book.primary_author(), "Austen, Jane");
    }
}
