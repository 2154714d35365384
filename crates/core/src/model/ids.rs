use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Book, as issued by the remote catalog.
///
/// Catalog ids are opaque strings (numeric for some sources, hex for others),
/// so the value is kept verbatim after trimming.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Creates a new `BookId`
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the id is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "BookId".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the underlying id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BookId({})", self.0)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for BookId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookId::new(s)
    }
}

impl TryFrom<String> for BookId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BookId::new(value)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_display() {
        let id = BookId::new("1342").unwrap();
        assert_eq!(id.to_string(), "1342");
    }

    #[test]
    fn test_book_id_from_str_trims() {
        let id: BookId = "  abc123 ".parse().unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn test_book_id_from_str_blank() {
        assert!("   ".parse::<BookId>().is_err());
    }

    #[test]
    fn test_book_id_serializes_as_string() {
        let id = BookId::new("84").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"84\"");
        let back: BookId = serde_json::from_str("\"84\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<BookId>("\"\"").is_err());
    }
}
