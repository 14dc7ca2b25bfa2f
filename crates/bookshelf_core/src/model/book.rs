//! Book record and write input.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes or gets reused.
//! - `title` is non-empty.
//! - `author_id` resolves to an existing author at every committed write.

use super::author::{Author, AuthorId};
use super::{ensure_not_blank, normalize_required_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated book identity.
pub type BookId = i64;

/// Persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    /// Serialized as `authorid` to match the request field name.
    #[serde(rename = "authorid")]
    pub author_id: AuthorId,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Book {
    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("title", &self.title)
    }
}

/// Input for create and full-replacement update of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author_id: AuthorId,
}

impl NewBook {
    /// Builds write input with a normalized title.
    pub fn new(title: &str, author_id: AuthorId) -> Result<Self, ValidationError> {
        Ok(Self {
            title: normalize_required_text("title", title)?,
            author_id,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("title", &self.title)
    }
}

/// Book read model joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookWithAuthor {
    #[serde(flatten)]
    pub book: Book,
    pub author: Author,
}

#[cfg(test)]
mod tests {
    use super::{Book, NewBook};
    use crate::model::ValidationError;

    #[test]
    fn new_book_normalizes_title() {
        let input = NewBook::new("  A  Study in\tScarlet ", 3).unwrap();
        assert_eq!(input.title, "A Study in Scarlet");
        assert_eq!(input.author_id, 3);
    }

    #[test]
    fn new_book_rejects_blank_title() {
        assert_eq!(
            NewBook::new("", 3).unwrap_err(),
            ValidationError::EmptyField("title")
        );
    }

    #[test]
    fn book_serializes_author_reference_as_authorid() {
        let book = Book {
            id: 1,
            title: "The Sign of the Four".to_string(),
            author_id: 9,
            created_at: 10,
            updated_at: 10,
        };
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["authorid"], 9);
        assert!(value.get("author_id").is_none());
    }
}
