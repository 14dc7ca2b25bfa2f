//! Author record.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes or gets reused.
//! - `name` is non-empty.

use super::book::Book;
use super::{ensure_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated author identity.
pub type AuthorId = i64;

/// Persisted author row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    /// Display name, stored normalized.
    pub name: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms timestamp of the last successful update.
    pub updated_at: i64,
}

impl Author {
    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("name", &self.name)
    }
}

/// Author read model with its books eagerly loaded.
///
/// Serializes flat: author fields plus a `books` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWithBooks {
    #[serde(flatten)]
    pub author: Author,
    /// Books ordered by ascending id.
    pub books: Vec<Book>,
}
