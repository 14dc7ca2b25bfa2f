//! Core use-case services.
//!
//! # Responsibility
//! - Normalize caller input and orchestrate repository calls.
//! - Translate repository failures into one typed error surface.
//!
//! # Invariants
//! - Services never bypass repository validation/integrity checks.
//! - Service layer remains storage-agnostic.

use crate::model::author::AuthorId;
use crate::model::book::BookId;
use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_service;
pub mod book_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from author/book use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Required field is missing or blank.
    Validation(ValidationError),
    AuthorNotFound(AuthorId),
    BookNotFound(BookId),
    /// Book input references an author that does not exist.
    UnknownAuthor(AuthorId),
    /// Author delete rejected while books still reference it.
    AuthorHasBooks { author_id: AuthorId, book_count: i64 },
    /// Storage-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AuthorNotFound(id) => write!(f, "author not found: {id}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::UnknownAuthor(id) => write!(f, "referenced author does not exist: {id}"),
            Self::AuthorHasBooks {
                author_id,
                book_count,
            } => write!(
                f,
                "author {author_id} still has {book_count} book(s); delete them first"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::AuthorNotFound(id) => Self::AuthorNotFound(id),
            RepoError::BookNotFound(id) => Self::BookNotFound(id),
            RepoError::UnknownAuthor(id) => Self::UnknownAuthor(id),
            RepoError::AuthorHasBooks {
                author_id,
                book_count,
            } => Self::AuthorHasBooks {
                author_id,
                book_count,
            },
            other => Self::Repo(other),
        }
    }
}
