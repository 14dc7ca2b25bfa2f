//! Book use-case service.
//!
//! # Responsibility
//! - Provide book CRUD entry points with normalized titles.
//! - Surface dangling author references as `UnknownAuthor`.

use super::{ServiceError, ServiceResult};
use crate::model::author::AuthorId;
use crate::model::book::{Book, BookId, BookWithAuthor, NewBook};
use crate::repo::book_repo::{BookListQuery, BookRepository};

/// Use-case service wrapper for book operations.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one book for an existing author.
    pub fn create_book(&self, title: &str, author_id: AuthorId) -> ServiceResult<Book> {
        let input = NewBook::new(title, author_id)?;
        Ok(self.repo.create_book(&input)?)
    }

    pub fn list_books(&self, query: &BookListQuery) -> ServiceResult<Vec<Book>> {
        Ok(self.repo.list_books(query)?)
    }

    pub fn get_book(&self, id: BookId) -> ServiceResult<Book> {
        self.repo.get_book(id)?.ok_or(ServiceError::BookNotFound(id))
    }

    /// Gets one book joined with its author.
    pub fn get_book_with_author(&self, id: BookId) -> ServiceResult<BookWithAuthor> {
        self.repo
            .get_book_with_author(id)?
            .ok_or(ServiceError::BookNotFound(id))
    }

    /// Replaces title and author reference of one book.
    ///
    /// Blank titles and dangling author ids leave the stored row unchanged.
    pub fn update_book(
        &self,
        id: BookId,
        title: &str,
        author_id: AuthorId,
    ) -> ServiceResult<Book> {
        let input = NewBook::new(title, author_id)?;
        Ok(self.repo.update_book(id, &input)?)
    }

    pub fn delete_book(&self, id: BookId) -> ServiceResult<Book> {
        Ok(self.repo.delete_book(id)?)
    }
}
