//! Author use-case service.
//!
//! # Responsibility
//! - Provide author CRUD entry points with normalized names.
//! - Assemble the author-with-books read model.

use super::{ServiceError, ServiceResult};
use crate::model::author::{Author, AuthorId, AuthorWithBooks};
use crate::model::book::Book;
use crate::model::normalize_required_text;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::ListQuery;

/// Use-case service wrapper for author operations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one author from a display name.
    ///
    /// # Contract
    /// - Fails with `Validation` when the name is blank; nothing is written.
    pub fn create_author(&self, name: &str) -> ServiceResult<Author> {
        let name = normalize_required_text("name", name)?;
        Ok(self.repo.create_author(name.as_str())?)
    }

    /// Lists authors in storage order.
    pub fn list_authors(&self, query: &ListQuery) -> ServiceResult<Vec<Author>> {
        Ok(self.repo.list_authors(query)?)
    }

    pub fn get_author(&self, id: AuthorId) -> ServiceResult<Author> {
        self.repo
            .get_author(id)?
            .ok_or(ServiceError::AuthorNotFound(id))
    }

    /// Gets one author with its books eagerly loaded.
    pub fn get_author_with_books(&self, id: AuthorId) -> ServiceResult<AuthorWithBooks> {
        let author = self.get_author(id)?;
        let books = self.repo.list_author_books(id)?;
        Ok(AuthorWithBooks { author, books })
    }

    /// Lists the books of one existing author.
    pub fn list_author_books(&self, id: AuthorId) -> ServiceResult<Vec<Book>> {
        self.get_author(id)?;
        Ok(self.repo.list_author_books(id)?)
    }

    /// Renames one author.
    ///
    /// # Contract
    /// - Blank names fail with `Validation` and leave the row unchanged.
    /// - Unknown ids fail with `AuthorNotFound`.
    pub fn update_author(&self, id: AuthorId, name: &str) -> ServiceResult<Author> {
        let name = normalize_required_text("name", name)?;
        Ok(self.repo.update_author(id, name.as_str())?)
    }

    /// Deletes one author that has no books.
    pub fn delete_author(&self, id: AuthorId) -> ServiceResult<Author> {
        Ok(self.repo.delete_author(id)?)
    }
}
