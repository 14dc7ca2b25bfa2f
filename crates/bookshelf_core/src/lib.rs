//! Persistence model for the bookshelf service.
//! Owns the author/book records, their SQLite storage and the
//! referential-integrity rules between them.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::{Author, AuthorId, AuthorWithBooks};
pub use model::book::{Book, BookId, BookWithAuthor, NewBook};
pub use model::ValidationError;
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookListQuery, BookRepository, SqliteBookRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::book_service::BookService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
