//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `books` table.
//! - Enforce that every written book references an existing author.
//!
//! # Invariants
//! - Books are listed in storage order (`id ASC`).
//! - Author existence is checked in the same transaction as the write; the
//!   `FOREIGN KEY` constraint backs it up and maps to the same error.

use super::author_repo::{author_exists, parse_joined_author};
use super::{ensure_connection_ready, is_foreign_key_violation, ListQuery, RepoError, RepoResult};
use crate::model::author::AuthorId;
use crate::model::book::{Book, BookId, BookWithAuthor, NewBook};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

pub(crate) const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author_id,
    created_at,
    updated_at
FROM books";

const BOOK_WITH_AUTHOR_SELECT_SQL: &str = "SELECT
    b.id AS id,
    b.title AS title,
    b.author_id AS author_id,
    b.created_at AS created_at,
    b.updated_at AS updated_at,
    a.name AS author_name,
    a.created_at AS author_created_at,
    a.updated_at AS author_updated_at
FROM books b
JOIN authors a ON a.id = b.author_id";

/// Query options for listing books.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookListQuery {
    /// Restricts results to one author.
    pub author_id: Option<AuthorId>,
    pub page: ListQuery,
}

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    /// Inserts one book and returns the stored row.
    fn create_book(&self, book: &NewBook) -> RepoResult<Book>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Loads one book joined with its author.
    fn get_book_with_author(&self, id: BookId) -> RepoResult<Option<BookWithAuthor>>;
    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>>;
    /// Replaces title and author reference, returning the updated row.
    fn update_book(&self, id: BookId, book: &NewBook) -> RepoResult<Book>;
    /// Removes one book and returns the removed row.
    fn delete_book(&self, id: BookId) -> RepoResult<Book>;
}

/// SQLite-backed book repository.
#[derive(Debug)]
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<Book> {
        book.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !author_exists(&tx, book.author_id)? {
            return Err(RepoError::UnknownAuthor(book.author_id));
        }

        tx.execute(
            "INSERT INTO books (title, author_id) VALUES (?1, ?2);",
            params![book.title.as_str(), book.author_id],
        )
        .map_err(|err| map_write_error(err, book.author_id))?;
        let id = tx.last_insert_rowid();
        let stored = load_required_book(&tx, id)?;
        tx.commit()?;
        Ok(stored)
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        load_book(self.conn, id)
    }

    fn get_book_with_author(&self, id: BookId) -> RepoResult<Option<BookWithAuthor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_WITH_AUTHOR_SELECT_SQL} WHERE b.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(BookWithAuthor {
                book: parse_book_row(row)?,
                author: parse_joined_author(row)?,
            }));
        }
        Ok(None)
    }

    fn list_books(&self, query: &BookListQuery) -> RepoResult<Vec<Book>> {
        let mut sql = format!("{BOOK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(author_id) = query.author_id {
            sql.push_str(" AND author_id = ?");
            bind_values.push(Value::Integer(author_id));
        }

        sql.push_str(" ORDER BY id ASC");
        query.page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn update_book(&self, id: BookId, book: &NewBook) -> RepoResult<Book> {
        book.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if load_book(&tx, id)?.is_none() {
            return Err(RepoError::BookNotFound(id));
        }
        if !author_exists(&tx, book.author_id)? {
            return Err(RepoError::UnknownAuthor(book.author_id));
        }

        tx.execute(
            "UPDATE books
             SET
                title = ?1,
                author_id = ?2,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE id = ?3;",
            params![book.title.as_str(), book.author_id, id],
        )
        .map_err(|err| map_write_error(err, book.author_id))?;
        let stored = load_required_book(&tx, id)?;
        tx.commit()?;
        Ok(stored)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<Book> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let book = load_book(&tx, id)?.ok_or(RepoError::BookNotFound(id))?;
        tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(book)
    }
}

fn map_write_error(err: rusqlite::Error, author_id: AuthorId) -> RepoError {
    if is_foreign_key_violation(&err) {
        return RepoError::UnknownAuthor(author_id);
    }
    err.into()
}

fn load_book(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(row)?));
    }
    Ok(None)
}

fn load_required_book(conn: &Connection, id: BookId) -> RepoResult<Book> {
    load_book(conn, id)?.ok_or(RepoError::BookNotFound(id))
}

pub(crate) fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author_id: row.get("author_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    book.validate()
        .map_err(|err| RepoError::InvalidData(format!("books.id={}: {err}", book.id)))?;
    Ok(book)
}
