//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `authors` table.
//! - Load the one-to-many book relation for eager author reads.
//!
//! # Invariants
//! - Authors are listed in storage order (`id ASC`).
//! - Deleting an author with books is rejected, never cascaded.

use super::book_repo::{parse_book_row, BOOK_SELECT_SQL};
use super::{ensure_connection_ready, ListQuery, RepoError, RepoResult};
use crate::model::author::{Author, AuthorId};
use crate::model::book::Book;
use crate::model::ensure_not_blank;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    created_at,
    updated_at
FROM authors";

/// Repository interface for author CRUD operations.
pub trait AuthorRepository {
    /// Inserts one author and returns the stored row.
    fn create_author(&self, name: &str) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(&self, query: &ListQuery) -> RepoResult<Vec<Author>>;
    /// Lists books referencing one author, ordered by book id.
    fn list_author_books(&self, id: AuthorId) -> RepoResult<Vec<Book>>;
    /// Overwrites the name and returns the updated row.
    fn update_author(&self, id: AuthorId, name: &str) -> RepoResult<Author>;
    /// Removes one author and returns the removed row.
    fn delete_author(&self, id: AuthorId) -> RepoResult<Author>;
}

/// SQLite-backed author repository.
#[derive(Debug)]
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, name: &str) -> RepoResult<Author> {
        ensure_not_blank("name", name)?;

        self.conn
            .execute("INSERT INTO authors (name) VALUES (?1);", [name])?;
        let id = self.conn.last_insert_rowid();
        load_required_author(self.conn, id)
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        load_author(self.conn, id)
    }

    fn list_authors(&self, query: &ListQuery) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        query.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn list_author_books(&self, id: AuthorId) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_SELECT_SQL}
             WHERE author_id = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([id])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn update_author(&self, id: AuthorId, name: &str) -> RepoResult<Author> {
        ensure_not_blank("name", name)?;

        let changed = self.conn.execute(
            "UPDATE authors
             SET
                name = ?1,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE id = ?2;",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(RepoError::AuthorNotFound(id));
        }
        load_required_author(self.conn, id)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<Author> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let author = load_author(&tx, id)?.ok_or(RepoError::AuthorNotFound(id))?;

        let book_count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM books WHERE author_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        if book_count > 0 {
            return Err(RepoError::AuthorHasBooks {
                author_id: id,
                book_count,
            });
        }

        tx.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(author)
    }
}

/// Returns whether an author row exists for `id`.
pub(crate) fn author_exists(conn: &Connection, id: AuthorId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_author(conn: &Connection, id: AuthorId) -> RepoResult<Option<Author>> {
    let mut stmt = conn.prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_author_row(row)?));
    }
    Ok(None)
}

fn load_required_author(conn: &Connection, id: AuthorId) -> RepoResult<Author> {
    load_author(conn, id)?.ok_or(RepoError::AuthorNotFound(id))
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let author = Author {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    author
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("authors.id={}: {err}", author.id)))?;
    Ok(author)
}

pub(crate) fn parse_joined_author(row: &Row<'_>) -> RepoResult<Author> {
    let author = Author {
        id: row.get("author_id")?,
        name: row.get("author_name")?,
        created_at: row.get("author_created_at")?,
        updated_at: row.get("author_updated_at")?,
    };
    author
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("authors.id={}: {err}", author.id)))?;
    Ok(author)
}
