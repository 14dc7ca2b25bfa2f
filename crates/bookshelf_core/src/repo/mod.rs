//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for authors and books.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Integrity checks and the write they guard run in one `IMMEDIATE`
//!   transaction, so a failed check leaves storage unchanged.
//! - Repository APIs return semantic errors (`AuthorNotFound`,
//!   `UnknownAuthor`, ...) in addition to DB transport errors.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::author::AuthorId;
use crate::model::book::BookId;
use crate::model::ValidationError;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod book_repo;

/// Upper bound applied to caller-provided list limits.
pub const LIST_LIMIT_MAX: u32 = 500;

const REQUIRED_TABLES: &[&str] = &["authors", "books"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for author/book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Write input violates record invariants.
    Validation(ValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    AuthorNotFound(AuthorId),
    BookNotFound(BookId),
    /// Book write references an author id with no matching row.
    UnknownAuthor(AuthorId),
    /// Author delete rejected because books still reference it.
    AuthorHasBooks { author_id: AuthorId, book_count: i64 },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
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
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination options for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// `None` returns every row. Clamped to `1..=LIST_LIMIT_MAX`.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ListQuery {
    /// Appends `LIMIT`/`OFFSET` clauses and their bind values.
    pub(crate) fn push_sql(&self, sql: &mut String, bind_values: &mut Vec<Value>) {
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(normalize_list_limit(limit))));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(self.offset)));
        }
    }
}

/// Clamps a list limit into `1..=LIST_LIMIT_MAX`.
pub fn normalize_list_limit(limit: u32) -> u32 {
    limit.clamp(1, LIST_LIMIT_MAX)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

#[cfg(test)]
mod tests {
    use super::{normalize_list_limit, ListQuery, LIST_LIMIT_MAX};
    use rusqlite::types::Value;

    #[test]
    fn list_limit_is_clamped() {
        assert_eq!(normalize_list_limit(0), 1);
        assert_eq!(normalize_list_limit(25), 25);
        assert_eq!(normalize_list_limit(u32::MAX), LIST_LIMIT_MAX);
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let mut sql = String::new();
        let mut values = Vec::new();
        ListQuery {
            limit: None,
            offset: 4,
        }
        .push_sql(&mut sql, &mut values);
        assert_eq!(sql, " LIMIT -1 OFFSET ?");
        assert_eq!(values, vec![Value::Integer(4)]);
    }
}
