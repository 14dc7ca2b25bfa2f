//! Shared store handle.
//!
//! # Responsibility
//! - Own the single SQLite connection opened at process start.
//! - Run storage work off the async workers and hand back its result.
//!
//! # Invariants
//! - Every operation holds the connection lock for its whole duration, so
//!   one operation's checks and writes never interleave with another's.
//! - The returned future resolves only after the storage work has settled.

use crate::error::{ApiError, ApiResult};
use bookshelf_core::db::{open_db, open_db_in_memory, DbResult};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Cloneable handle to the durable store.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a fresh migrated in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one storage operation on the blocking pool.
    pub async fn run<T, F>(&self, operation: F) -> ApiResult<T>
    where
        F: FnOnce(&Connection) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            operation(&guard)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use bookshelf_core::db::migrations::{current_user_version, latest_version};

    #[tokio::test]
    async fn run_returns_operation_result() {
        let store = Store::open_in_memory().unwrap();
        let version = store
            .run(|conn| Ok(current_user_version(conn)?))
            .await
            .unwrap();
        assert_eq!(version, latest_version());
    }

    #[tokio::test]
    async fn clones_share_one_database() {
        let store = Store::open_in_memory().unwrap();
        let other = store.clone();
        store
            .run(|conn| {
                conn.execute("INSERT INTO authors (name) VALUES ('Shared');", [])
                    .map_err(bookshelf_core::RepoError::from)?;
                Ok(())
            })
            .await
            .unwrap();

        let count: i64 = other
            .run(|conn| {
                Ok(conn
                    .query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))
                    .map_err(bookshelf_core::RepoError::from)?)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
