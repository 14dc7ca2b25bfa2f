//! Embedded schema scripts for the bookshelf store.
//!
//! Script `NNNN_<name>.sql` moves the schema to version `NNNN`. Pending
//! scripts run in one transaction; `user_version` is bumped after each so
//! a failure rolls back the whole batch.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "0001_init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "0002_books_author_index",
        sql: include_str!("0002_books_author_index.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` to [`latest_version`] and returns how many scripts ran.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the first script that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    run_migrations(conn, MIGRATIONS)
}

/// Reads the schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn run_migrations(conn: &mut Connection, migrations: &[Migration]) -> DbResult<usize> {
    let from_version = current_user_version(conn)?;
    let target = migrations.last().map_or(0, |migration| migration.version);
    if from_version > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: target,
        });
    }

    let pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        let step = tx.execute_batch(migration.sql).and_then(|()| {
            tx.pragma_update(None, "user_version", migration.version)
        });
        if let Err(source) = step {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={}",
                migration.version, migration.name, source
            );
            return Err(DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            });
        }
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        from_version,
        target,
        pending.len()
    );
    Ok(pending.len())
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, run_migrations, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn script_names_match_their_versions() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            let expected = u32::try_from(index + 1).unwrap();
            assert_eq!(migration.version, expected, "{}", migration.name);
            assert!(
                migration.name.starts_with(&format!("{expected:04}_")),
                "{} does not carry version {expected}",
                migration.name
            );
        }
    }

    #[test]
    fn failing_script_is_reported_and_rolls_back_batch() {
        let mut conn = Connection::open_in_memory().unwrap();
        let broken = [
            Migration {
                version: 1,
                name: "0001_shelves",
                sql: "CREATE TABLE shelves (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                name: "0002_broken",
                sql: "CREATE TABLE shelves (id INTEGER PRIMARY KEY);",
            },
        ];

        let err = run_migrations(&mut conn, &broken).unwrap_err();
        assert!(err.to_string().contains("migration 2 (0002_broken) failed"));
        match err {
            DbError::Migration { version, name, .. } => {
                assert_eq!(version, 2);
                assert_eq!(name, "0002_broken");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(current_user_version(&conn).unwrap(), 0);
        let shelves: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'shelves';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(shelves, 0);
    }

    #[test]
    fn up_to_date_connection_runs_nothing() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&mut conn, MIGRATIONS).unwrap(), MIGRATIONS.len());
        assert_eq!(run_migrations(&mut conn, MIGRATIONS).unwrap(), 0);
    }
}
