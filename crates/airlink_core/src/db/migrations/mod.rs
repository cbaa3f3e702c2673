//! Forward-only schema migrations.
//!
//! # Responsibility
//! - Register the schema steps for carriers, facilities and memberships.
//! - Apply every pending step in one transaction and verify what it created.
//!
//! # Invariants
//! - Step versions are strictly increasing.
//! - A step whose declared tables are missing afterwards rolls back entirely.

use crate::db::{table_exists, DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
    /// Tables that must exist once this step has run.
    creates: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
    creates: &["carriers", "facilities", "carrier_facilities"],
}];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings `conn` up to [`latest_version`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run_steps(conn, MIGRATIONS)
}

fn run_steps(conn: &mut Connection, steps: &[Migration]) -> DbResult<()> {
    let found = current_user_version(conn)?;
    let supported = steps.last().map_or(0, |step| step.version);
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Migration> = steps.iter().filter(|step| step.version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        if let Some(table) = first_missing(&tx, step.creates)? {
            return Err(DbError::MissingTable {
                version: step.version,
                table,
            });
        }
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={supported} steps={}",
        pending.len()
    );
    Ok(())
}

fn first_missing(conn: &Connection, tables: &[&'static str]) -> DbResult<Option<&'static str>> {
    for &table in tables {
        if !table_exists(conn, table)? {
            return Ok(Some(table));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{current_user_version, run_steps, Migration};
    use crate::db::{table_exists, DbError};
    use rusqlite::Connection;

    #[test]
    fn step_missing_declared_table_rolls_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        let steps = [
            Migration {
                version: 1,
                sql: "CREATE TABLE carriers (uuid TEXT PRIMARY KEY);",
                creates: &["carriers"],
            },
            Migration {
                version: 2,
                sql: "CREATE TABLE facilities (uuid TEXT PRIMARY KEY);",
                creates: &["facilities", "carrier_facilities"],
            },
        ];

        let err = run_steps(&mut conn, &steps).unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingTable {
                version: 2,
                table: "carrier_facilities"
            }
        ));
        assert_eq!(current_user_version(&conn).unwrap(), 0);
        assert!(!table_exists(&conn, "carriers").unwrap());
    }

    #[test]
    fn steps_already_applied_are_skipped() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();
        let steps = [Migration {
            version: 1,
            sql: "CREATE TABLE never_created (id INTEGER);",
            creates: &["never_created"],
        }];

        run_steps(&mut conn, &steps).unwrap();
        assert!(!table_exists(&conn, "never_created").unwrap());
    }
}
