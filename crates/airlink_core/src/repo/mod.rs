//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the carrier and facility store contracts used by services.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate records before persistence.
//! - Lookups return `Ok(None)` for absent rows; services decide whether that
//!   is a `NotFound`.
//! - The facility-side carrier mirror is derived from `carrier_facilities`
//!   and never written directly.

use crate::db::table_exists;
use rusqlite::Connection;
use uuid::Uuid;

pub mod carrier_repo;
pub mod error;
pub mod facility_repo;

pub use error::{RepoError, RepoResult};

fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
