//! Facility repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `facilities` table.
//! - Materialize the carrier mirror from `carrier_facilities` on read.
//!
//! # Invariants
//! - Write paths call `Facility::validate()` before SQL mutations.
//! - Deleting a facility cascades to every carrier membership entry.

use super::{ensure_tables, parse_uuid, RepoError, RepoResult};
use crate::model::carrier::CarrierId;
use crate::model::facility::{Facility, FacilityId};
use rusqlite::{params, Connection, Row};

const FACILITY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    code,
    country,
    city
FROM facilities";

/// Repository interface for facility CRUD operations.
pub trait FacilityRepository {
    fn create_facility(&self, facility: &Facility) -> RepoResult<FacilityId>;
    fn get_facility(&self, id: FacilityId) -> RepoResult<Option<Facility>>;
    fn list_facilities(&self) -> RepoResult<Vec<Facility>>;
    fn update_facility(&self, facility: &Facility) -> RepoResult<()>;
    fn delete_facility(&self, id: FacilityId) -> RepoResult<()>;
}

impl<R: FacilityRepository + ?Sized> FacilityRepository for &R {
    fn create_facility(&self, facility: &Facility) -> RepoResult<FacilityId> {
        (**self).create_facility(facility)
    }

    fn get_facility(&self, id: FacilityId) -> RepoResult<Option<Facility>> {
        (**self).get_facility(id)
    }

    fn list_facilities(&self) -> RepoResult<Vec<Facility>> {
        (**self).list_facilities()
    }

    fn update_facility(&self, facility: &Facility) -> RepoResult<()> {
        (**self).update_facility(facility)
    }

    fn delete_facility(&self, id: FacilityId) -> RepoResult<()> {
        (**self).delete_facility(id)
    }
}

/// SQLite-backed facility repository.
pub struct SqliteFacilityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFacilityRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["facilities", "carrier_facilities"])?;
        Ok(Self { conn })
    }
}

impl FacilityRepository for SqliteFacilityRepository<'_> {
    fn create_facility(&self, facility: &Facility) -> RepoResult<FacilityId> {
        facility.validate()?;

        self.conn.execute(
            "INSERT INTO facilities (uuid, name, code, country, city)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                facility.id.to_string(),
                facility.name.as_str(),
                facility.code.as_str(),
                facility.country.as_str(),
                facility.city.as_str(),
            ],
        )?;

        Ok(facility.id)
    }

    fn get_facility(&self, id: FacilityId) -> RepoResult<Option<Facility>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FACILITY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut facility = parse_facility_row(row)?;
            facility.carrier_ids = load_carrier_ids(self.conn, facility.id)?;
            return Ok(Some(facility));
        }

        Ok(None)
    }

    fn list_facilities(&self) -> RepoResult<Vec<Facility>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FACILITY_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut facilities = Vec::new();
        while let Some(row) = rows.next()? {
            let mut facility = parse_facility_row(row)?;
            facility.carrier_ids = load_carrier_ids(self.conn, facility.id)?;
            facilities.push(facility);
        }

        Ok(facilities)
    }

    fn update_facility(&self, facility: &Facility) -> RepoResult<()> {
        facility.validate()?;

        let changed = self.conn.execute(
            "UPDATE facilities
             SET
                name = ?1,
                code = ?2,
                country = ?3,
                city = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                facility.name.as_str(),
                facility.code.as_str(),
                facility.country.as_str(),
                facility.city.as_str(),
                facility.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::FacilityNotFound(facility.id));
        }

        Ok(())
    }

    fn delete_facility(&self, id: FacilityId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM facilities WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::FacilityNotFound(id));
        }

        Ok(())
    }
}

/// Parses one `facilities` row; `carrier_ids` is left empty.
pub(crate) fn parse_facility_row(row: &Row<'_>) -> RepoResult<Facility> {
    let uuid_text: String = row.get("uuid")?;
    let facility = Facility {
        id: parse_uuid(&uuid_text, "facilities.uuid")?,
        name: row.get("name")?,
        code: row.get("code")?,
        country: row.get("country")?,
        city: row.get("city")?,
        carrier_ids: Vec::new(),
    };
    facility.validate()?;
    Ok(facility)
}

/// Loads the carriers that list `facility_id` in their membership set.
pub(crate) fn load_carrier_ids(
    conn: &Connection,
    facility_id: FacilityId,
) -> RepoResult<Vec<CarrierId>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT carrier_uuid
         FROM carrier_facilities
         WHERE facility_uuid = ?1
         ORDER BY carrier_uuid ASC;",
    )?;
    let mut rows = stmt.query([facility_id.to_string()])?;
    let mut carrier_ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        carrier_ids.push(parse_uuid(&value, "carrier_facilities.carrier_uuid")?);
    }
    Ok(carrier_ids)
}
