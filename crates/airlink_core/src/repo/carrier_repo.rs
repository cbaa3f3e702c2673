//! Carrier repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `carriers` table.
//! - Own the membership write path (`persist_carrier`) with atomic
//!   replace-the-whole-set semantics.
//!
//! # Invariants
//! - Carriers are always returned with their membership set fully loaded,
//!   ordered by `carrier_facilities.position`.
//! - `persist_carrier` rewrites descriptive fields and the whole membership
//!   set in a single `IMMEDIATE` transaction; on any error nothing changes.
//! - Concurrent persists of the same carrier are last-writer-wins.

use super::facility_repo::{load_carrier_ids, parse_facility_row};
use super::{ensure_tables, parse_uuid, RepoError, RepoResult};
use crate::model::carrier::{today, Carrier, CarrierId};
use crate::model::facility::Facility;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const CARRIER_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    founded_on,
    website
FROM carriers";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for carrier CRUD and membership persistence.
pub trait CarrierRepository {
    /// Inserts a carrier together with its initial membership set.
    fn create_carrier(&self, carrier: &Carrier) -> RepoResult<CarrierId>;
    /// Loads one carrier with its membership set materialized.
    fn get_carrier(&self, id: CarrierId) -> RepoResult<Option<Carrier>>;
    fn list_carriers(&self) -> RepoResult<Vec<Carrier>>;
    /// Updates descriptive fields only; memberships are left untouched.
    fn update_carrier_fields(&self, carrier: &Carrier) -> RepoResult<()>;
    fn delete_carrier(&self, id: CarrierId) -> RepoResult<()>;
    /// Commits the full carrier record, membership set included, and returns
    /// the stored representation.
    fn persist_carrier(&self, carrier: &Carrier) -> RepoResult<Carrier>;
}

impl<R: CarrierRepository + ?Sized> CarrierRepository for &R {
    fn create_carrier(&self, carrier: &Carrier) -> RepoResult<CarrierId> {
        (**self).create_carrier(carrier)
    }

    fn get_carrier(&self, id: CarrierId) -> RepoResult<Option<Carrier>> {
        (**self).get_carrier(id)
    }

    fn list_carriers(&self) -> RepoResult<Vec<Carrier>> {
        (**self).list_carriers()
    }

    fn update_carrier_fields(&self, carrier: &Carrier) -> RepoResult<()> {
        (**self).update_carrier_fields(carrier)
    }

    fn delete_carrier(&self, id: CarrierId) -> RepoResult<()> {
        (**self).delete_carrier(id)
    }

    fn persist_carrier(&self, carrier: &Carrier) -> RepoResult<Carrier> {
        (**self).persist_carrier(carrier)
    }
}

/// SQLite-backed carrier repository.
pub struct SqliteCarrierRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCarrierRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["carriers", "facilities", "carrier_facilities"])?;
        Ok(Self { conn })
    }

    fn read_back(&self, id: CarrierId) -> RepoResult<Carrier> {
        self.get_carrier(id)?.ok_or(RepoError::CarrierNotFound(id))
    }
}

impl CarrierRepository for SqliteCarrierRepository<'_> {
    fn create_carrier(&self, carrier: &Carrier) -> RepoResult<CarrierId> {
        carrier.validate(today())?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO carriers (uuid, name, description, founded_on, website)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                carrier.id.to_string(),
                carrier.name.as_str(),
                carrier.description.as_str(),
                format_date(carrier.founded_on),
                carrier.website.as_str(),
            ],
        )?;
        write_memberships(&tx, carrier)?;
        tx.commit()?;

        Ok(carrier.id)
    }

    fn get_carrier(&self, id: CarrierId) -> RepoResult<Option<Carrier>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARRIER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut carrier = parse_carrier_row(row)?;
            carrier.facilities = load_member_facilities(self.conn, carrier.id)?;
            return Ok(Some(carrier));
        }

        Ok(None)
    }

    fn list_carriers(&self) -> RepoResult<Vec<Carrier>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CARRIER_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut carriers = Vec::new();
        while let Some(row) = rows.next()? {
            let mut carrier = parse_carrier_row(row)?;
            carrier.facilities = load_member_facilities(self.conn, carrier.id)?;
            carriers.push(carrier);
        }

        Ok(carriers)
    }

    fn update_carrier_fields(&self, carrier: &Carrier) -> RepoResult<()> {
        carrier.validate(today())?;

        if update_fields(self.conn, carrier)? == 0 {
            return Err(RepoError::CarrierNotFound(carrier.id));
        }

        Ok(())
    }

    fn delete_carrier(&self, id: CarrierId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM carriers WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::CarrierNotFound(id));
        }

        Ok(())
    }

    fn persist_carrier(&self, carrier: &Carrier) -> RepoResult<Carrier> {
        carrier.validate(today())?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if update_fields(&tx, carrier)? == 0 {
            return Err(RepoError::CarrierNotFound(carrier.id));
        }
        tx.execute(
            "DELETE FROM carrier_facilities WHERE carrier_uuid = ?1;",
            [carrier.id.to_string()],
        )?;
        write_memberships(&tx, carrier)?;
        tx.commit()?;

        self.read_back(carrier.id)
    }
}

fn update_fields(conn: &Connection, carrier: &Carrier) -> RepoResult<usize> {
    let changed = conn.execute(
        "UPDATE carriers
         SET
            name = ?1,
            description = ?2,
            founded_on = ?3,
            website = ?4,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?5;",
        params![
            carrier.name.as_str(),
            carrier.description.as_str(),
            format_date(carrier.founded_on),
            carrier.website.as_str(),
            carrier.id.to_string(),
        ],
    )?;
    Ok(changed)
}

/// Inserts one join row per membership entry, in order.
///
/// Assumes existing rows for the carrier were already removed.
fn write_memberships(tx: &Transaction<'_>, carrier: &Carrier) -> RepoResult<()> {
    let carrier_id_text = carrier.id.to_string();
    for (position, facility) in carrier.facilities.iter().enumerate() {
        let position = i64::try_from(position).map_err(|_| {
            RepoError::InvalidData(format!("membership position {position} out of range"))
        })?;
        let inserted = tx.execute(
            "INSERT INTO carrier_facilities (carrier_uuid, position, facility_uuid)
             SELECT ?1, ?2, uuid
             FROM facilities
             WHERE uuid = ?3;",
            params![carrier_id_text.as_str(), position, facility.id.to_string()],
        )?;
        if inserted == 0 {
            return Err(RepoError::FacilityNotFound(facility.id));
        }
    }
    Ok(())
}

fn load_member_facilities(conn: &Connection, carrier_id: CarrierId) -> RepoResult<Vec<Facility>> {
    let mut stmt = conn.prepare(
        "SELECT
            f.uuid AS uuid,
            f.name AS name,
            f.code AS code,
            f.country AS country,
            f.city AS city
         FROM carrier_facilities cf
         INNER JOIN facilities f ON f.uuid = cf.facility_uuid
         WHERE cf.carrier_uuid = ?1
         ORDER BY cf.position ASC;",
    )?;
    let mut rows = stmt.query([carrier_id.to_string()])?;
    let mut facilities = Vec::new();
    while let Some(row) = rows.next()? {
        let mut facility = parse_facility_row(row)?;
        facility.carrier_ids = load_carrier_ids(conn, facility.id)?;
        facilities.push(facility);
    }
    Ok(facilities)
}

fn parse_carrier_row(row: &Row<'_>) -> RepoResult<Carrier> {
    let uuid_text: String = row.get("uuid")?;
    let founded_text: String = row.get("founded_on")?;
    let founded_on = NaiveDate::parse_from_str(&founded_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{founded_text}` in carriers.founded_on"
        ))
    })?;

    Ok(Carrier {
        id: parse_uuid(&uuid_text, "carriers.uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        founded_on,
        website: row.get("website")?,
        facilities: Vec::new(),
    })
}

fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}
