//! Carrier domain model.
//!
//! # Responsibility
//! - Define the canonical carrier record and its embedded membership set.
//! - Provide membership lookup helpers used by the association service.
//!
//! # Invariants
//! - `id` is stable and never reused for another carrier.
//! - `founded_on` is never later than the validation reference date.
//! - `facilities` keeps insertion order; `add` paths never insert the same
//!   facility id twice.
//!
//! # See also
//! - crate::service::association_service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;
use uuid::Uuid;

use super::facility::{Facility, FacilityId};

/// Stable identifier for a carrier record.
pub type CarrierId = Uuid;

/// Validation errors for carrier field invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierValidationError {
    NilId,
    BlankField(&'static str),
    FoundedInFuture {
        founded_on: NaiveDate,
        today: NaiveDate,
    },
    InvalidWebsite(String),
}

impl Display for CarrierValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "carrier id must not be nil"),
            Self::BlankField(field) => write!(f, "carrier {field} must not be blank"),
            Self::FoundedInFuture { founded_on, today } => write!(
                f,
                "founding date {founded_on} must not be after {today}"
            ),
            Self::InvalidWebsite(value) => write!(f, "invalid carrier website `{value}`"),
        }
    }
}

impl Error for CarrierValidationError {}

/// Canonical carrier record including its facility memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: CarrierId,
    pub name: String,
    pub description: String,
    /// Serialized as `YYYY-MM-DD`.
    pub founded_on: NaiveDate,
    pub website: String,
    /// Ordered membership set.
    #[serde(default)]
    pub facilities: Vec<Facility>,
}

impl Carrier {
    /// Creates a carrier with a generated stable ID and an empty membership set.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        founded_on: NaiveDate,
        website: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            founded_on,
            website: website.into(),
            facilities: Vec::new(),
        }
    }

    /// Returns whether `facility_id` is in the membership set.
    pub fn has_facility(&self, facility_id: FacilityId) -> bool {
        self.facility_position(facility_id).is_some()
    }

    /// Returns the member facility with `facility_id`, if any.
    pub fn facility(&self, facility_id: FacilityId) -> Option<&Facility> {
        self.facilities
            .iter()
            .find(|facility| facility.id == facility_id)
    }

    /// Returns the index of the first membership entry for `facility_id`.
    pub fn facility_position(&self, facility_id: FacilityId) -> Option<usize> {
        self.facilities
            .iter()
            .position(|facility| facility.id == facility_id)
    }

    /// Member facility ids in membership order.
    pub fn facility_ids(&self) -> Vec<FacilityId> {
        self.facilities.iter().map(|facility| facility.id).collect()
    }

    /// Validates descriptive fields against `today`.
    ///
    /// Membership entries are not validated here; they are checked against
    /// the facility store when they are added.
    pub fn validate(&self, today: NaiveDate) -> Result<(), CarrierValidationError> {
        if self.id.is_nil() {
            return Err(CarrierValidationError::NilId);
        }
        validate_not_blank("name", &self.name)?;
        validate_not_blank("description", &self.description)?;
        validate_founded_on(self.founded_on, today)?;
        validate_website(&self.website)?;
        Ok(())
    }
}

/// Current local calendar date, the default reference for `validate`.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Rejects founding dates later than `today`.
pub fn validate_founded_on(
    founded_on: NaiveDate,
    today: NaiveDate,
) -> Result<(), CarrierValidationError> {
    if founded_on > today {
        return Err(CarrierValidationError::FoundedInFuture { founded_on, today });
    }
    Ok(())
}

/// Accepts absolute `http`/`https` URLs with a host and no surrounding
/// whitespace.
pub fn validate_website(value: &str) -> Result<(), CarrierValidationError> {
    let invalid = || CarrierValidationError::InvalidWebsite(value.to_string());
    if value.trim() != value {
        return Err(invalid());
    }
    let parsed = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

fn validate_not_blank(field: &'static str, value: &str) -> Result<(), CarrierValidationError> {
    if value.trim().is_empty() {
        return Err(CarrierValidationError::BlankField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_founded_on, validate_website, Carrier, CarrierValidationError};
    use crate::model::facility::Facility;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn founding_date_today_is_accepted() {
        assert!(validate_founded_on(date(2024, 5, 1), date(2024, 5, 1)).is_ok());
        assert!(validate_founded_on(date(2024, 5, 2), date(2024, 5, 1)).is_err());
    }

    #[test]
    fn website_requires_http_scheme_and_host() {
        assert!(validate_website("https://www.aa.com").is_ok());
        assert!(validate_website("http://example.org/path").is_ok());
        assert!(validate_website("ftp://example.org").is_err());
        assert!(validate_website("not a url").is_err());
        assert!(validate_website("mailto:ops@example.org").is_err());
        assert!(validate_website(" https://www.aa.com ").is_err());
        assert!(validate_website("https://www.aa.com\n").is_err());
    }

    #[test]
    fn membership_helpers_find_by_id() {
        let mut carrier = Carrier::new(
            "American Airlines",
            "Major US airline",
            date(1934, 4, 15),
            "https://www.aa.com",
        );
        let jfk = Facility::new("John F. Kennedy", "JFK", "United States", "New York");
        let lax = Facility::new("Los Angeles", "LAX", "United States", "Los Angeles");
        carrier.facilities.push(jfk.clone());
        carrier.facilities.push(lax.clone());

        assert!(carrier.has_facility(lax.id));
        assert_eq!(carrier.facility_position(lax.id), Some(1));
        assert_eq!(carrier.facility(jfk.id).map(|f| f.code.as_str()), Some("JFK"));
        assert_eq!(carrier.facility_ids(), vec![jfk.id, lax.id]);
    }

    #[test]
    fn validate_reports_blank_description() {
        let carrier = Carrier::new("Delta", " ", date(1925, 5, 30), "https://delta.com");
        assert_eq!(
            carrier.validate(date(2024, 1, 1)),
            Err(CarrierValidationError::BlankField("description"))
        );
    }
}
