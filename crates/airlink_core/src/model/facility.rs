//! Facility domain model.
//!
//! # Responsibility
//! - Define the canonical facility record owned by the facility store.
//! - Validate descriptive fields before they reach persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another facility.
//! - `code` is exactly three characters long.
//! - `carrier_ids` is a storage-derived mirror of carrier memberships and is
//!   never written back by callers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use super::carrier::CarrierId;

/// Stable identifier for a facility record.
pub type FacilityId = Uuid;

/// Required length of a facility code, in characters.
pub const FACILITY_CODE_LEN: usize = 3;

/// Validation errors for facility field invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityValidationError {
    NilId,
    BlankField(&'static str),
    InvalidCode(String),
}

impl Display for FacilityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "facility id must not be nil"),
            Self::BlankField(field) => write!(f, "facility {field} must not be blank"),
            Self::InvalidCode(code) => write!(
                f,
                "facility code must be exactly {FACILITY_CODE_LEN} characters, got `{code}`"
            ),
        }
    }
}

impl Error for FacilityValidationError {}

/// Canonical facility record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    /// Three-character facility code, e.g. `JFK`.
    pub code: String,
    pub country: String,
    pub city: String,
    /// Carriers currently associated with this facility.
    ///
    /// Filled on read from the membership join table. Writes ignore it.
    #[serde(default)]
    pub carrier_ids: Vec<CarrierId>,
}

impl Facility {
    /// Creates a facility with a generated stable ID and no carriers.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        country: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            code: code.into(),
            country: country.into(),
            city: city.into(),
            carrier_ids: Vec::new(),
        }
    }

    /// Validates descriptive fields.
    pub fn validate(&self) -> Result<(), FacilityValidationError> {
        if self.id.is_nil() {
            return Err(FacilityValidationError::NilId);
        }
        validate_not_blank("name", &self.name)?;
        validate_code(&self.code)?;
        validate_not_blank("country", &self.country)?;
        validate_not_blank("city", &self.city)?;
        Ok(())
    }
}

/// Checks the exact-length facility code rule.
pub fn validate_code(code: &str) -> Result<(), FacilityValidationError> {
    if code.chars().count() != FACILITY_CODE_LEN {
        return Err(FacilityValidationError::InvalidCode(code.to_string()));
    }
    Ok(())
}

fn validate_not_blank(field: &'static str, value: &str) -> Result<(), FacilityValidationError> {
    if value.trim().is_empty() {
        return Err(FacilityValidationError::BlankField(field));
    }
    Ok(())
}
