//! Facility use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for facilities.
//! - Turn absent lookups into `ServiceError::FacilityNotFound`.
//!
//! # Invariants
//! - Updates use partial-patch semantics; unset patch fields keep their value.
//! - The carrier mirror is read-only here.

use crate::model::facility::{Facility, FacilityId};
use crate::repo::facility_repo::FacilityRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

/// Input for creating a facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFacility {
    pub name: String,
    pub code: String,
    pub country: String,
    pub city: String,
}

/// Partial update for a facility; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilityPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Facility service facade over repository implementations.
pub struct FacilityService<R: FacilityRepository> {
    repo: R,
}

impl<R: FacilityRepository> FacilityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all facilities ordered by name.
    pub fn find_all(&self) -> ServiceResult<Vec<Facility>> {
        Ok(self.repo.list_facilities()?)
    }

    /// Gets one facility, failing with `FacilityNotFound` when absent.
    pub fn find_one(&self, id: FacilityId) -> ServiceResult<Facility> {
        self.repo
            .get_facility(id)?
            .ok_or(ServiceError::FacilityNotFound(id))
    }

    /// Stores a new facility. Field rules are enforced by the repository.
    pub fn create(&self, input: NewFacility) -> ServiceResult<Facility> {
        let facility = Facility::new(input.name, input.code, input.country, input.city);
        let id = self.repo.create_facility(&facility)?;
        info!("event=facility_create module=facility status=ok facility_id={id}");
        self.find_one(id)
    }

    /// Applies a partial update to an existing facility.
    pub fn update(&self, id: FacilityId, patch: FacilityPatch) -> ServiceResult<Facility> {
        let mut facility = self.find_one(id)?;
        if let Some(code) = patch.code {
            facility.code = code;
        }
        if let Some(name) = patch.name {
            facility.name = name;
        }
        if let Some(country) = patch.country {
            facility.country = country;
        }
        if let Some(city) = patch.city {
            facility.city = city;
        }

        self.repo.update_facility(&facility)?;
        info!("event=facility_update module=facility status=ok facility_id={id}");
        self.find_one(id)
    }

    /// Deletes a facility; its memberships disappear with it.
    pub fn delete(&self, id: FacilityId) -> ServiceResult<()> {
        self.find_one(id)?;
        self.repo.delete_facility(id)?;
        info!("event=facility_delete module=facility status=ok facility_id={id}");
        Ok(())
    }
}
