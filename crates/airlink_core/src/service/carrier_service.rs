//! Carrier use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list/delete entry points for carriers.
//! - Turn absent lookups into `ServiceError::CarrierNotFound`.
//!
//! # Invariants
//! - Carriers are created with an empty membership set.
//! - Field updates never touch memberships; those belong to
//!   `AssociationService`.

use crate::model::carrier::{Carrier, CarrierId};
use crate::repo::carrier_repo::CarrierRepository;
use crate::service::error::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::info;

/// Input for creating a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCarrier {
    pub name: String,
    pub description: String,
    pub founded_on: NaiveDate,
    pub website: String,
}

/// Partial update for a carrier; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub founded_on: Option<NaiveDate>,
    pub website: Option<String>,
}

/// Carrier service facade over repository implementations.
pub struct CarrierService<R: CarrierRepository> {
    repo: R,
}

impl<R: CarrierRepository> CarrierService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all carriers with their memberships.
    pub fn find_all(&self) -> ServiceResult<Vec<Carrier>> {
        Ok(self.repo.list_carriers()?)
    }

    /// Gets one carrier, failing with `CarrierNotFound` when absent.
    pub fn find_one(&self, id: CarrierId) -> ServiceResult<Carrier> {
        self.repo
            .get_carrier(id)?
            .ok_or(ServiceError::CarrierNotFound(id))
    }

    /// Stores a new carrier. Field rules are enforced by the repository.
    pub fn create(&self, input: NewCarrier) -> ServiceResult<Carrier> {
        let carrier = Carrier::new(
            input.name,
            input.description,
            input.founded_on,
            input.website,
        );
        let id = self.repo.create_carrier(&carrier)?;
        info!("event=carrier_create module=carrier status=ok carrier_id={id}");
        self.find_one(id)
    }

    /// Applies a partial update to an existing carrier.
    pub fn update(&self, id: CarrierId, patch: CarrierPatch) -> ServiceResult<Carrier> {
        let mut carrier = self.find_one(id)?;
        if let Some(founded_on) = patch.founded_on {
            carrier.founded_on = founded_on;
        }
        if let Some(name) = patch.name {
            carrier.name = name;
        }
        if let Some(description) = patch.description {
            carrier.description = description;
        }
        if let Some(website) = patch.website {
            carrier.website = website;
        }

        self.repo.update_carrier_fields(&carrier)?;
        info!("event=carrier_update module=carrier status=ok carrier_id={id}");
        self.find_one(id)
    }

    /// Deletes a carrier together with its memberships.
    pub fn delete(&self, id: CarrierId) -> ServiceResult<()> {
        self.find_one(id)?;
        self.repo.delete_carrier(id)?;
        info!("event=carrier_delete module=carrier status=ok carrier_id={id}");
        Ok(())
    }
}
