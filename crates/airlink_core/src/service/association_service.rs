//! Carrier/facility membership service.
//!
//! # Responsibility
//! - Add, list, fetch, bulk-replace and remove facilities in a carrier's
//!   membership set.
//! - Check referenced records against both stores before any write.
//!
//! # Invariants
//! - `add_facility` never inserts a facility id that is already a member and
//!   skips persistence entirely in that case.
//! - `replace_facilities` resolves every id before committing; one missing
//!   facility aborts the call with no persisted change.
//! - Every mutation ends in exactly one `persist_carrier` call.
//! - The facility-side carrier mirror is never written here.
//!
//! No locking is taken between load and persist. Two callers mutating the
//! same carrier concurrently race and the last persist wins.

use crate::model::carrier::{Carrier, CarrierId};
use crate::model::facility::{Facility, FacilityId};
use crate::repo::carrier_repo::CarrierRepository;
use crate::repo::facility_repo::FacilityRepository;
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info, warn};

/// Membership facade over the carrier and facility stores.
pub struct AssociationService<C: CarrierRepository, F: FacilityRepository> {
    carriers: C,
    facilities: F,
}

impl<C: CarrierRepository, F: FacilityRepository> AssociationService<C, F> {
    /// Creates a service from the two store implementations.
    pub fn new(carriers: C, facilities: F) -> Self {
        Self {
            carriers,
            facilities,
        }
    }

    /// Associates a facility with a carrier.
    ///
    /// # Contract
    /// - Fails with `CarrierNotFound` / `FacilityNotFound` when either record
    ///   is absent.
    /// - Returns the carrier unchanged, without persisting, when the facility
    ///   is already a member.
    pub fn add_facility(
        &self,
        carrier_id: CarrierId,
        facility_id: FacilityId,
    ) -> ServiceResult<Carrier> {
        let mut carrier = self.load_carrier(carrier_id)?;
        let facility = self.load_facility(facility_id)?;

        if carrier.has_facility(facility.id) {
            debug!(
                "event=membership_add module=association status=noop carrier_id={carrier_id} facility_id={facility_id}"
            );
            return Ok(carrier);
        }

        carrier.facilities.push(facility);
        let stored = self.carriers.persist_carrier(&carrier)?;
        info!(
            "event=membership_add module=association status=ok carrier_id={carrier_id} facility_id={facility_id} members={}",
            stored.facilities.len()
        );
        Ok(stored)
    }

    /// Returns the carrier's membership set in stored order.
    pub fn list_facilities(&self, carrier_id: CarrierId) -> ServiceResult<Vec<Facility>> {
        Ok(self.load_carrier(carrier_id)?.facilities)
    }

    /// Returns one member facility of the carrier.
    ///
    /// Fails with `MembershipNotFound` when the facility is not a member,
    /// whether or not it exists in the facility store.
    pub fn get_facility(
        &self,
        carrier_id: CarrierId,
        facility_id: FacilityId,
    ) -> ServiceResult<Facility> {
        self.load_carrier(carrier_id)?
            .facility(facility_id)
            .cloned()
            .ok_or(ServiceError::MembershipNotFound {
                carrier_id,
                facility_id,
            })
    }

    /// Replaces the whole membership set with `facility_ids`, in order.
    ///
    /// # Contract
    /// - Lookups run sequentially and stop at the first missing facility,
    ///   which is reported as `FacilityNotFound` with nothing persisted.
    /// - Input duplicates are kept as given.
    pub fn replace_facilities(
        &self,
        carrier_id: CarrierId,
        facility_ids: &[FacilityId],
    ) -> ServiceResult<Carrier> {
        let mut carrier = self.load_carrier(carrier_id)?;

        let resolved = facility_ids
            .iter()
            .map(|&facility_id| self.load_facility(facility_id))
            .collect::<ServiceResult<Vec<_>>>();
        let facilities = match resolved {
            Ok(facilities) => facilities,
            Err(err) => {
                warn!(
                    "event=membership_replace module=association status=aborted carrier_id={carrier_id} error={err}"
                );
                return Err(err);
            }
        };

        carrier.facilities = facilities;
        let stored = self.carriers.persist_carrier(&carrier)?;
        info!(
            "event=membership_replace module=association status=ok carrier_id={carrier_id} members={}",
            stored.facilities.len()
        );
        Ok(stored)
    }

    /// Removes one facility from the carrier's membership set.
    ///
    /// # Contract
    /// - The facility must exist in the facility store (`FacilityNotFound`)
    ///   and be a member (`MembershipNotFound`).
    /// - Only the first matching entry is removed.
    pub fn remove_facility(
        &self,
        carrier_id: CarrierId,
        facility_id: FacilityId,
    ) -> ServiceResult<Carrier> {
        let mut carrier = self.load_carrier(carrier_id)?;
        let facility = self.load_facility(facility_id)?;

        let position =
            carrier
                .facility_position(facility.id)
                .ok_or(ServiceError::MembershipNotFound {
                    carrier_id,
                    facility_id,
                })?;
        carrier.facilities.remove(position);

        let stored = self.carriers.persist_carrier(&carrier)?;
        info!(
            "event=membership_remove module=association status=ok carrier_id={carrier_id} facility_id={facility_id} members={}",
            stored.facilities.len()
        );
        Ok(stored)
    }

    fn load_carrier(&self, carrier_id: CarrierId) -> ServiceResult<Carrier> {
        self.carriers
            .get_carrier(carrier_id)?
            .ok_or(ServiceError::CarrierNotFound(carrier_id))
    }

    fn load_facility(&self, facility_id: FacilityId) -> ServiceResult<Facility> {
        self.facilities
            .get_facility(facility_id)?
            .ok_or(ServiceError::FacilityNotFound(facility_id))
    }
}
