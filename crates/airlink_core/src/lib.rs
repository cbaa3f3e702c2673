//! Core domain logic for airlink.
//! Carriers, facilities, and the membership relation between them.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status};
pub use model::carrier::{Carrier, CarrierId, CarrierValidationError};
pub use model::facility::{Facility, FacilityId, FacilityValidationError};
pub use repo::carrier_repo::{CarrierRepository, SqliteCarrierRepository};
pub use repo::facility_repo::{FacilityRepository, SqliteFacilityRepository};
pub use repo::{RepoError, RepoResult};
pub use service::association_service::AssociationService;
pub use service::carrier_service::{CarrierPatch, CarrierService, NewCarrier};
pub use service::error::{ServiceError, ServiceResult};
pub use service::facility_service::{FacilityPatch, FacilityService, NewFacility};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
