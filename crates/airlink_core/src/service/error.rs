//! Service-level error type.
//!
//! Services expose two semantic kinds to callers: not-found and validation.
//! Storage transport failures pass through unchanged as `Repo`.

use crate::model::carrier::CarrierId;
use crate::model::facility::FacilityId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from carrier, facility and association services.
#[derive(Debug)]
pub enum ServiceError {
    /// No carrier with this id.
    CarrierNotFound(CarrierId),
    /// No facility with this id.
    FacilityNotFound(FacilityId),
    /// Both records exist but the facility is not in the carrier's
    /// membership set.
    MembershipNotFound {
        carrier_id: CarrierId,
        facility_id: FacilityId,
    },
    /// Field validation failed.
    Validation(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns whether this error signals a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CarrierNotFound(_) | Self::FacilityNotFound(_) | Self::MembershipNotFound { .. }
        )
    }

    /// Returns whether this error signals rejected input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CarrierNotFound(id) => write!(f, "carrier not found: {id}"),
            Self::FacilityNotFound(id) => write!(f, "facility not found: {id}"),
            Self::MembershipNotFound {
                carrier_id,
                facility_id,
            } => write!(
                f,
                "facility {facility_id} is not associated with carrier {carrier_id}"
            ),
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CarrierNotFound(id) => Self::CarrierNotFound(id),
            RepoError::FacilityNotFound(id) => Self::FacilityNotFound(id),
            RepoError::CarrierValidation(err) => Self::Validation(err.to_string()),
            RepoError::FacilityValidation(err) => Self::Validation(err.to_string()),
            other => Self::Repo(other),
        }
    }
}
