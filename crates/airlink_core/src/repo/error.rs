//! Repository error type shared by carrier and facility stores.

use crate::db::DbError;
use crate::model::carrier::{CarrierId, CarrierValidationError};
use crate::model::facility::{FacilityId, FacilityValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    CarrierValidation(CarrierValidationError),
    FacilityValidation(FacilityValidationError),
    Db(DbError),
    CarrierNotFound(CarrierId),
    FacilityNotFound(FacilityId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CarrierValidation(err) => write!(f, "{err}"),
            Self::FacilityValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CarrierNotFound(id) => write!(f, "carrier not found: {id}"),
            Self::FacilityNotFound(id) => write!(f, "facility not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CarrierValidation(err) => Some(err),
            Self::FacilityValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CarrierValidationError> for RepoError {
    fn from(value: CarrierValidationError) -> Self {
        Self::CarrierValidation(value)
    }
}

impl From<FacilityValidationError> for RepoError {
    fn from(value: FacilityValidationError) -> Self {
        Self::FacilityValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
