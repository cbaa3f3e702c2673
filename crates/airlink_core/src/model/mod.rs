//! Core domain model definitions.
//!
//! # Responsibility
//! - Define the carrier and facility records shared by repositories and
//!   services.
//! - Keep field validation close to the data it protects.
//!
//! # See also
//! - crate::repo

pub mod carrier;
pub mod facility;
