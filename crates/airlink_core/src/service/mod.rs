//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Map absent records to typed not-found errors.
//! - Keep callers decoupled from storage details.

pub mod association_service;
pub mod carrier_service;
pub mod error;
pub mod facility_service;
