//! # Cadence Core
//!
//! The domain layer of the Cadence scheduling registry.
//! This crate contains the post lifecycle, the query engine and the calendar
//! projection with zero infrastructure dependencies.

pub mod calendar;
pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod registry;

pub use error::DomainError;
pub use registry::PostRegistry;
