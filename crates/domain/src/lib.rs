//! Domain layer for the route planner
//!
//! Contains the geographic value objects, the stop list, route requests and
//! results, and the derived trip figures shown to the user.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
