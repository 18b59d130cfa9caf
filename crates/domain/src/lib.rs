//! Domain layer for transit-normalize
//!
//! Contains the canonical transit entity model, fixed-point coordinates,
//! the polyline geometry codec and domain errors. This layer performs no
//! I/O and defines the vocabulary every provider adapter maps into.

#![forbid(unsafe_code)]

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
