//! Port definitions for application layer
//!
//! Ports are interfaces that define how callers reach transit backends.
//! Adapters in the integration crates implement these ports.

mod queries;
mod transit_provider;

pub use queries::{
    Accessibility, DeparturesQuery, NearbyQuery, Optimize, SuggestQuery, TripOptions, TripsQuery,
    WalkSpeed,
};
#[cfg(test)]
pub use transit_provider::MockTransitProvider;
pub use transit_provider::{Capability, TransitProvider};
