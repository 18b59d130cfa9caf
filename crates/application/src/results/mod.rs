//! Status taxonomies and per-operation result types
//!
//! Results keep their fields private so a non-OK status can never be
//! paired with a payload.

mod departures;
mod header;
mod locations;
mod status;
mod trips;

pub use departures::QueryDeparturesResult;
pub use header::ResultHeader;
pub use locations::{NearbyLocationsResult, SuggestLocationsResult};
pub use status::{DeparturesStatus, NearbyLocationsStatus, SuggestLocationsStatus, TripsStatus};
pub use trips::QueryTripsResult;
