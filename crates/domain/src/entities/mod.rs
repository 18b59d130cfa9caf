//! Domain entities - immutable values produced by provider adapters

mod departure;
mod leg;
mod line;
mod location;
mod stop;
mod trip;

pub use departure::{Departure, LineDestination, StationDepartures};
pub use leg::{IndividualKind, IndividualLeg, Leg, PublicLeg};
pub use line::Line;
pub use location::{Location, LocationType, LocationTypes, SuggestedLocation};
pub use stop::Stop;
pub use trip::Trip;
