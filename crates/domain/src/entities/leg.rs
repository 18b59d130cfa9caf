//! Trip legs
//!
//! A leg is either a ride on a public transit line or an individual
//! (non-transit) segment such as a walk or a transfer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::line::Line;
use super::location::Location;
use super::stop::Stop;
use crate::errors::DomainError;
use crate::value_objects::Point;

/// Kind of individual leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndividualKind {
    /// Walking
    Walk,
    /// Cycling
    Bike,
    /// Driving
    Car,
    /// In-station transfer
    Transfer,
}

/// A ride on a public transit line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicLeg {
    /// Line ridden
    pub line: Line,
    /// Destination shown on the vehicle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Boarding stop
    pub departure_stop: Stop,
    /// Alighting stop
    pub arrival_stop: Stop,
    /// Stops passed between boarding and alighting, in travel order
    #[serde(default)]
    pub intermediate_stops: Vec<Stop>,
    /// Route geometry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Point>,
    /// Service message (e.g. "service cancelled")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PublicLeg {
    /// Create a public leg
    ///
    /// # Errors
    ///
    /// Returns `MissingTime` if the boarding stop has no departure time or the
    /// alighting stop has no arrival time.
    pub fn new(line: Line, departure_stop: Stop, arrival_stop: Stop) -> Result<Self, DomainError> {
        if departure_stop.departure_time().is_none() {
            return Err(DomainError::MissingTime(format!(
                "departure at {}",
                departure_stop.location
            )));
        }
        if arrival_stop.arrival_time().is_none() {
            return Err(DomainError::MissingTime(format!(
                "arrival at {}",
                arrival_stop.location
            )));
        }
        Ok(Self {
            line,
            destination: None,
            departure_stop,
            arrival_stop,
            intermediate_stops: Vec::new(),
            path: Vec::new(),
            message: None,
        })
    }

    /// Set the destination label
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Set intermediate stops, ordered by sequence/index
    #[must_use]
    pub fn with_intermediate_stops(mut self, mut stops: Vec<Stop>) -> Self {
        stops.sort_by_key(Stop::ordinal);
        self.intermediate_stops = stops;
        self
    }

    /// Set the route geometry
    #[must_use]
    pub fn with_path(mut self, path: Vec<Point>) -> Self {
        self.path = path;
        self
    }

    /// Set the service message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether boarding or alighting was cancelled
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.departure_stop.departure_cancelled || self.arrival_stop.arrival_cancelled
    }
}

/// A non-transit segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualLeg {
    /// How the segment is travelled
    pub kind: IndividualKind,
    /// Start of the segment
    pub departure_stop: Stop,
    /// End of the segment
    pub arrival_stop: Stop,
    /// Distance in meters (0 when unknown)
    #[serde(default)]
    pub distance_m: u32,
    /// Route geometry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Point>,
}

impl IndividualLeg {
    /// Create an individual leg between two locations
    #[must_use]
    pub fn new(
        kind: IndividualKind,
        departure: Location,
        departure_time: DateTime<Utc>,
        arrival: Location,
        arrival_time: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            departure_stop: Stop::new(departure).with_departure(Some(departure_time), None),
            arrival_stop: Stop::new(arrival).with_arrival(Some(arrival_time), None),
            distance_m: 0,
            path: Vec::new(),
        }
    }

    /// Set the distance
    #[must_use]
    pub const fn with_distance(mut self, distance_m: u32) -> Self {
        self.distance_m = distance_m;
        self
    }

    /// Set the route geometry
    #[must_use]
    pub fn with_path(mut self, path: Vec<Point>) -> Self {
        self.path = path;
        self
    }
}

/// One atomic segment of a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Leg {
    /// Transit ride
    Public(PublicLeg),
    /// Walk, transfer or other non-transit segment
    Individual(IndividualLeg),
}

impl Leg {
    /// Boarding / start stop
    #[must_use]
    pub const fn departure_stop(&self) -> &Stop {
        match self {
            Self::Public(leg) => &leg.departure_stop,
            Self::Individual(leg) => &leg.departure_stop,
        }
    }

    /// Alighting / end stop
    #[must_use]
    pub const fn arrival_stop(&self) -> &Stop {
        match self {
            Self::Public(leg) => &leg.arrival_stop,
            Self::Individual(leg) => &leg.arrival_stop,
        }
    }

    /// Start location
    #[must_use]
    pub const fn departure(&self) -> &Location {
        &self.departure_stop().location
    }

    /// End location
    #[must_use]
    pub const fn arrival(&self) -> &Location {
        &self.arrival_stop().location
    }

    /// Effective departure time
    ///
    /// Public legs are validated to carry one at construction; individual
    /// legs always do.
    #[must_use]
    pub fn departure_time(&self) -> Option<DateTime<Utc>> {
        self.departure_stop().departure_time()
    }

    /// Effective arrival time
    #[must_use]
    pub fn arrival_time(&self) -> Option<DateTime<Utc>> {
        self.arrival_stop().arrival_time()
    }

    /// Route geometry, possibly empty
    #[must_use]
    pub fn path(&self) -> &[Point] {
        match self {
            Self::Public(leg) => &leg.path,
            Self::Individual(leg) => &leg.path,
        }
    }

    /// The public leg, if this is one
    #[must_use]
    pub const fn as_public(&self) -> Option<&PublicLeg> {
        match self {
            Self::Public(leg) => Some(leg),
            Self::Individual(_) => None,
        }
    }

    /// Whether this is a transit ride
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Public(_))
    }
}

impl From<PublicLeg> for Leg {
    fn from(leg: PublicLeg) -> Self {
        Self::Public(leg)
    }
}

impl From<IndividualLeg> for Leg {
    fn from(leg: IndividualLeg) -> Self {
        Self::Individual(leg)
    }
}
