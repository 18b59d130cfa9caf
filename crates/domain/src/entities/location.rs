//! Location entity
//!
//! A place a user can depart from, arrive at, or be near. Equality is
//! structural so adapters can deduplicate suggestion lists.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::Point;

/// Kind of location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    /// Station or stop
    Station,
    /// Street address
    Address,
    /// Point of interest
    Poi,
    /// Bare coordinate
    Coord,
    /// Unresolved free-text reference, only a disambiguation candidate
    Any,
}

impl LocationType {
    /// Every location type
    pub const ALL: [Self; 5] = [
        Self::Station,
        Self::Address,
        Self::Poi,
        Self::Coord,
        Self::Any,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of location types used as a query filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationTypes(u8);

impl LocationTypes {
    /// No types
    pub const NONE: Self = Self(0);
    /// Stations only
    pub const STATIONS: Self = Self(LocationType::Station.bit());
    /// Every type
    pub const ALL: Self = Self(0b1_1111);

    /// Return the set with the type added
    #[must_use]
    pub const fn with(self, location_type: LocationType) -> Self {
        Self(self.0 | location_type.bit())
    }

    /// Whether the type is in the set
    #[must_use]
    pub const fn contains(self, location_type: LocationType) -> bool {
        self.0 & location_type.bit() != 0
    }

    /// Whether the set is empty
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<LocationType> for LocationTypes {
    fn from_iter<I: IntoIterator<Item = LocationType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// A station, address, POI, coordinate or unresolved place reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LocationParts", into = "LocationParts")]
pub struct Location {
    location_type: LocationType,
    id: Option<String>,
    coord: Option<Point>,
    place: Option<String>,
    name: Option<String>,
}

impl Location {
    /// Create a location, checking that its fields fit its type
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` if a COORD lacks a coordinate, a STATION
    /// lacks an id, or an ANY carries an id or a coordinate.
    pub fn new(
        location_type: LocationType,
        id: Option<String>,
        coord: Option<Point>,
        place: Option<String>,
        name: Option<String>,
    ) -> Result<Self, DomainError> {
        let id = id.filter(|id| !id.is_empty());
        match location_type {
            LocationType::Coord if coord.is_none() => {
                return Err(DomainError::invalid_location(
                    "coordinate location without coordinate",
                ));
            },
            LocationType::Station if id.is_none() => {
                return Err(DomainError::invalid_location("station without id"));
            },
            LocationType::Any if id.is_some() || coord.is_some() => {
                return Err(DomainError::invalid_location(
                    "unresolved location may only carry a name",
                ));
            },
            _ => {},
        }

        Ok(Self {
            location_type,
            id,
            coord,
            place: place.filter(|p| !p.is_empty()),
            name: name.filter(|n| !n.is_empty()),
        })
    }

    /// Station with the given id
    #[must_use]
    pub fn station(id: impl Into<String>) -> Self {
        Self {
            location_type: LocationType::Station,
            id: Some(id.into()),
            coord: None,
            place: None,
            name: None,
        }
    }

    /// Bare coordinate
    #[must_use]
    pub const fn coord(point: Point) -> Self {
        Self {
            location_type: LocationType::Coord,
            id: None,
            coord: Some(point),
            place: None,
            name: None,
        }
    }

    /// Unresolved free-text reference
    #[must_use]
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            location_type: LocationType::Any,
            id: None,
            coord: None,
            place: None,
            name: Some(name.into()),
        }
    }

    /// Set the coordinate (ignored for ANY locations)
    #[must_use]
    pub fn with_coord(mut self, point: Point) -> Self {
        if self.location_type != LocationType::Any {
            self.coord = Some(point);
        }
        self
    }

    /// Set the place (e.g. city)
    #[must_use]
    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Kind of location
    #[must_use]
    pub const fn location_type(&self) -> LocationType {
        self.location_type
    }

    /// Backend-specific identifier
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Coordinate, if known
    #[must_use]
    pub const fn coordinate(&self) -> Option<Point> {
        self.coord
    }

    /// Place (e.g. city)
    #[must_use]
    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the location carries a backend identifier
    #[must_use]
    pub const fn is_identified(&self) -> bool {
        self.id.is_some()
    }

    /// Whether the location is still an unresolved reference
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.location_type == LocationType::Any
    }

    /// Name without place, falling back to the id or coordinate
    #[must_use]
    pub fn unique_short_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(id) = &self.id {
            return id.clone();
        }
        self.coord.map(|c| c.to_string()).unwrap_or_default()
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        if self.location_type != other.location_type {
            return false;
        }
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.coord == other.coord && self.name == other.name,
            _ => false,
        }
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.location_type.hash(state);
        if let Some(id) = &self.id {
            id.hash(state);
        } else {
            self.coord.hash(state);
            self.name.hash(state);
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.place, &self.name) {
            (Some(place), Some(name)) => write!(f, "{name}, {place}"),
            _ => write!(f, "{}", self.unique_short_name()),
        }
    }
}

/// Serialized form; deserialization re-runs the constructor checks
#[derive(Serialize, Deserialize)]
struct LocationParts {
    location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coord: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl TryFrom<LocationParts> for Location {
    type Error = DomainError;

    fn try_from(parts: LocationParts) -> Result<Self, Self::Error> {
        Self::new(
            parts.location_type,
            parts.id,
            parts.coord,
            parts.place,
            parts.name,
        )
    }
}

impl From<Location> for LocationParts {
    fn from(location: Location) -> Self {
        Self {
            location_type: location.location_type,
            id: location.id,
            coord: location.coord,
            place: location.place,
            name: location.name,
        }
    }
}

/// A location proposed for free-text input, ranked by priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedLocation {
    /// The suggested location
    pub location: Location,
    /// Higher ranks first
    #[serde(default)]
    pub priority: i32,
}

impl SuggestedLocation {
    /// Create a suggestion
    #[must_use]
    pub const fn new(location: Location, priority: i32) -> Self {
        Self { location, priority }
    }
}
