//! Query parameter objects for the provider operations

use chrono::{DateTime, Utc};
use domain::{Location, LocationTypes, ProductSet};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Free-text location suggestion query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestQuery {
    /// Partial name typed by the user
    pub text: String,
    /// Location types to include
    pub types: LocationTypes,
    /// Maximum suggestions, 0 for the backend default
    pub max_results: usize,
}

impl SuggestQuery {
    /// Suggest any kind of location for the text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            types: LocationTypes::ALL,
            max_results: 0,
        }
    }

    /// Restrict the location types
    #[must_use]
    pub const fn with_types(mut self, types: LocationTypes) -> Self {
        self.types = types;
        self
    }

    /// Limit the number of suggestions
    #[must_use]
    pub const fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

/// Locations around an anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyQuery {
    /// Coordinate or station to search around
    pub anchor: Location,
    /// Location types to include
    pub types: LocationTypes,
    /// Search radius in meters, 0 for the backend default
    pub max_distance_m: u32,
    /// Maximum results, 0 for the backend default
    pub max_results: usize,
}

impl NearbyQuery {
    /// Stations around the anchor
    #[must_use]
    pub const fn new(anchor: Location) -> Self {
        Self {
            anchor,
            types: LocationTypes::STATIONS,
            max_distance_m: 0,
            max_results: 0,
        }
    }

    #[must_use]
    pub const fn with_types(mut self, types: LocationTypes) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub const fn with_max_distance(mut self, meters: u32) -> Self {
        self.max_distance_m = meters;
        self
    }

    #[must_use]
    pub const fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// The anchor must carry a coordinate or an id
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.anchor.coordinate().is_none() && !self.anchor.is_identified() {
            return Err(ProviderError::precondition(
                "nearby anchor needs a coordinate or an id",
            ));
        }
        Ok(())
    }
}

/// Departures from a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeparturesQuery {
    /// Backend station id
    pub station_id: String,
    /// Earliest departure, `None` for now
    pub time: Option<DateTime<Utc>>,
    /// Maximum departures per stop, 0 for the backend default
    pub max_departures: usize,
    /// Return one block per physical sub-stop
    pub equivalent_stations: bool,
}

impl DeparturesQuery {
    #[must_use]
    pub fn new(station_id: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            time: None,
            max_departures: 0,
            equivalent_stations: false,
        }
    }

    #[must_use]
    pub const fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub const fn with_max_departures(mut self, max: usize) -> Self {
        self.max_departures = max;
        self
    }

    #[must_use]
    pub const fn with_equivalent_stations(mut self, equivalent: bool) -> Self {
        self.equivalent_stations = equivalent;
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.station_id.trim().is_empty() {
            return Err(ProviderError::precondition("station id is empty"));
        }
        Ok(())
    }
}

/// Routing preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimize {
    LeastDuration,
    LeastChanges,
    LeastWalking,
}

/// Walking pace for transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// Step-free access requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Neutral,
    Limited,
    BarrierFree,
}

/// Optional trip query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripOptions {
    /// Products to use, `None` for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<ProductSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize: Option<Optimize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_speed: Option<WalkSpeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
}

/// Itinerary query between two locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripsQuery {
    pub from: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<Location>,
    pub to: Location,
    /// Reference time
    pub time: DateTime<Utc>,
    /// Whether `time` is the departure (`true`) or arrival (`false`) time
    pub departure: bool,
    #[serde(default)]
    pub options: TripOptions,
}

impl TripsQuery {
    /// Depart from `from` at `time`
    #[must_use]
    pub fn departing(from: Location, to: Location, time: DateTime<Utc>) -> Self {
        Self {
            from,
            via: None,
            to,
            time,
            departure: true,
            options: TripOptions::default(),
        }
    }

    /// Arrive at `to` by `time`
    #[must_use]
    pub fn arriving(from: Location, to: Location, time: DateTime<Utc>) -> Self {
        Self {
            departure: false,
            ..Self::departing(from, to, time)
        }
    }

    #[must_use]
    pub fn with_via(mut self, via: Location) -> Self {
        self.via = Some(via);
        self
    }

    #[must_use]
    pub const fn with_products(mut self, products: ProductSet) -> Self {
        self.options.products = Some(products);
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: TripOptions) -> Self {
        self.options = options;
        self
    }

    /// Reject queries no backend could answer
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.options.products.is_some_and(ProductSet::is_empty) {
            return Err(ProviderError::precondition("product filter is empty"));
        }
        Ok(())
    }
}
