//! Location suggestion and nearby results

use domain::{Location, SuggestedLocation};
use serde::{Deserialize, Serialize};

use super::header::ResultHeader;
use super::status::{NearbyLocationsStatus, SuggestLocationsStatus};

/// Result of a location suggestion query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestLocationsResult {
    header: ResultHeader,
    status: SuggestLocationsStatus,
    suggested_locations: Vec<SuggestedLocation>,
}

impl SuggestLocationsResult {
    /// Create an OK result, ordering suggestions by descending priority
    ///
    /// Suggestions with equal priority keep their backend order, and
    /// repeated locations keep only their first occurrence.
    #[must_use]
    pub fn ok(header: ResultHeader, suggestions: Vec<SuggestedLocation>) -> Self {
        let mut unique: Vec<SuggestedLocation> = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            if !unique.iter().any(|s| s.location == suggestion.location) {
                unique.push(suggestion);
            }
        }
        unique.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self {
            header,
            status: SuggestLocationsStatus::Ok,
            suggested_locations: unique,
        }
    }

    #[must_use]
    pub const fn header(&self) -> &ResultHeader {
        &self.header
    }

    #[must_use]
    pub const fn status(&self) -> SuggestLocationsStatus {
        self.status
    }

    /// Suggestions in rank order
    #[must_use]
    pub fn suggested_locations(&self) -> &[SuggestedLocation] {
        &self.suggested_locations
    }

    /// Suggested locations without their priorities
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.suggested_locations.iter().map(|s| &s.location)
    }
}

/// Result of a nearby locations query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyLocationsResult {
    header: ResultHeader,
    status: NearbyLocationsStatus,
    locations: Vec<Location>,
}

impl NearbyLocationsResult {
    /// Create an OK result
    #[must_use]
    pub const fn ok(header: ResultHeader, locations: Vec<Location>) -> Self {
        Self {
            header,
            status: NearbyLocationsStatus::Ok,
            locations,
        }
    }

    /// The anchor was not recognized; no locations
    #[must_use]
    pub const fn invalid_id(header: ResultHeader) -> Self {
        Self {
            header,
            status: NearbyLocationsStatus::InvalidId,
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn header(&self) -> &ResultHeader {
        &self.header
    }

    #[must_use]
    pub const fn status(&self) -> NearbyLocationsStatus {
        self.status
    }

    /// Locations, nearest first when the backend reports distances
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}
