//! Per-operation status taxonomies
//!
//! Every backend condition maps onto exactly one member. Anything other than
//! `Ok` means the result carries no payload.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a location suggestion query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestLocationsStatus {
    /// Query understood; an empty list is still OK
    #[default]
    Ok,
}

/// Outcome of a nearby locations query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NearbyLocationsStatus {
    /// Query understood
    #[default]
    Ok,
    /// The anchor location or station id is unknown to the backend
    InvalidId,
}

/// Outcome of a departures query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeparturesStatus {
    /// Query understood
    #[default]
    Ok,
    /// Station id unknown to the backend
    InvalidStation,
    /// Backend unavailable or answered with garbage
    ServiceDown,
}

/// Outcome of a trips query or continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripsStatus {
    /// Trips found
    #[default]
    Ok,
    /// At least one of from/via/to matched several candidates
    Ambiguous,
    /// Query understood but nothing in range
    NoTrips,
    /// Origin unknown
    UnknownFrom,
    /// Intermediate stop unknown
    UnknownVia,
    /// Destination unknown
    UnknownTo,
    /// Some location unknown, backend did not say which
    UnknownLocation,
    /// Origin and destination resolve to the same point
    TooClose,
    /// Date outside the timetable validity window
    InvalidDate,
    /// Backend unavailable or answered with garbage
    ServiceDown,
}

macro_rules! status_display {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire name of the status
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            /// Whether this is the `Ok` status
            #[must_use]
            pub const fn is_ok(self) -> bool {
                matches!(self, Self::Ok)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_display!(SuggestLocationsStatus { Ok => "OK" });

status_display!(NearbyLocationsStatus {
    Ok => "OK",
    InvalidId => "INVALID_ID",
});

status_display!(DeparturesStatus {
    Ok => "OK",
    InvalidStation => "INVALID_STATION",
    ServiceDown => "SERVICE_DOWN",
});

status_display!(TripsStatus {
    Ok => "OK",
    Ambiguous => "AMBIGUOUS",
    NoTrips => "NO_TRIPS",
    UnknownFrom => "UNKNOWN_FROM",
    UnknownVia => "UNKNOWN_VIA",
    UnknownTo => "UNKNOWN_TO",
    UnknownLocation => "UNKNOWN_LOCATION",
    TooClose => "TOO_CLOSE",
    InvalidDate => "INVALID_DATE",
    ServiceDown => "SERVICE_DOWN",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serde_names() {
        for status in [
            TripsStatus::Ok,
            TripsStatus::Ambiguous,
            TripsStatus::UnknownVia,
            TripsStatus::TooClose,
            TripsStatus::ServiceDown,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
        assert_eq!(DeparturesStatus::InvalidStation.to_string(), "INVALID_STATION");
        assert_eq!(NearbyLocationsStatus::InvalidId.as_str(), "INVALID_ID");
    }

    #[test]
    fn only_ok_is_ok() {
        assert!(SuggestLocationsStatus::Ok.is_ok());
        assert!(!DeparturesStatus::ServiceDown.is_ok());
        assert!(!TripsStatus::NoTrips.is_ok());
    }
}
