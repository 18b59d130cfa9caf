//! Departure board results

use domain::StationDepartures;
use serde::{Deserialize, Serialize};

use super::header::ResultHeader;
use super::status::DeparturesStatus;

/// Result of a departures query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDeparturesResult {
    header: ResultHeader,
    status: DeparturesStatus,
    station_departures: Vec<StationDepartures>,
}

impl QueryDeparturesResult {
    /// Create an OK result, one block per physical stop
    #[must_use]
    pub const fn ok(header: ResultHeader, station_departures: Vec<StationDepartures>) -> Self {
        Self {
            header,
            status: DeparturesStatus::Ok,
            station_departures,
        }
    }

    /// Station unknown to the backend
    #[must_use]
    pub const fn invalid_station(header: ResultHeader) -> Self {
        Self::empty(header, DeparturesStatus::InvalidStation)
    }

    /// Backend unavailable
    #[must_use]
    pub const fn service_down(header: ResultHeader) -> Self {
        Self::empty(header, DeparturesStatus::ServiceDown)
    }

    const fn empty(header: ResultHeader, status: DeparturesStatus) -> Self {
        Self {
            header,
            status,
            station_departures: Vec::new(),
        }
    }

    #[must_use]
    pub const fn header(&self) -> &ResultHeader {
        &self.header
    }

    #[must_use]
    pub const fn status(&self) -> DeparturesStatus {
        self.status
    }

    /// Departure boards, empty unless the status is OK
    #[must_use]
    pub fn station_departures(&self) -> &[StationDepartures] {
        &self.station_departures
    }

    /// Take the boards out of the result
    #[must_use]
    pub fn into_station_departures(self) -> Vec<StationDepartures> {
        self.station_departures
    }
}
