//! Stop along a leg

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::location::Location;
use crate::value_objects::Position;

/// One stop along a leg with scheduled and predicted times
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    /// Where the stop is
    pub location: Location,
    /// Scheduled arrival
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_arrival: Option<DateTime<Utc>>,
    /// Real-time arrival prediction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_arrival: Option<DateTime<Utc>>,
    /// Arrival platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_position: Option<Position>,
    /// Arrival was cancelled
    #[serde(default)]
    pub arrival_cancelled: bool,
    /// Scheduled departure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_departure: Option<DateTime<Utc>>,
    /// Real-time departure prediction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_departure: Option<DateTime<Utc>>,
    /// Departure platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_position: Option<Position>,
    /// Departure was cancelled
    #[serde(default)]
    pub departure_cancelled: bool,
    /// Backend stop sequence number on the trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequence: Option<u32>,
    /// Index of the stop within the leg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_index: Option<u32>,
}

impl Stop {
    /// Create a stop with no times
    #[must_use]
    pub const fn new(location: Location) -> Self {
        Self {
            location,
            planned_arrival: None,
            predicted_arrival: None,
            arrival_position: None,
            arrival_cancelled: false,
            planned_departure: None,
            predicted_departure: None,
            departure_position: None,
            departure_cancelled: false,
            stop_sequence: None,
            stop_index: None,
        }
    }

    /// Set scheduled and predicted arrival
    #[must_use]
    pub const fn with_arrival(
        mut self,
        planned: Option<DateTime<Utc>>,
        predicted: Option<DateTime<Utc>>,
    ) -> Self {
        self.planned_arrival = planned;
        self.predicted_arrival = predicted;
        self
    }

    /// Set scheduled and predicted departure
    #[must_use]
    pub const fn with_departure(
        mut self,
        planned: Option<DateTime<Utc>>,
        predicted: Option<DateTime<Utc>>,
    ) -> Self {
        self.planned_departure = planned;
        self.predicted_departure = predicted;
        self
    }

    /// Set arrival and departure platforms
    #[must_use]
    pub fn with_positions(
        mut self,
        arrival: Option<Position>,
        departure: Option<Position>,
    ) -> Self {
        self.arrival_position = arrival;
        self.departure_position = departure;
        self
    }

    /// Set sequence number and index
    #[must_use]
    pub const fn with_ordinals(mut self, sequence: Option<u32>, index: Option<u32>) -> Self {
        self.stop_sequence = sequence;
        self.stop_index = index;
        self
    }

    /// Effective arrival: predicted if known, else scheduled
    #[must_use]
    pub fn arrival_time(&self) -> Option<DateTime<Utc>> {
        self.predicted_arrival.or(self.planned_arrival)
    }

    /// Effective departure: predicted if known, else scheduled
    #[must_use]
    pub fn departure_time(&self) -> Option<DateTime<Utc>> {
        self.predicted_departure.or(self.planned_departure)
    }

    /// Arrival delay, when both times are known
    #[must_use]
    pub fn arrival_delay(&self) -> Option<Duration> {
        Some(self.predicted_arrival? - self.planned_arrival?)
    }

    /// Departure delay, when both times are known
    #[must_use]
    pub fn departure_delay(&self) -> Option<Duration> {
        Some(self.predicted_departure? - self.planned_departure?)
    }

    /// Ordering key for intermediate stops
    #[must_use]
    pub fn ordinal(&self) -> (Option<u32>, Option<u32>) {
        (self.stop_sequence, self.stop_index)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 11, hour, minute, 0).unwrap()
    }

    #[test]
    fn predicted_time_wins_over_planned() {
        let stop = Stop::new(Location::station("1"))
            .with_departure(Some(at(8, 0)), Some(at(8, 3)))
            .with_arrival(Some(at(7, 58)), None);
        assert_eq!(stop.departure_time(), Some(at(8, 3)));
        assert_eq!(stop.arrival_time(), Some(at(7, 58)));
    }

    #[test]
    fn delay_needs_both_times() {
        let stop = Stop::new(Location::station("1"))
            .with_departure(Some(at(8, 0)), Some(at(8, 3)))
            .with_arrival(Some(at(7, 58)), None);
        assert_eq!(stop.departure_delay(), Some(Duration::minutes(3)));
        assert_eq!(stop.arrival_delay(), None);
    }

    #[test]
    fn ordinal_orders_by_sequence_then_index() {
        let mut stops = [
            Stop::new(Location::station("b")).with_ordinals(Some(5), Some(1)),
            Stop::new(Location::station("a")).with_ordinals(Some(2), Some(0)),
        ];
        stops.sort_by_key(Stop::ordinal);
        assert_eq!(stops[0].location.id(), Some("a"));
    }
}
