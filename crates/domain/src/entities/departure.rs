//! Station departure boards

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::line::Line;
use super::location::Location;
use crate::errors::DomainError;
use crate::value_objects::Position;

/// One departure from a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    planned_time: Option<DateTime<Utc>>,
    predicted_time: Option<DateTime<Utc>>,
    /// Line departing
    pub line: Line,
    /// Platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Where the vehicle is headed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
    /// Service message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Departure {
    /// Create a departure
    ///
    /// # Errors
    ///
    /// Returns `MissingTime` when neither a planned nor a predicted time is given.
    pub fn new(
        planned_time: Option<DateTime<Utc>>,
        predicted_time: Option<DateTime<Utc>>,
        line: Line,
    ) -> Result<Self, DomainError> {
        if planned_time.is_none() && predicted_time.is_none() {
            return Err(DomainError::MissingTime(format!("departure of {line}")));
        }
        Ok(Self {
            planned_time,
            predicted_time,
            line,
            position: None,
            destination: None,
            message: None,
        })
    }

    /// Set the platform
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the destination
    #[must_use]
    pub fn with_destination(mut self, destination: Location) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Set the service message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Scheduled time
    #[must_use]
    pub const fn planned_time(&self) -> Option<DateTime<Utc>> {
        self.planned_time
    }

    /// Real-time prediction
    #[must_use]
    pub const fn predicted_time(&self) -> Option<DateTime<Utc>> {
        self.predicted_time
    }

    /// Effective time: predicted if known, else planned
    #[must_use]
    pub fn time(&self) -> DateTime<Utc> {
        // at least one of the two is set by construction
        self.predicted_time
            .or(self.planned_time)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Delay, when both times are known
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        Some(self.predicted_time? - self.planned_time?)
    }
}

/// A line together with the destination it serves from a station
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineDestination {
    /// Line
    pub line: Line,
    /// Destination, if the backend reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
}

impl LineDestination {
    #[must_use]
    pub const fn new(line: Line, destination: Option<Location>) -> Self {
        Self { line, destination }
    }
}

/// Departures from one physical stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDepartures {
    location: Location,
    departures: Vec<Departure>,
    lines: Vec<LineDestination>,
}

impl StationDepartures {
    /// Create a board, ordering departures by effective time
    #[must_use]
    pub fn new(location: Location, mut departures: Vec<Departure>) -> Self {
        departures.sort_by_key(Departure::time);
        Self {
            location,
            departures,
            lines: Vec::new(),
        }
    }

    /// Attach the lines served, without duplicates
    #[must_use]
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = LineDestination>) -> Self {
        for line in lines {
            if !self.lines.contains(&line) {
                self.lines.push(line);
            }
        }
        self
    }

    /// Derive the served lines from the departures themselves
    #[must_use]
    pub fn with_lines_from_departures(self) -> Self {
        let lines: Vec<LineDestination> = self
            .departures
            .iter()
            .map(|d| LineDestination::new(d.line.clone(), d.destination.clone()))
            .collect();
        self.with_lines(lines)
    }

    /// Stop the board belongs to
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Departures ordered by effective time
    #[must_use]
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Lines served from this stop
    #[must_use]
    pub fn lines(&self) -> &[LineDestination] {
        &self.lines
    }

    /// Keep at most `max` departures
    pub fn truncate(&mut self, max: usize) {
        self.departures.truncate(max);
    }
}
