//! Domain-level errors

use thiserror::Error;

/// Errors raised when an entity would violate one of its invariants
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Coordinate outside the valid range or not a finite number
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Location fields do not match its type
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// A trip must contain at least one leg
    #[error("Trip has no legs")]
    EmptyTrip,

    /// Consecutive legs do not share their boundary location
    #[error("Leg {index} does not start where leg {} ends", previous_leg(.index))]
    DisconnectedLegs {
        /// Index of the leg whose departure does not match its predecessor
        index: usize,
    },

    /// A time required by the entity is absent
    #[error("Missing time: {0}")]
    MissingTime(String),

    /// Unknown product or location type code
    #[error("Unknown code: {0}")]
    UnknownCode(String),
}

fn previous_leg(index: &usize) -> usize {
    index.saturating_sub(1)
}

impl DomainError {
    /// Create an invalid location error
    pub fn invalid_location(reason: impl Into<String>) -> Self {
        Self::InvalidLocation(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_legs_message_names_both_legs() {
        let err = DomainError::DisconnectedLegs { index: 2 };
        assert_eq!(err.to_string(), "Leg 2 does not start where leg 1 ends");
    }

    #[test]
    fn invalid_location_message() {
        let err = DomainError::invalid_location("coordinate required");
        assert_eq!(err.to_string(), "Invalid location: coordinate required");
    }

    #[test]
    fn empty_trip_message() {
        assert_eq!(DomainError::EmptyTrip.to_string(), "Trip has no legs");
    }
}
