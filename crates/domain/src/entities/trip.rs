//! Trip entity - one complete itinerary

use std::fmt;
use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::leg::{Leg, PublicLeg};
use super::location::Location;
use crate::errors::DomainError;

/// An ordered, non-empty sequence of legs from an origin to a destination
///
/// Two trips are equal when their leg sequences are structurally equal,
/// which is what adapters use to deduplicate result pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TripParts", into = "TripParts")]
pub struct Trip {
    id: String,
    legs: Vec<Leg>,
    first_departure: DateTime<Utc>,
    last_arrival: DateTime<Utc>,
}

impl Trip {
    /// Create a trip from its legs
    ///
    /// When `id` is `None` an id is derived from the legs.
    ///
    /// # Errors
    ///
    /// - `EmptyTrip` if `legs` is empty
    /// - `MissingTime` if a leg lacks its departure or arrival time
    /// - `DisconnectedLegs` if a leg does not start where the previous one ends
    pub fn new(id: Option<String>, legs: Vec<Leg>) -> Result<Self, DomainError> {
        let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
            return Err(DomainError::EmptyTrip);
        };

        for (index, leg) in legs.iter().enumerate() {
            if leg.departure_time().is_none() || leg.arrival_time().is_none() {
                return Err(DomainError::MissingTime(format!("leg {index}")));
            }
        }

        for (index, pair) in legs.windows(2).enumerate() {
            if pair[0].arrival() != pair[1].departure() {
                return Err(DomainError::DisconnectedLegs { index: index + 1 });
            }
        }

        let first_departure = first
            .departure_time()
            .ok_or_else(|| DomainError::MissingTime("first departure".to_string()))?;
        let last_arrival = last
            .arrival_time()
            .ok_or_else(|| DomainError::MissingTime("last arrival".to_string()))?;

        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| derive_id(&legs));

        Ok(Self {
            id,
            legs,
            first_departure,
            last_arrival,
        })
    }

    /// Backend id, or one derived from the legs
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Legs in travel order
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Origin of the first leg
    #[must_use]
    pub fn from(&self) -> &Location {
        self.legs[0].departure()
    }

    /// Destination of the last leg
    #[must_use]
    pub fn to(&self) -> &Location {
        self.legs[self.legs.len() - 1].arrival()
    }

    /// Departure time of the first leg
    #[must_use]
    pub const fn first_departure_time(&self) -> DateTime<Utc> {
        self.first_departure
    }

    /// Arrival time of the last leg
    #[must_use]
    pub const fn last_arrival_time(&self) -> DateTime<Utc> {
        self.last_arrival
    }

    /// Total travel time
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.last_arrival - self.first_departure
    }

    /// First transit ride, if any
    #[must_use]
    pub fn first_public_leg(&self) -> Option<&PublicLeg> {
        self.legs.iter().find_map(Leg::as_public)
    }

    /// Last transit ride, if any
    #[must_use]
    pub fn last_public_leg(&self) -> Option<&PublicLeg> {
        self.legs.iter().rev().find_map(Leg::as_public)
    }

    /// Number of changes between transit rides
    #[must_use]
    pub fn num_changes(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| leg.is_public())
            .count()
            .saturating_sub(1)
    }

    /// Whether every transit ride can actually be taken
    #[must_use]
    pub fn is_travelable(&self) -> bool {
        !self
            .legs
            .iter()
            .filter_map(Leg::as_public)
            .any(PublicLeg::is_cancelled)
    }
}

impl PartialEq for Trip {
    fn eq(&self, other: &Self) -> bool {
        self.legs == other.legs
    }
}

impl Eq for Trip {}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route: Vec<String> = self
            .legs
            .iter()
            .filter_map(Leg::as_public)
            .map(|leg| leg.line.to_string())
            .collect();
        write!(
            f,
            "{} → {} ({}min, {} changes) {}",
            self.first_departure.format("%H:%M"),
            self.last_arrival.format("%H:%M"),
            self.duration().num_minutes(),
            self.num_changes(),
            route.join(" → ")
        )
    }
}

fn derive_id(legs: &[Leg]) -> String {
    let mut id = String::new();
    for leg in legs {
        if !id.is_empty() {
            id.push('-');
        }
        let departure = leg
            .departure_time()
            .map_or(0, |t| t.timestamp());
        match leg {
            Leg::Public(public) => {
                let label = public.line.label.as_deref().unwrap_or("?");
                let _ = write!(id, "{departure}:{label}");
            },
            Leg::Individual(_) => {
                let _ = write!(id, "{departure}:~");
            },
        }
        let _ = write!(id, ">{}", leg.arrival().unique_short_name());
    }
    id
}

/// Serialized form; deserialization re-runs the constructor checks
#[derive(Serialize, Deserialize)]
struct TripParts {
    id: String,
    legs: Vec<Leg>,
}

impl TryFrom<TripParts> for Trip {
    type Error = DomainError;

    fn try_from(parts: TripParts) -> Result<Self, Self::Error> {
        Self::new(Some(parts.id), parts.legs)
    }
}

impl From<Trip> for TripParts {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            legs: trip.legs,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::entities::leg::{IndividualKind, IndividualLeg};
    use crate::entities::line::Line;
    use crate::entities::stop::Stop;
    use crate::value_objects::Product;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 11, hour, minute, 0).unwrap()
    }

    fn ride(label: &str, from: &str, dep: DateTime<Utc>, to: &str, arr: DateTime<Utc>) -> Leg {
        PublicLeg::new(
            Line::new(Some(Product::Rail), label),
            Stop::new(Location::station(from)).with_departure(Some(dep), None),
            Stop::new(Location::station(to)).with_arrival(Some(arr), None),
        )
        .unwrap()
        .into()
    }

    fn walk(from: &str, dep: DateTime<Utc>, to: &str, arr: DateTime<Utc>) -> Leg {
        IndividualLeg::new(
            IndividualKind::Walk,
            Location::station(from),
            dep,
            Location::station(to),
            arr,
        )
        .into()
    }

    #[test]
    fn empty_trip_is_rejected() {
        assert_eq!(Trip::new(None, vec![]).unwrap_err(), DomainError::EmptyTrip);
    }

    #[test]
    fn disconnected_legs_are_rejected() {
        let legs = vec![
            ride("S5", "a", at(8, 0), "b", at(8, 10)),
            ride("U2", "c", at(8, 15), "d", at(8, 30)),
        ];
        assert_eq!(
            Trip::new(None, legs).unwrap_err(),
            DomainError::DisconnectedLegs { index: 1 }
        );
    }

    #[test]
    fn derived_properties() {
        let trip = Trip::new(
            None,
            vec![
                ride("S5", "a", at(8, 0), "b", at(8, 10)),
                walk("b", at(8, 10), "c", at(8, 14)),
                ride("U2", "c", at(8, 15), "d", at(8, 30)),
            ],
        )
        .unwrap();

        assert_eq!(trip.first_departure_time(), at(8, 0));
        assert_eq!(trip.last_arrival_time(), at(8, 30));
        assert_eq!(trip.duration(), Duration::minutes(30));
        assert_eq!(trip.num_changes(), 1);
        assert_eq!(trip.from().id(), Some("a"));
        assert_eq!(trip.to().id(), Some("d"));
        assert_eq!(trip.first_public_leg().unwrap().line.label.as_deref(), Some("S5"));
        assert_eq!(trip.last_public_leg().unwrap().line.label.as_deref(), Some("U2"));
        assert!(trip.is_travelable());
    }

    #[test]
    fn equality_compares_legs_only() {
        let legs = vec![ride("S5", "a", at(8, 0), "b", at(8, 10))];
        let a = Trip::new(Some("backend-1".into()), legs.clone()).unwrap();
        let b = Trip::new(Some("backend-2".into()), legs).unwrap();
        let c = Trip::new(None, vec![ride("S5", "a", at(8, 20), "b", at(8, 30))]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn derived_id_is_deterministic() {
        let legs = vec![ride("S5", "a", at(8, 0), "b", at(8, 10))];
        let a = Trip::new(None, legs.clone()).unwrap();
        let b = Trip::new(None, legs).unwrap();
        assert_eq!(a.id(), b.id());
        assert!(a.id().contains("S5"));
    }

    #[test]
    fn cancelled_ride_is_not_travelable() {
        let mut leg = PublicLeg::new(
            Line::new(Some(Product::Bus), "248"),
            Stop::new(Location::station("a")).with_departure(Some(at(8, 0)), None),
            Stop::new(Location::station("b")).with_arrival(Some(at(8, 10)), None),
        )
        .unwrap();
        leg.departure_stop.departure_cancelled = true;
        let trip = Trip::new(None, vec![leg.into()]).unwrap();
        assert!(!trip.is_travelable());
    }

    #[test]
    fn serde_round_trip_revalidates() {
        let trip = Trip::new(None, vec![ride("S5", "a", at(8, 0), "b", at(8, 10))]).unwrap();
        let json = serde_json::to_string(&trip).unwrap();
        let back: Trip = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trip);
        assert_eq!(back.id(), trip.id());

        let broken = r#"{"id":"x","legs":[]}"#;
        assert!(serde_json::from_str::<Trip>(broken).is_err());
    }
}
