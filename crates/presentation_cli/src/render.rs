//! Plain-text rendering of provider results

use application::{
    NearbyLocationsResult, QueryDeparturesResult, QueryTripsResult, SuggestLocationsResult,
};
use domain::{Departure, Leg, Location, Trip};

fn location_line(location: &Location) -> String {
    let id = location.id().map(|id| format!(" [{id}]")).unwrap_or_default();
    format!("{:?}: {location}{id}", location.location_type())
}

/// Ranked suggestions, one per line
pub fn suggestions(result: &SuggestLocationsResult) -> String {
    let mut out = String::new();
    for suggestion in result.suggested_locations() {
        out.push_str(&format!(
            "{:>4}  {}\n",
            suggestion.priority,
            location_line(&suggestion.location)
        ));
    }
    if out.is_empty() {
        out.push_str("No suggestions\n");
    }
    out
}

/// Nearby locations in distance order, or the status when not OK
pub fn nearby(result: &NearbyLocationsResult) -> String {
    if !result.status().is_ok() {
        return format!("Status: {}\n", result.status());
    }
    let mut out = String::new();
    for location in result.locations() {
        out.push_str(&location_line(location));
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("Nothing nearby\n");
    }
    out
}

fn departure_line(departure: &Departure) -> String {
    let mut line = departure.time().format("%H:%M").to_string();
    if let Some(delay) = departure.delay().filter(|d| d.num_minutes() != 0) {
        line.push_str(&format!(" ({:+})", delay.num_minutes()));
    }
    line.push_str(&format!(" {}", departure.line));
    if let Some(destination) = &departure.destination {
        line.push_str(&format!(" → {destination}"));
    }
    if let Some(position) = &departure.position {
        line.push_str(&format!(" [{}]", position.name));
    }
    if let Some(message) = &departure.message {
        line.push_str(&format!(" ! {message}"));
    }
    line
}

/// Departure boards, one block per station
pub fn departures(result: &QueryDeparturesResult) -> String {
    if !result.status().is_ok() {
        return format!("Status: {}\n", result.status());
    }
    let mut out = String::new();
    for board in result.station_departures() {
        out.push_str(&format!("{}\n", board.location()));
        for departure in board.departures() {
            out.push_str(&format!("  {}\n", departure_line(departure)));
        }
    }
    if out.is_empty() {
        out.push_str("No departures\n");
    }
    out
}

/// Status of a trip query that did not produce trips, with candidates
pub fn trips_outcome(result: &QueryTripsResult) -> String {
    let mut out = format!("Status: {}\n", result.status());
    let roles = [
        ("from", result.ambiguous_from()),
        ("via", result.ambiguous_via()),
        ("to", result.ambiguous_to()),
    ];
    for (role, candidates) in roles {
        if candidates.is_empty() {
            continue;
        }
        out.push_str(&format!("Did you mean ({role}):\n"));
        for candidate in candidates {
            out.push_str(&format!("  {}\n", location_line(candidate)));
        }
    }
    out
}

fn leg_line(leg: &Leg) -> String {
    let time = |t: Option<chrono::DateTime<chrono::Utc>>| {
        t.map_or_else(|| "--:--".to_string(), |t| t.format("%H:%M").to_string())
    };
    let how = match leg {
        Leg::Public(public) => public.line.to_string(),
        Leg::Individual(individual) => format!("{:?} {}m", individual.kind, individual.distance_m),
    };
    format!(
        "{} {} → {} {} ({how})",
        time(leg.departure_time()),
        leg.departure(),
        time(leg.arrival_time()),
        leg.arrival()
    )
}

/// Trips with their legs
pub fn trips(trips: &[Trip]) -> String {
    let mut out = String::new();
    for trip in trips {
        out.push_str(&format!("{trip}\n"));
        for leg in trip.legs() {
            out.push_str(&format!("    {}\n", leg_line(leg)));
        }
    }
    if out.is_empty() {
        out.push_str("No trips\n");
    }
    out
}
