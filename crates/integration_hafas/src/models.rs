//! hafas-rest-api wire models
//!
//! Raw serde types for the JSON the backend returns, and their conversion
//! into the domain model. Sub-records that fail to convert are dropped with
//! a warning; records missing a load-bearing field are dropped whole.

use chrono::{DateTime, Utc};
use domain::{
    Departure, IndividualKind, IndividualLeg, Leg, Line, Location, LocationType, Point, Position,
    Product, PublicLeg, Shape, Stop, Style, Trip, polyline,
};
use serde::Deserialize;
use tracing::{debug, warn};

// --- Raw API response types for deserialization ---

/// Station, stop, address, POI or coordinate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLocation {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub poi: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Stops nest their coordinate in a location object
    pub location: Option<Box<RawLocation>>,
    pub distance: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawOperator {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawColor {
    pub fg: Option<String>,
    pub bg: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawLine {
    pub id: Option<String>,
    pub name: Option<String>,
    pub product: Option<String>,
    pub mode: Option<String>,
    pub operator: Option<RawOperator>,
    pub color: Option<RawColor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawRemark {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStopover {
    pub stop: RawLocation,
    pub arrival: Option<DateTime<Utc>>,
    pub planned_arrival: Option<DateTime<Utc>>,
    pub arrival_delay: Option<i64>,
    pub arrival_platform: Option<String>,
    pub planned_arrival_platform: Option<String>,
    pub departure: Option<DateTime<Utc>>,
    pub planned_departure: Option<DateTime<Utc>>,
    pub departure_delay: Option<i64>,
    pub departure_platform: Option<String>,
    pub planned_departure_platform: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPoint {
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFeature {
    pub geometry: RawPoint,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFeatureCollection {
    pub features: Vec<RawFeature>,
}

/// Leg geometry: an encoded polyline or a GeoJSON feature collection
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPolyline {
    Encoded(String),
    GeoJson(RawFeatureCollection),
}

impl RawPolyline {
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Encoded(encoded) => polyline::decode(encoded),
            Self::GeoJson(collection) => collection
                .features
                .iter()
                .filter_map(|feature| match feature.geometry.coordinates[..] {
                    [lon, lat, ..] => Point::from_degrees(lat, lon).ok(),
                    _ => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLeg {
    pub origin: Option<RawLocation>,
    pub destination: Option<RawLocation>,
    pub departure: Option<DateTime<Utc>>,
    pub planned_departure: Option<DateTime<Utc>>,
    pub departure_delay: Option<i64>,
    pub departure_platform: Option<String>,
    pub planned_departure_platform: Option<String>,
    pub arrival: Option<DateTime<Utc>>,
    pub planned_arrival: Option<DateTime<Utc>>,
    pub arrival_delay: Option<i64>,
    pub arrival_platform: Option<String>,
    pub planned_arrival_platform: Option<String>,
    pub line: Option<serde_json::Value>,
    pub direction: Option<String>,
    #[serde(default)]
    pub walking: bool,
    #[serde(default)]
    pub transfer: bool,
    pub distance: Option<u32>,
    #[serde(default)]
    pub stopovers: Vec<serde_json::Value>,
    pub polyline: Option<RawPolyline>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub remarks: Vec<RawRemark>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawJourney {
    pub legs: Vec<RawLeg>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawJourneysResponse {
    #[serde(default)]
    pub journeys: Vec<serde_json::Value>,
    pub earlier_ref: Option<String>,
    pub later_ref: Option<String>,
    pub realtime_data_updated_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawDeparture {
    pub trip_id: Option<String>,
    pub stop: Option<RawLocation>,
    pub when: Option<DateTime<Utc>>,
    pub planned_when: Option<DateTime<Utc>>,
    pub delay: Option<i64>,
    pub platform: Option<String>,
    pub planned_platform: Option<String>,
    pub direction: Option<String>,
    pub line: Option<serde_json::Value>,
    pub destination: Option<RawLocation>,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub remarks: Vec<RawRemark>,
}

/// Older deployments return a bare array, newer ones wrap it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawDeparturesResponse {
    Wrapped {
        departures: Vec<serde_json::Value>,
        #[serde(rename = "realtimeDataUpdatedAt")]
        realtime_data_updated_at: Option<i64>,
    },
    Bare(Vec<serde_json::Value>),
}

impl RawDeparturesResponse {
    pub fn into_parts(self) -> (Vec<serde_json::Value>, Option<i64>) {
        match self {
            Self::Wrapped {
                departures,
                realtime_data_updated_at,
            } => (departures, realtime_data_updated_at),
            Self::Bare(departures) => (departures, None),
        }
    }
}

/// Error body of a failed request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawErrorBody {
    pub is_hafas_error: Option<bool>,
    pub code: Option<String>,
    pub hafas_code: Option<String>,
    pub message: Option<String>,
    pub msg: Option<String>,
}

// --- Conversion into the domain model ---

/// Map a hafas product id, falling back to the transport mode
pub(crate) fn map_product(product: Option<&str>, mode: Option<&str>) -> Option<Product> {
    let by_product = product.and_then(|p| match p {
        "nationalExpress" | "national" | "regionalExpress" | "regionalExp" | "regional"
        | "suburban" | "train" => Some(Product::Rail),
        "subway" => Some(Product::Subway),
        "tram" => Some(Product::Tram),
        "bus" | "express_bus" => Some(Product::Bus),
        "ferry" => Some(Product::Ferry),
        "cablecar" | "gondola" | "funicular" => Some(Product::CableCar),
        "taxi" | "onDemand" => Some(Product::OnDemand),
        _ => None,
    });
    by_product.or_else(|| match mode? {
        "train" => Some(Product::Rail),
        "bus" => Some(Product::Bus),
        "watercraft" => Some(Product::Ferry),
        "gondola" => Some(Product::CableCar),
        "taxi" => Some(Product::OnDemand),
        _ => None,
    })
}

/// hafas-rest-api product parameters for a product set
///
/// The backend has no cable car filter. `None` when nothing else is in the
/// set, since every parameter would be `false`.
pub(crate) fn product_params(products: domain::ProductSet) -> Option<Vec<(&'static str, bool)>> {
    if products.contains(Product::CableCar) {
        let mut rest = products;
        rest.remove(Product::CableCar);
        if rest.is_empty() {
            return None;
        }
        debug!("Cable car filter not supported, ignored");
    }
    let rail = products.contains(Product::Rail);
    Some(vec![
        ("nationalExpress", rail),
        ("national", rail),
        ("regionalExpress", rail),
        ("regional", rail),
        ("suburban", rail),
        ("subway", products.contains(Product::Subway)),
        ("tram", products.contains(Product::Tram)),
        ("bus", products.contains(Product::Bus)),
        ("ferry", products.contains(Product::Ferry)),
        ("taxi", products.contains(Product::OnDemand)),
    ])
}

fn raw_coordinate(raw: &RawLocation) -> Option<Point> {
    let (lat, lon) = match (raw.latitude, raw.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            let nested = raw.location.as_deref()?;
            (nested.latitude?, nested.longitude?)
        },
    };
    Point::from_degrees(lat, lon).ok()
}

/// Convert a raw location
pub(crate) fn convert_location(raw: &RawLocation) -> Result<Location, String> {
    let coord = raw_coordinate(raw);
    let location_type = match raw.kind.as_deref() {
        Some("stop" | "station") => LocationType::Station,
        Some("location") if raw.poi == Some(true) => LocationType::Poi,
        Some("location") if raw.address.is_some() => LocationType::Address,
        Some("location") => LocationType::Coord,
        _ if raw.id.is_some() => LocationType::Station,
        other => return Err(format!("unknown location type {other:?}")),
    };
    let name = raw.name.clone().or_else(|| raw.address.clone());

    Location::new(location_type, raw.id.clone(), coord, None, name).map_err(|e| e.to_string())
}

/// Convert a raw line
///
/// Individual fields that cannot be read are left empty rather than
/// failing the whole line.
pub(crate) fn convert_line(value: &serde_json::Value) -> Line {
    let raw: RawLine = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Dropping unparseable line");
            return Line::default();
        },
    };

    let mut line = Line {
        id: raw.id,
        network: raw.operator.and_then(|o| o.name),
        product: map_product(raw.product.as_deref(), raw.mode.as_deref()),
        label: raw.name,
        ..Line::default()
    };
    if let Some(color) = raw.color {
        let background = color.bg.as_deref().and_then(Style::parse_rgb);
        let foreground = color.fg.as_deref().and_then(Style::parse_rgb);
        line.style = match (background, foreground) {
            (Some(bg), Some(fg)) => Some(Style::new(Shape::Rect, bg, fg)),
            (Some(bg), None) => Some(Style::with_background(Shape::Rect, bg)),
            _ => None,
        };
    }
    line
}

fn position(actual: Option<&String>, planned: Option<&String>) -> Option<Position> {
    actual.or(planned).filter(|p| !p.is_empty()).map(Position::new)
}

/// Prediction only when the backend has realtime data for the event
fn predicted(actual: Option<DateTime<Utc>>, delay: Option<i64>) -> Option<DateTime<Utc>> {
    delay.and(actual)
}

fn convert_stopover(value: &serde_json::Value, index: u32) -> Result<Stop, String> {
    let raw: RawStopover = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
    let location = convert_location(&raw.stop)?;
    let mut stop = Stop::new(location)
        .with_arrival(
            raw.planned_arrival.or(raw.arrival),
            predicted(raw.arrival, raw.arrival_delay),
        )
        .with_departure(
            raw.planned_departure.or(raw.departure),
            predicted(raw.departure, raw.departure_delay),
        )
        .with_positions(
            position(raw.arrival_platform.as_ref(), raw.planned_arrival_platform.as_ref()),
            position(
                raw.departure_platform.as_ref(),
                raw.planned_departure_platform.as_ref(),
            ),
        )
        .with_ordinals(None, Some(index));
    stop.arrival_cancelled = raw.cancelled;
    stop.departure_cancelled = raw.cancelled;
    Ok(stop)
}

fn leg_message(raw: &RawLeg) -> Option<String> {
    if raw.cancelled {
        return Some("service cancelled".to_string());
    }
    let warnings: Vec<&str> = raw
        .remarks
        .iter()
        .filter(|r| matches!(r.kind.as_deref(), Some("warning" | "status")))
        .filter_map(|r| r.text.as_deref())
        .collect();
    (!warnings.is_empty()).then(|| warnings.join("; "))
}

/// Convert a raw leg; a missing endpoint or time fails the leg
pub(crate) fn convert_leg(raw: &RawLeg) -> Result<Leg, String> {
    let origin = raw
        .origin
        .as_ref()
        .ok_or("leg without origin")
        .and_then(|o| convert_location(o).map_err(|_| "unreadable origin"))?;
    let destination = raw
        .destination
        .as_ref()
        .ok_or("leg without destination")
        .and_then(|d| convert_location(d).map_err(|_| "unreadable destination"))?;
    let path = raw.polyline.as_ref().map(RawPolyline::points).unwrap_or_default();

    if raw.walking || raw.transfer || raw.line.is_none() {
        let departure = raw
            .departure
            .or(raw.planned_departure)
            .ok_or("individual leg without departure")?;
        let arrival = raw
            .arrival
            .or(raw.planned_arrival)
            .ok_or("individual leg without arrival")?;
        let kind = if raw.transfer {
            IndividualKind::Transfer
        } else {
            IndividualKind::Walk
        };
        let leg = IndividualLeg::new(kind, origin, departure, destination, arrival)
            .with_distance(raw.distance.unwrap_or(0))
            .with_path(path);
        return Ok(leg.into());
    }

    let line = raw.line.as_ref().map(convert_line).unwrap_or_default();

    let mut departure_stop = Stop::new(origin)
        .with_departure(
            raw.planned_departure.or(raw.departure),
            predicted(raw.departure, raw.departure_delay),
        )
        .with_positions(
            None,
            position(
                raw.departure_platform.as_ref(),
                raw.planned_departure_platform.as_ref(),
            ),
        );
    departure_stop.departure_cancelled = raw.cancelled;

    let mut arrival_stop = Stop::new(destination)
        .with_arrival(
            raw.planned_arrival.or(raw.arrival),
            predicted(raw.arrival, raw.arrival_delay),
        )
        .with_positions(
            position(raw.arrival_platform.as_ref(), raw.planned_arrival_platform.as_ref()),
            None,
        );
    arrival_stop.arrival_cancelled = raw.cancelled;

    // stopovers include the boarding and alighting stops
    let inner = raw
        .stopovers
        .len()
        .checked_sub(1)
        .map_or(&[][..], |last| &raw.stopovers[1.min(last)..last]);
    let mut intermediate = Vec::with_capacity(inner.len());
    for (index, value) in (1u32..).zip(inner) {
        match convert_stopover(value, index) {
            Ok(stop) => intermediate.push(stop),
            Err(e) => warn!(index, error = %e, "Dropping unparseable stopover"),
        }
    }

    let mut leg = PublicLeg::new(line, departure_stop, arrival_stop)
        .map_err(|e| e.to_string())?
        .with_intermediate_stops(intermediate)
        .with_path(path);
    if let Some(direction) = &raw.direction {
        leg = leg.with_destination(direction.clone());
    }
    if let Some(message) = leg_message(raw) {
        leg = leg.with_message(message);
    }
    Ok(leg.into())
}

/// Convert a raw journey; any failed leg drops the whole trip
pub(crate) fn convert_journey(value: &serde_json::Value) -> Result<Trip, String> {
    let raw: RawJourney = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
    let legs = raw
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| convert_leg(leg).map_err(|e| format!("leg {i}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    Trip::new(raw.refresh_token, legs).map_err(|e| e.to_string())
}

/// Convert a raw departure, together with the stop it departs from
pub(crate) fn convert_departure(
    value: &serde_json::Value,
) -> Result<(Option<Location>, Departure), String> {
    let raw: RawDeparture = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
    let line = raw.line.as_ref().map(convert_line).unwrap_or_default();

    let mut departure = Departure::new(
        raw.planned_when.or(raw.when),
        predicted(raw.when, raw.delay),
        line,
    )
    .map_err(|e| format!("{}: {e}", raw.trip_id.as_deref().unwrap_or("?")))?;

    if let Some(position) = position(raw.platform.as_ref(), raw.planned_platform.as_ref()) {
        departure = departure.with_position(position);
    }
    let destination = raw
        .destination
        .as_ref()
        .and_then(|d| convert_location(d).ok())
        .or_else(|| raw.direction.clone().map(Location::any));
    if let Some(destination) = destination {
        departure = departure.with_destination(destination);
    }
    if raw.cancelled {
        departure = departure.with_message("service cancelled");
    } else if let Some(text) = raw
        .remarks
        .iter()
        .find(|r| r.kind.as_deref() == Some("warning"))
        .and_then(|r| r.text.clone())
    {
        departure = departure.with_message(text);
    }

    let stop = raw.stop.as_ref().and_then(|s| convert_location(s).ok());
    Ok((stop, departure))
}
