//! HAFAS provider via hafas-rest-api
//!
//! Implements the transit provider port against a
//! [hafas-rest-api](https://github.com/public-transport/hafas-rest-api)
//! deployment such as v6.db.transport.rest.

use std::time::Duration;

use application::{
    Accessibility, Capability, DeparturesQuery, NearbyLocationsResult, NearbyQuery, Optimize,
    ProviderError, QueryDeparturesResult, QueryTripsResult, ResponseTriage, ResultHeader,
    SuggestLocationsResult, SuggestQuery, TransitProvider, TripsQuery, TripsStatus, WalkSpeed,
};
use async_trait::async_trait;
use chrono::DateTime;
use domain::{
    Departure, Location, LocationType, LocationTypes, Point, StationDepartures, SuggestedLocation,
    Trip,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::HafasConfig;
use crate::error::HafasError;
use crate::models::{
    RawDeparturesResponse, RawErrorBody, RawJourneysResponse, RawLocation, convert_departure,
    convert_journey, convert_location, product_params,
};
use crate::token::JourneyToken;

/// Name stamped into every trips context this provider creates
pub const PROVIDER_NAME: &str = "hafas";

const SERVER_PRODUCT: &str = "hafas-rest-api";

const CAPABILITIES: &[Capability] = &[
    Capability::Suggest,
    Capability::Nearby,
    Capability::Departures,
    Capability::Trips,
    Capability::TripsVia,
];

/// Window of departures requested from a board, in minutes
const DEPARTURES_DURATION_MINUTES: u32 = 60;

type Params = Vec<(String, String)>;

fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

/// Structured bodies start with an object or array; anything else is
/// triaged as a possible HTML interstitial
fn looks_like_json(body: &str) -> bool {
    matches!(body.trim_start().chars().next(), Some('{' | '['))
}

/// Outcome of resolving one trip endpoint
#[derive(Debug)]
enum Resolution {
    Unique(Location),
    Ambiguous(Vec<Location>),
    Unknown,
}

impl Resolution {
    fn candidates(&mut self) -> Vec<Location> {
        match self {
            Self::Ambiguous(candidates) => std::mem::take(candidates),
            _ => Vec::new(),
        }
    }
}

/// Outcome of resolving all trip endpoints
#[derive(Debug)]
enum Endpoints {
    Resolved {
        from: Location,
        via: Option<Location>,
        to: Location,
    },
    Unknown(TripsStatus),
    Ambiguous {
        from: Vec<Location>,
        via: Vec<Location>,
        to: Vec<Location>,
    },
}

/// One page of journeys
#[derive(Debug)]
struct JourneyPage {
    header: ResultHeader,
    uri: Url,
    trips: Vec<Trip>,
    earlier_ref: Option<String>,
    later_ref: Option<String>,
}

/// Transit provider backed by hafas-rest-api
#[derive(Debug)]
pub struct HafasProvider {
    client: Client,
    config: HafasConfig,
    base_url: Url,
    triage: ResponseTriage,
}

impl HafasProvider {
    /// Create a new HAFAS provider
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &HafasConfig) -> Result<Self, HafasError> {
        config.validate().map_err(HafasError::ConfigurationError)?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| HafasError::ConfigurationError(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| HafasError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            base_url,
            triage: ResponseTriage::default(),
        })
    }

    /// Replace the response triage, e.g. to add deployment-specific markers
    #[must_use]
    pub fn with_triage(mut self, triage: ResponseTriage) -> Self {
        self.triage = triage;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, HafasError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                HafasError::ConfigurationError(format!(
                    "base_url cannot carry a path: {}",
                    self.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn header(&self, realtime_updated_at: Option<i64>) -> ResultHeader {
        let network = self.base_url.host_str().unwrap_or(PROVIDER_NAME);
        let header = ResultHeader::new(network, SERVER_PRODUCT);
        match realtime_updated_at.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
            Some(time) => header.with_server_time(time),
            None => header,
        }
    }

    /// Configured result limit when the query leaves it open
    const fn limit(&self, requested: usize) -> usize {
        if requested == 0 {
            self.config.max_results
        } else {
            requested
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> HafasError {
        if err.is_timeout() {
            HafasError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            HafasError::ConnectionFailed(err.to_string())
        }
    }

    /// GET a resource, triaging the body before anything parses it
    #[instrument(skip(self, params), fields(url = %url))]
    async fn fetch(&self, url: Url, params: &[(String, String)]) -> Result<(Url, String), HafasError> {
        debug!(params = params.len(), "Requesting");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(HafasError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let request_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| HafasError::ParseError(e.to_string()))?;

        if !looks_like_json(&body) {
            let class = self.triage.classify(&body, &request_url);
            if !class.is_normal() {
                return Err(HafasError::Triage(class));
            }
        }

        if !status.is_success() {
            return Err(backend_error(status, &body));
        }

        Ok((request_url, body))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(String, String)],
    ) -> Result<(Url, T), HafasError> {
        let (request_url, body) = self.fetch(url, params).await?;
        let parsed =
            serde_json::from_str(&body).map_err(|e| HafasError::ParseError(e.to_string()))?;
        Ok((request_url, parsed))
    }

    async fn search_locations(
        &self,
        text: &str,
        types: LocationTypes,
        limit: usize,
    ) -> Result<Vec<Location>, HafasError> {
        let params = vec![
            param("query", text),
            param("results", limit),
            param("stops", types.contains(LocationType::Station)),
            param("addresses", types.contains(LocationType::Address)),
            param("poi", types.contains(LocationType::Poi)),
            param("fuzzy", true),
            param("linesOfStops", false),
            param("language", &self.config.language),
        ];
        let (_, raw): (_, Vec<RawLocation>) =
            self.fetch_json(self.endpoint(&["locations"])?, &params).await?;
        Ok(convert_locations(&raw, types))
    }

    /// Coordinate of a station, `None` if the backend does not know one
    async fn station_coordinate(&self, id: &str) -> Result<Option<Point>, HafasError> {
        let params = vec![param("language", &self.config.language)];
        let (_, raw): (_, RawLocation) =
            self.fetch_json(self.endpoint(&["stops", id])?, &params).await?;
        Ok(convert_location(&raw).ok().and_then(|l| l.coordinate()))
    }

    /// Resolve a free-text endpoint to a unique location if possible
    async fn resolve(&self, location: &Location) -> Result<Resolution, HafasError> {
        if !location.is_unresolved() {
            return Ok(Resolution::Unique(location.clone()));
        }
        let Some(name) = location.name().map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(Resolution::Unknown);
        };

        let candidates = self
            .search_locations(name, LocationTypes::ALL, self.config.max_results)
            .await?;
        let wanted = name.to_lowercase();
        let exact = candidates
            .iter()
            .position(|c| c.name().is_some_and(|n| n.to_lowercase() == wanted));
        debug!(name, candidates = candidates.len(), exact = exact.is_some(), "Resolved location");

        let mut candidates = candidates;
        Ok(match (candidates.len(), exact) {
            (0, _) => Resolution::Unknown,
            (_, Some(index)) => Resolution::Unique(candidates.swap_remove(index)),
            (1, None) => Resolution::Unique(candidates.swap_remove(0)),
            _ => Resolution::Ambiguous(candidates),
        })
    }

    async fn resolve_endpoints(&self, query: &TripsQuery) -> Result<Endpoints, HafasError> {
        let from = self.resolve(&query.from).await?;
        let via = match &query.via {
            Some(via) => Some(self.resolve(via).await?),
            None => None,
        };
        let to = self.resolve(&query.to).await?;

        if matches!(from, Resolution::Unknown) {
            return Ok(Endpoints::Unknown(TripsStatus::UnknownFrom));
        }
        if matches!(via, Some(Resolution::Unknown)) {
            return Ok(Endpoints::Unknown(TripsStatus::UnknownVia));
        }
        if matches!(to, Resolution::Unknown) {
            return Ok(Endpoints::Unknown(TripsStatus::UnknownTo));
        }

        Ok(match (from, via, to) {
            (Resolution::Unique(from), via, Resolution::Unique(to))
                if !matches!(via, Some(Resolution::Ambiguous(_))) =>
            {
                let via = match via {
                    Some(Resolution::Unique(via)) => Some(via),
                    _ => None,
                };
                Endpoints::Resolved { from, via, to }
            },
            (mut f, mut v, mut t) => Endpoints::Ambiguous {
                from: f.candidates(),
                via: v.as_mut().map(Resolution::candidates).unwrap_or_default(),
                to: t.candidates(),
            },
        })
    }

    /// Request parameters for a trip query, without the reference time
    fn journey_params(
        &self,
        query: &TripsQuery,
        from: &Location,
        via: Option<&Location>,
        to: &Location,
    ) -> Result<Params, ProviderError> {
        let mut params = endpoint_params("from", from)?;
        if let Some(via) = via {
            let id = via
                .id()
                .filter(|_| via.location_type() == LocationType::Station)
                .ok_or_else(|| ProviderError::precondition("via must be a station"))?;
            params.push(param("via", id));
        }
        params.extend(endpoint_params("to", to)?);

        params.push(param("results", self.config.max_results));
        params.push(param("stopovers", self.config.include_stopovers));
        params.push(param("polylines", self.config.include_polylines));
        params.push(param("remarks", true));
        params.push(param("language", &self.config.language));

        let products = query.options.products.unwrap_or(self.config.default_products);
        let products = product_params(products).ok_or_else(|| {
            ProviderError::precondition(format!("no product in {products} can be filtered"))
        })?;
        for (product, enabled) in products {
            params.push(param(product, enabled));
        }

        if let Some(speed) = query.options.walk_speed {
            let speed = match speed {
                WalkSpeed::Slow => "slow",
                WalkSpeed::Normal => "normal",
                WalkSpeed::Fast => "fast",
            };
            params.push(param("walkingSpeed", speed));
        }
        if let Some(accessibility) = query.options.accessibility {
            let accessibility = match accessibility {
                Accessibility::Neutral => "none",
                Accessibility::Limited => "partial",
                Accessibility::BarrierFree => "complete",
            };
            params.push(param("accessibility", accessibility));
        }
        match query.options.optimize {
            Some(Optimize::LeastChanges) => params.push(param("transfers", 0)),
            Some(other) => debug!(optimize = ?other, "Routing preference not supported, ignored"),
            None => {},
        }

        Ok(params)
    }

    /// Map a failed journey request to the trip status it stands for
    fn trips_failure(&self, err: &HafasError) -> QueryTripsResult {
        let header = self.header(None);
        let status = err
            .trips_status()
            .or_else(|| err.is_not_found().then_some(TripsStatus::NoTrips));
        match status {
            Some(status) => {
                info!(%status, error = %err, "Backend answered trip query with a status");
                QueryTripsResult::with_status(header.clone(), status)
                    .unwrap_or_else(|_| QueryTripsResult::service_down(header))
            },
            None => {
                warn!(error = %err, "Trip query failed");
                QueryTripsResult::service_down(header)
            },
        }
    }

    async fn journeys(&self, params: &[(String, String)]) -> Result<JourneyPage, QueryTripsResult> {
        let url = self
            .endpoint(&["journeys"])
            .map_err(|e| self.trips_failure(&e))?;
        let (uri, raw): (_, RawJourneysResponse) = self
            .fetch_json(url, params)
            .await
            .map_err(|e| self.trips_failure(&e))?;

        let mut trips: Vec<Trip> = Vec::with_capacity(raw.journeys.len());
        for (index, value) in raw.journeys.iter().enumerate() {
            match convert_journey(value) {
                Ok(trip) if trips.contains(&trip) => debug!(index, "Dropping duplicate trip"),
                Ok(trip) => trips.push(trip),
                Err(e) => warn!(index, error = %e, "Dropping unparseable trip"),
            }
        }
        debug!(count = trips.len(), "Journeys parsed");

        Ok(JourneyPage {
            header: self.header(raw.realtime_data_updated_at),
            uri,
            trips,
            earlier_ref: raw.earlier_ref,
            later_ref: raw.later_ref,
        })
    }
}

fn convert_locations(raw: &[RawLocation], types: LocationTypes) -> Vec<Location> {
    raw.iter()
        .filter_map(|r| match convert_location(r) {
            Ok(location) => Some(location),
            Err(e) => {
                warn!(error = %e, "Dropping unparseable location");
                None
            },
        })
        .filter(|l| types.contains(l.location_type()))
        .collect()
}

fn backend_error(status: StatusCode, body: &str) -> HafasError {
    let structured = serde_json::from_str::<RawErrorBody>(body)
        .ok()
        .filter(|raw| raw.is_hafas_error.is_some() || raw.code.is_some() || raw.hafas_code.is_some());

    match structured {
        Some(raw) => HafasError::Backend {
            code: raw.code.unwrap_or_else(|| {
                if status == StatusCode::NOT_FOUND {
                    "NOT_FOUND".to_string()
                } else {
                    "SERVER_ERROR".to_string()
                }
            }),
            hafas_code: raw.hafas_code,
            message: raw
                .message
                .or(raw.msg)
                .unwrap_or_else(|| format!("HTTP {status}")),
        },
        None if status == StatusCode::NOT_FOUND => HafasError::Backend {
            code: "NOT_FOUND".to_string(),
            hafas_code: None,
            message: format!("HTTP {status}"),
        },
        None => HafasError::RequestFailed(format!("HTTP {status}")),
    }
}

/// `from`/`to` parameters for a resolved location
fn endpoint_params(role: &str, location: &Location) -> Result<Params, ProviderError> {
    let key = |field: &str| format!("{role}.{field}");
    match (location.location_type(), location.id(), location.coordinate()) {
        (LocationType::Station, Some(id), _) => Ok(vec![param(role, id)]),
        (LocationType::Poi, Some(id), Some(point)) => Ok(vec![
            param(&key("id"), id),
            param(&key("name"), location.unique_short_name()),
            param(&key("latitude"), format!("{:.6}", point.latitude())),
            param(&key("longitude"), format!("{:.6}", point.longitude())),
        ]),
        (_, _, Some(point)) => Ok(vec![
            param(&key("latitude"), format!("{:.6}", point.latitude())),
            param(&key("longitude"), format!("{:.6}", point.longitude())),
            param(&key("address"), location.unique_short_name()),
        ]),
        _ => Err(ProviderError::precondition(format!(
            "{role} location has neither a station id nor a coordinate"
        ))),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn distance_to(center: Point, location: &Location, reported: Option<u32>) -> u32 {
    reported
        .or_else(|| location.coordinate().map(|p| center.distance_m(&p).round() as u32))
        .unwrap_or(u32::MAX)
}

#[async_trait]
impl TransitProvider for HafasProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    #[instrument(skip(self), fields(text = %query.text))]
    async fn suggest_locations(
        &self,
        query: &SuggestQuery,
    ) -> Result<SuggestLocationsResult, ProviderError> {
        let header = self.header(None);
        let text = query.text.trim();
        if text.is_empty() {
            return Ok(SuggestLocationsResult::ok(header, Vec::new()));
        }

        let locations = self
            .search_locations(text, query.types, self.limit(query.max_results))
            .await?;

        // backend order is its relevance ranking
        let count = locations.len();
        let suggestions = locations
            .into_iter()
            .enumerate()
            .map(|(rank, location)| {
                let priority = i32::try_from(count - rank).unwrap_or(i32::MAX);
                SuggestedLocation::new(location, priority)
            })
            .collect();

        Ok(SuggestLocationsResult::ok(header, suggestions))
    }

    #[instrument(skip(self))]
    async fn query_nearby_locations(
        &self,
        query: &NearbyQuery,
    ) -> Result<NearbyLocationsResult, ProviderError> {
        query.validate()?;
        let header = self.header(None);

        let center = match (query.anchor.coordinate(), query.anchor.id()) {
            (Some(point), _) => point,
            (None, Some(id)) => match self.station_coordinate(id).await {
                Ok(Some(point)) => point,
                Ok(None) => {
                    info!(id, "Anchor station has no coordinate");
                    return Ok(NearbyLocationsResult::invalid_id(header));
                },
                Err(e) if e.is_not_found() => {
                    info!(id, "Unknown anchor station");
                    return Ok(NearbyLocationsResult::invalid_id(header));
                },
                Err(e) => return Err(e.into()),
            },
            (None, None) => return Ok(NearbyLocationsResult::invalid_id(header)),
        };

        let limit = self.limit(query.max_results);
        let mut params = vec![
            param("latitude", format!("{:.6}", center.latitude())),
            param("longitude", format!("{:.6}", center.longitude())),
            param("results", limit),
            param("stops", query.types.contains(LocationType::Station)),
            param("poi", query.types.contains(LocationType::Poi)),
            param("linesOfStops", false),
            param("language", &self.config.language),
        ];
        if query.max_distance_m > 0 {
            params.push(param("distance", query.max_distance_m));
        }

        let (_, raw): (_, Vec<RawLocation>) = self
            .fetch_json(self.endpoint(&["locations", "nearby"])?, &params)
            .await?;

        let mut located: Vec<(u32, Location)> = raw
            .iter()
            .filter_map(|r| match convert_location(r) {
                Ok(location) => Some((distance_to(center, &location, r.distance), location)),
                Err(e) => {
                    warn!(error = %e, "Dropping unparseable nearby location");
                    None
                },
            })
            .filter(|(_, l)| query.types.contains(l.location_type()))
            .collect();
        located.sort_by_key(|(distance, _)| *distance);
        located.truncate(limit);

        debug!(count = located.len(), "Nearby locations found");
        Ok(NearbyLocationsResult::ok(
            header,
            located.into_iter().map(|(_, l)| l).collect(),
        ))
    }

    #[instrument(skip(self), fields(station = %query.station_id))]
    async fn query_departures(
        &self,
        query: &DeparturesQuery,
    ) -> Result<QueryDeparturesResult, ProviderError> {
        query.validate()?;

        let limit = self.limit(query.max_departures);
        let mut params = vec![
            param("results", limit),
            param("duration", DEPARTURES_DURATION_MINUTES),
            param("includeRelatedStations", query.equivalent_stations),
            param("remarks", true),
            param("linesOfStops", false),
            param("language", &self.config.language),
        ];
        if let Some(time) = query.time {
            params.push(param("when", time.to_rfc3339()));
        }

        let response = match self.endpoint(&["stops", &query.station_id, "departures"]) {
            Ok(url) => self.fetch_json::<RawDeparturesResponse>(url, &params).await,
            Err(e) => Err(e),
        };
        let (raw, realtime_updated_at) = match response {
            Ok((_, response)) => response.into_parts(),
            Err(e) if e.is_not_found() => {
                info!(error = %e, "Unknown station");
                return Ok(QueryDeparturesResult::invalid_station(self.header(None)));
            },
            Err(e) => {
                warn!(error = %e, "Departure board unavailable");
                return Ok(QueryDeparturesResult::service_down(self.header(None)));
            },
        };

        let requested = Location::station(query.station_id.clone());
        let mut blocks: Vec<(Location, Vec<Departure>)> = Vec::new();
        for (index, value) in raw.iter().enumerate() {
            let (stop, departure) = match convert_departure(value) {
                Ok(converted) => converted,
                Err(e) => {
                    warn!(index, error = %e, "Dropping unparseable departure");
                    continue;
                },
            };
            let location = match stop {
                Some(stop)
                    if query.equivalent_stations
                        || stop.id() == Some(query.station_id.as_str()) =>
                {
                    stop
                },
                _ => requested.clone(),
            };
            match blocks.iter_mut().find(|(l, _)| l.id() == location.id()) {
                Some((_, departures)) => departures.push(departure),
                None => blocks.push((location, vec![departure])),
            }
        }

        let boards = blocks
            .into_iter()
            .map(|(location, departures)| {
                let mut board =
                    StationDepartures::new(location, departures).with_lines_from_departures();
                board.truncate(limit);
                board
            })
            .collect::<Vec<_>>();

        debug!(stations = boards.len(), "Departure boards built");
        Ok(QueryDeparturesResult::ok(
            self.header(realtime_updated_at),
            boards,
        ))
    }

    #[instrument(skip(self, query), fields(departure = query.departure, time = %query.time))]
    async fn request_trips(&self, query: &TripsQuery) -> Result<QueryTripsResult, ProviderError> {
        let header = self.header(None);
        let (from, via, to) = match self.resolve_endpoints(query).await {
            Ok(Endpoints::Resolved { from, via, to }) => (from, via, to),
            Ok(Endpoints::Unknown(status)) => {
                info!(%status, "Trip endpoint not found");
                return QueryTripsResult::with_status(header, status);
            },
            Ok(Endpoints::Ambiguous { from, via, to }) => {
                info!(
                    from = from.len(),
                    via = via.len(),
                    to = to.len(),
                    "Trip endpoints are ambiguous"
                );
                return Ok(QueryTripsResult::ambiguous(header, from, via, to));
            },
            Err(e) => {
                warn!(error = %e, "Could not resolve trip endpoints");
                return Ok(QueryTripsResult::service_down(header));
            },
        };

        let params = self.journey_params(query, &from, via.as_ref(), &to)?;
        let mut request = params.clone();
        let time_key = if query.departure { "departure" } else { "arrival" };
        request.push(param(time_key, query.time.to_rfc3339()));

        let page = match self.journeys(&request).await {
            Ok(page) => page,
            Err(result) => return Ok(result),
        };
        if page.trips.is_empty() {
            info!("Backend returned no usable trips");
            return QueryTripsResult::with_status(page.header, TripsStatus::NoTrips);
        }

        let token = JourneyToken {
            params,
            earlier_ref: page.earlier_ref,
            later_ref: page.later_ref,
        };
        Ok(
            QueryTripsResult::ok(page.header, page.trips, token.to_context()?)
                .with_locations(Some(from), via, Some(to))
                .with_query_uri(page.uri.as_str()),
        )
    }

    #[instrument(skip(self, context))]
    async fn request_more_trips(
        &self,
        context: &application::TripsContext,
        later: bool,
    ) -> Result<QueryTripsResult, ProviderError> {
        let token = JourneyToken::from_context(context)?;
        let Some(reference) = token.reference(later) else {
            return Err(ProviderError::precondition(format!(
                "context has no {} reference",
                if later { "later" } else { "earlier" }
            )));
        };

        let mut request = token.params.clone();
        request.push(param(if later { "laterThan" } else { "earlierThan" }, reference));

        let page = match self.journeys(&request).await {
            Ok(page) => page,
            Err(result) => return Ok(result),
        };
        let next = token.advance(later, page.earlier_ref, page.later_ref);

        Ok(
            QueryTripsResult::ok(page.header, page.trips, next.to_context()?)
                .with_query_uri(page.uri.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use application::TripOptions;
    use chrono::{TimeZone, Utc};
    use domain::{Product, ProductSet};

    use super::*;

    fn provider() -> HafasProvider {
        HafasProvider::new(&HafasConfig::for_testing()).unwrap()
    }

    fn value<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider();
        assert_eq!(provider.provider_name(), "hafas");
        assert!(provider.has_capability(Capability::TripsVia));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = HafasConfig {
            timeout_secs: 0,
            ..HafasConfig::default()
        };
        assert!(matches!(
            HafasProvider::new(&config),
            Err(HafasError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_endpoint_paths() {
        let provider = provider();
        let url = provider.endpoint(&["stops", "8000191", "departures"]).unwrap();
        assert_eq!(url.as_str(), "https://v6.db.transport.rest/stops/8000191/departures");

        let escaped = provider.endpoint(&["stops", "a/b"]).unwrap();
        assert_eq!(escaped.path(), "/stops/a%2Fb");
    }

    #[test]
    fn test_header_network_and_time() {
        let header = provider().header(Some(1_770_796_800));
        assert_eq!(header.network, "v6.db.transport.rest");
        assert_eq!(header.server_product, "hafas-rest-api");
        assert_eq!(
            header.server_time,
            Some(Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_endpoint_params() {
        let station = Location::station("8000191");
        assert_eq!(
            endpoint_params("from", &station).unwrap(),
            vec![param("from", "8000191")]
        );

        let address = Location::new(
            LocationType::Address,
            None,
            Some(Point::from_e6(49_008_184, 8_400_736)),
            None,
            Some("Marktplatz".to_string()),
        )
        .unwrap();
        let params = endpoint_params("to", &address).unwrap();
        assert_eq!(value(&params, "to.latitude"), Some("49.008184"));
        assert_eq!(value(&params, "to.longitude"), Some("8.400736"));
        assert_eq!(value(&params, "to.address"), Some("Marktplatz"));

        assert!(endpoint_params("from", &Location::any("Hbf")).is_err());
    }

    #[test]
    fn test_journey_params() {
        let provider = provider();
        let time = Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap();
        let query = TripsQuery::departing(Location::station("1"), Location::station("2"), time)
            .with_options(TripOptions {
                products: Some(ProductSet::EMPTY.with(Product::Tram)),
                walk_speed: Some(WalkSpeed::Slow),
                accessibility: Some(Accessibility::BarrierFree),
                optimize: Some(Optimize::LeastChanges),
            });

        let params = provider
            .journey_params(&query, &query.from, Some(&Location::station("9")), &query.to)
            .unwrap();
        assert_eq!(value(&params, "from"), Some("1"));
        assert_eq!(value(&params, "via"), Some("9"));
        assert_eq!(value(&params, "to"), Some("2"));
        assert_eq!(value(&params, "tram"), Some("true"));
        assert_eq!(value(&params, "suburban"), Some("false"));
        assert_eq!(value(&params, "walkingSpeed"), Some("slow"));
        assert_eq!(value(&params, "accessibility"), Some("complete"));
        assert_eq!(value(&params, "transfers"), Some("0"));
        assert_eq!(value(&params, "departure"), None);
    }

    #[test]
    fn test_cable_car_only_filter_is_rejected() {
        let provider = provider();
        let time = Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap();
        let query = TripsQuery::departing(Location::station("1"), Location::station("2"), time)
            .with_products(ProductSet::EMPTY.with(Product::CableCar));
        let err = provider
            .journey_params(&query, &query.from, None, &query.to)
            .unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_via_must_be_station() {
        let provider = provider();
        let time = Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap();
        let query = TripsQuery::departing(Location::station("1"), Location::station("2"), time);
        let via = Location::coord(Point::from_e6(49_000_000, 8_400_000));
        let err = provider
            .journey_params(&query, &query.from, Some(&via), &query.to)
            .unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_backend_error_parsing() {
        let body = r#"{"isHafasError":true,"code":"NOT_FOUND","hafasCode":"H890","message":"no connections found"}"#;
        let err = backend_error(StatusCode::NOT_FOUND, body);
        assert!(err.is_not_found());
        assert_eq!(err.trips_status(), Some(TripsStatus::NoTrips));

        let err = backend_error(StatusCode::NOT_FOUND, r#"{"foo":1}"#);
        assert!(err.is_not_found());

        let err = backend_error(StatusCode::INTERNAL_SERVER_ERROR, "{}");
        assert!(matches!(err, HafasError::RequestFailed(_)));
    }

    #[test]
    fn test_json_detection() {
        assert!(looks_like_json("  {\"a\":1}"));
        assert!(looks_like_json("[]"));
        assert!(!looks_like_json("<html></html>"));
        assert!(!looks_like_json(""));
    }

    #[test]
    fn test_distance_prefers_reported_value() {
        let center = Point::from_e6(49_008_184, 8_400_736);
        let station = Location::station("1").with_coord(Point::from_e6(49_009_184, 8_400_736));
        assert_eq!(distance_to(center, &station, Some(42)), 42);
        let computed = distance_to(center, &station, None);
        assert!((100..=120).contains(&computed), "{computed}");
        assert_eq!(distance_to(center, &Location::station("2"), None), u32::MAX);
    }
}
