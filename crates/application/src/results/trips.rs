//! Trip query results

use domain::{Location, Trip};
use serde::{Deserialize, Serialize};

use super::header::ResultHeader;
use super::status::TripsStatus;
use crate::error::ProviderError;
use crate::pagination::TripsContext;

/// Result of a trips query or continuation
///
/// Trips and context are present only when the status is OK; ambiguity
/// candidates only when it is AMBIGUOUS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTripsResult {
    header: ResultHeader,
    status: TripsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    from: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    via: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to: Option<Location>,
    #[serde(default)]
    ambiguous_from: Vec<Location>,
    #[serde(default)]
    ambiguous_via: Vec<Location>,
    #[serde(default)]
    ambiguous_to: Vec<Location>,
    #[serde(default)]
    trips: Vec<Trip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<TripsContext>,
}

impl QueryTripsResult {
    /// Create an OK result with its continuation context
    #[must_use]
    pub fn ok(header: ResultHeader, trips: Vec<Trip>, context: TripsContext) -> Self {
        Self {
            trips,
            context: Some(context),
            ..Self::empty(header, TripsStatus::Ok)
        }
    }

    /// Create an AMBIGUOUS result
    ///
    /// Each list holds candidates for its role and stays empty for roles
    /// that resolved uniquely.
    #[must_use]
    pub fn ambiguous(
        header: ResultHeader,
        ambiguous_from: Vec<Location>,
        ambiguous_via: Vec<Location>,
        ambiguous_to: Vec<Location>,
    ) -> Self {
        Self {
            ambiguous_from,
            ambiguous_via,
            ambiguous_to,
            ..Self::empty(header, TripsStatus::Ambiguous)
        }
    }

    /// Create a result for any status that carries no payload
    ///
    /// # Errors
    ///
    /// Returns `Precondition` for `Ok` and `Ambiguous`, which need their own
    /// constructors.
    pub fn with_status(header: ResultHeader, status: TripsStatus) -> Result<Self, ProviderError> {
        match status {
            TripsStatus::Ok | TripsStatus::Ambiguous => Err(ProviderError::precondition(format!(
                "{status} result needs a payload"
            ))),
            _ => Ok(Self::empty(header, status)),
        }
    }

    /// Backend unavailable
    #[must_use]
    pub fn service_down(header: ResultHeader) -> Self {
        Self::empty(header, TripsStatus::ServiceDown)
    }

    fn empty(header: ResultHeader, status: TripsStatus) -> Self {
        Self {
            header,
            status,
            query_uri: None,
            from: None,
            via: None,
            to: None,
            ambiguous_from: Vec::new(),
            ambiguous_via: Vec::new(),
            ambiguous_to: Vec::new(),
            trips: Vec::new(),
            context: None,
        }
    }

    /// Record the locations the backend resolved the query to
    #[must_use]
    pub fn with_locations(
        mut self,
        from: Option<Location>,
        via: Option<Location>,
        to: Option<Location>,
    ) -> Self {
        self.from = from;
        self.via = via;
        self.to = to;
        self
    }

    /// Record the request URI for diagnostics
    #[must_use]
    pub fn with_query_uri(mut self, uri: impl Into<String>) -> Self {
        self.query_uri = Some(uri.into());
        self
    }

    #[must_use]
    pub const fn header(&self) -> &ResultHeader {
        &self.header
    }

    #[must_use]
    pub const fn status(&self) -> TripsStatus {
        self.status
    }

    /// Request URI, when the adapter recorded it
    #[must_use]
    pub fn query_uri(&self) -> Option<&str> {
        self.query_uri.as_deref()
    }

    /// Resolved origin
    #[must_use]
    pub const fn from(&self) -> Option<&Location> {
        self.from.as_ref()
    }

    /// Resolved intermediate stop
    #[must_use]
    pub const fn via(&self) -> Option<&Location> {
        self.via.as_ref()
    }

    /// Resolved destination
    #[must_use]
    pub const fn to(&self) -> Option<&Location> {
        self.to.as_ref()
    }

    /// Origin candidates
    #[must_use]
    pub fn ambiguous_from(&self) -> &[Location] {
        &self.ambiguous_from
    }

    /// Intermediate stop candidates
    #[must_use]
    pub fn ambiguous_via(&self) -> &[Location] {
        &self.ambiguous_via
    }

    /// Destination candidates
    #[must_use]
    pub fn ambiguous_to(&self) -> &[Location] {
        &self.ambiguous_to
    }

    /// Trips, empty unless the status is OK
    #[must_use]
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Continuation context, present only for OK results
    #[must_use]
    pub const fn context(&self) -> Option<&TripsContext> {
        self.context.as_ref()
    }

    /// Split into trips and context
    #[must_use]
    pub fn into_parts(self) -> (Vec<Trip>, Option<TripsContext>) {
        (self.trips, self.context)
    }

    pub(crate) const fn trips_mut(&mut self) -> &mut Vec<Trip> {
        &mut self.trips
    }

    pub(crate) const fn context_mut(&mut self) -> Option<&mut TripsContext> {
        self.context.as_mut()
    }
}
