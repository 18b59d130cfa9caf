//! Pagination context protocol
//!
//! A trip query yields a [`TripsContext`]: an adapter-defined token plus
//! the two capability flags. The core never looks inside the token; it
//! only threads it back to the adapter that created it, guards the flags
//! locally and keeps continuation pages monotonic in departure time.

use chrono::{DateTime, Utc};
use domain::Trip;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::ProviderError;

/// Opaque adapter-owned continuation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextToken(Vec<u8>);

impl ContextToken {
    /// Wrap raw bytes
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Serialize an adapter-defined state struct into a token
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedResponse` if the state cannot be serialized.
    pub fn encode<T: Serialize>(state: &T) -> Result<Self, ProviderError> {
        serde_json::to_vec(state)
            .map(Self)
            .map_err(|e| ProviderError::UnexpectedResponse(format!("cannot encode context: {e}")))
    }

    /// Deserialize the adapter-defined state struct back
    ///
    /// # Errors
    ///
    /// Returns `Precondition` if the token was not produced by this adapter.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_slice(&self.0)
            .map_err(|e| ProviderError::precondition(format!("foreign or corrupt context: {e}")))
    }

    /// Raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// First-departure range covered by the pages seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureWindow {
    /// Earliest first departure seen
    pub earliest: DateTime<Utc>,
    /// Latest first departure seen
    pub latest: DateTime<Utc>,
}

impl DepartureWindow {
    /// Window spanned by a page of trips, `None` for an empty page
    #[must_use]
    pub fn of(trips: &[Trip]) -> Option<Self> {
        let mut times = trips.iter().map(Trip::first_departure_time);
        let first = times.next()?;
        Some(times.fold(
            Self {
                earliest: first,
                latest: first,
            },
            |window, time| Self {
                earliest: window.earliest.min(time),
                latest: window.latest.max(time),
            },
        ))
    }

    /// Smallest window covering both
    #[must_use]
    pub fn union(self, other: Option<Self>) -> Self {
        match other {
            Some(other) => Self {
                earliest: self.earliest.min(other.earliest),
                latest: self.latest.max(other.latest),
            },
            None => self,
        }
    }
}

/// Continuation state of one trip-query session
///
/// Not designed for concurrent extension: callers must serialize
/// continuations of the same context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripsContext {
    provider: String,
    can_query_earlier: bool,
    can_query_later: bool,
    token: ContextToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    window: Option<DepartureWindow>,
}

impl TripsContext {
    /// Create a context for the named provider
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        can_query_earlier: bool,
        can_query_later: bool,
        token: ContextToken,
    ) -> Self {
        Self {
            provider: provider.into(),
            can_query_earlier,
            can_query_later,
            token,
            window: None,
        }
    }

    /// Name of the provider that created the context
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Whether earlier trips can be requested
    #[must_use]
    pub const fn can_query_earlier(&self) -> bool {
        self.can_query_earlier
    }

    /// Whether later trips can be requested
    #[must_use]
    pub const fn can_query_later(&self) -> bool {
        self.can_query_later
    }

    /// Adapter-owned token
    #[must_use]
    pub const fn token(&self) -> &ContextToken {
        &self.token
    }

    /// First-departure range covered so far in this session
    #[must_use]
    pub const fn window(&self) -> Option<DepartureWindow> {
        self.window
    }

    /// Reject a continuation the context does not allow
    ///
    /// # Errors
    ///
    /// Returns `Precondition` when the requested direction is closed.
    pub fn ensure_can_query(&self, later: bool) -> Result<(), ProviderError> {
        match (later, self.can_query_later, self.can_query_earlier) {
            (true, false, _) => Err(ProviderError::precondition(
                "context cannot query later trips",
            )),
            (false, _, false) => Err(ProviderError::precondition(
                "context cannot query earlier trips",
            )),
            _ => Ok(()),
        }
    }

    pub(crate) const fn set_window(&mut self, window: Option<DepartureWindow>) {
        self.window = window;
    }
}

/// Drop trips that would break continuation monotonicity
///
/// A later page keeps only trips departing strictly after everything seen;
/// an earlier page keeps only trips departing strictly before.
pub(crate) fn retain_monotonic(
    trips: &mut Vec<Trip>,
    window: Option<DepartureWindow>,
    later: bool,
) {
    let Some(window) = window else {
        return;
    };
    let before = trips.len();
    trips.retain(|trip| {
        let departure = trip.first_departure_time();
        if later {
            departure > window.latest
        } else {
            departure < window.earliest
        }
    });
    let dropped = before - trips.len();
    if dropped > 0 {
        debug!(dropped, later, "Dropped trips overlapping previous pages");
    }
}
