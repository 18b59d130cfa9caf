//! Transit provider port
//!
//! The capability interface every backend adapter implements. Adapters are
//! picked by the caller at construction time and receive their configuration
//! explicitly.

use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::queries::{DeparturesQuery, NearbyQuery, SuggestQuery, TripsQuery};
use crate::error::ProviderError;
use crate::pagination::{DepartureWindow, TripsContext, retain_monotonic};
use crate::results::{
    NearbyLocationsResult, QueryDeparturesResult, QueryTripsResult, SuggestLocationsResult,
};

/// Operation an adapter may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Suggest,
    Nearby,
    Departures,
    Trips,
    /// Trips through an intermediate stop
    TripsVia,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Suggest => "suggest",
            Self::Nearby => "nearby",
            Self::Departures => "departures",
            Self::Trips => "trips",
            Self::TripsVia => "trips via",
        };
        f.write_str(name)
    }
}

/// Port for one public-transit backend
///
/// Business outcomes come back as statuses inside the results; `Err` is
/// reserved for transport failures, unexpected responses and local
/// precondition violations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransitProvider: Send + Sync {
    /// Stable provider name, stamped into every pagination context
    fn provider_name(&self) -> &'static str;

    /// Operations this adapter supports
    fn capabilities(&self) -> &'static [Capability];

    /// Whether the adapter supports the operation
    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Suggest locations for free text
    async fn suggest_locations(
        &self,
        query: &SuggestQuery,
    ) -> Result<SuggestLocationsResult, ProviderError>;

    /// Locations around a coordinate or station
    async fn query_nearby_locations(
        &self,
        query: &NearbyQuery,
    ) -> Result<NearbyLocationsResult, ProviderError>;

    /// Departure boards for a station
    async fn query_departures(
        &self,
        query: &DeparturesQuery,
    ) -> Result<QueryDeparturesResult, ProviderError>;

    /// Backend half of a trip query
    ///
    /// Callers use [`TransitProvider::query_trips`].
    async fn request_trips(&self, query: &TripsQuery) -> Result<QueryTripsResult, ProviderError>;

    /// Backend half of a continuation
    ///
    /// Called only after the context was checked to belong to this adapter
    /// and to allow the requested direction. Callers use
    /// [`TransitProvider::query_more_trips`].
    async fn request_more_trips(
        &self,
        context: &TripsContext,
        later: bool,
    ) -> Result<QueryTripsResult, ProviderError>;

    /// Query trips, opening a pagination session
    async fn query_trips(&self, query: &TripsQuery) -> Result<QueryTripsResult, ProviderError> {
        ensure_capability(self, Capability::Trips)?;
        if query.via.is_some() {
            ensure_capability(self, Capability::TripsVia)?;
        }
        query.validate()?;

        let mut result = self.request_trips(query).await?;
        let window = DepartureWindow::of(result.trips());
        if let Some(context) = result.context_mut() {
            context.set_window(window);
        }
        Ok(result)
    }

    /// Continue a session with earlier or later trips
    ///
    /// Closed directions and foreign contexts are rejected without a
    /// backend round trip. Returned trips depart strictly after (or before)
    /// every trip seen so far in the session.
    async fn query_more_trips(
        &self,
        context: &TripsContext,
        later: bool,
    ) -> Result<QueryTripsResult, ProviderError> {
        ensure_capability(self, Capability::Trips)?;
        if context.provider() != self.provider_name() {
            return Err(ProviderError::precondition(format!(
                "context belongs to {}, not {}",
                context.provider(),
                self.provider_name()
            )));
        }
        context.ensure_can_query(later)?;

        let mut result = self.request_more_trips(context, later).await?;
        if !result.status().is_ok() {
            return Ok(result);
        }

        retain_monotonic(result.trips_mut(), context.window(), later);
        let window = DepartureWindow::of(result.trips())
            .map(|page| page.union(context.window()))
            .or_else(|| context.window());
        if let Some(next) = result.context_mut() {
            next.set_window(window);
        }
        debug!(
            provider = self.provider_name(),
            later,
            trips = result.trips().len(),
            "Continued trip session"
        );
        Ok(result)
    }
}

fn ensure_capability<P: TransitProvider + ?Sized>(
    provider: &P,
    capability: Capability,
) -> Result<(), ProviderError> {
    if provider.has_capability(capability) {
        Ok(())
    } else {
        Err(ProviderError::precondition(format!(
            "{} does not support {capability}",
            provider.provider_name()
        )))
    }
}
