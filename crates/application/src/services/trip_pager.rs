//! Trip pagination session
//!
//! Drives one trip-query session over a provider: the initial query, then
//! any number of earlier/later continuations, accumulating a deduplicated
//! trip list.

use std::{fmt, sync::Arc};

use domain::Trip;
use tracing::{debug, info, instrument};

use crate::{
    error::ProviderError,
    pagination::TripsContext,
    ports::{TransitProvider, TripsQuery},
    results::{QueryTripsResult, TripsStatus},
};

/// One pagination session
///
/// Continuations borrow the pager mutably, so one context is never extended
/// concurrently.
pub struct TripPager {
    provider: Arc<dyn TransitProvider>,
    context: TripsContext,
    trips: Vec<Trip>,
}

impl fmt::Debug for TripPager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripPager")
            .field("provider", &self.provider.provider_name())
            .field("context", &self.context)
            .field("trips", &self.trips.len())
            .finish()
    }
}

impl TripPager {
    /// Run the initial query
    ///
    /// Returns the raw result when the status is not OK, since there is no
    /// session to continue.
    #[instrument(skip(provider, query), fields(provider = provider.provider_name()))]
    pub async fn start(
        provider: Arc<dyn TransitProvider>,
        query: &TripsQuery,
    ) -> Result<Result<Self, QueryTripsResult>, ProviderError> {
        let result = provider.query_trips(query).await?;
        if result.status() != TripsStatus::Ok {
            info!(status = %result.status(), "Trip query did not open a session");
            return Ok(Err(result));
        }

        let (trips, context) = result.into_parts();
        let Some(context) = context else {
            return Err(ProviderError::UnexpectedResponse(
                "OK trip result without pagination context".to_string(),
            ));
        };

        let mut pager = Self {
            provider,
            context,
            trips: Vec::new(),
        };
        pager.absorb(trips);
        Ok(Ok(pager))
    }

    /// Resume a session from a previously obtained context
    #[must_use]
    pub fn resume(provider: Arc<dyn TransitProvider>, context: TripsContext) -> Self {
        Self {
            provider,
            context,
            trips: Vec::new(),
        }
    }

    /// Load later trips, returning how many new trips were added
    pub async fn later(&mut self) -> Result<usize, ProviderError> {
        self.more(true).await
    }

    /// Load earlier trips, returning how many new trips were added
    pub async fn earlier(&mut self) -> Result<usize, ProviderError> {
        self.more(false).await
    }

    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    async fn more(&mut self, later: bool) -> Result<usize, ProviderError> {
        // checked here as well so a closed direction never reaches the provider
        self.context.ensure_can_query(later)?;

        let result = self.provider.query_more_trips(&self.context, later).await?;
        if result.status() != TripsStatus::Ok {
            info!(status = %result.status(), later, "Continuation returned no trips");
            return Ok(0);
        }

        let (trips, context) = result.into_parts();
        let added = self.absorb(trips);
        if let Some(context) = context {
            self.context = context;
        }
        debug!(added, total = self.trips.len(), "Continuation absorbed");
        Ok(added)
    }

    fn absorb(&mut self, trips: Vec<Trip>) -> usize {
        let before = self.trips.len();
        for trip in trips {
            if !self.trips.contains(&trip) {
                self.trips.push(trip);
            }
        }
        self.trips.sort_by_key(Trip::first_departure_time);
        self.trips.len() - before
    }

    /// All trips seen so far, ordered by first departure
    #[must_use]
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Current continuation context
    #[must_use]
    pub const fn context(&self) -> &TripsContext {
        &self.context
    }

    #[must_use]
    pub const fn can_query_earlier(&self) -> bool {
        self.context.can_query_earlier()
    }

    #[must_use]
    pub const fn can_query_later(&self) -> bool {
        self.context.can_query_later()
    }

    /// End the session, keeping the trips
    #[must_use]
    pub fn into_trips(self) -> Vec<Trip> {
        self.trips
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domain::{Line, Location, Product, PublicLeg, Stop};

    use super::*;
    use crate::{
        pagination::ContextToken,
        ports::{
            Capability, DeparturesQuery, MockTransitProvider, NearbyQuery, SuggestQuery,
        },
        results::{
            NearbyLocationsResult, QueryDeparturesResult, ResultHeader, SuggestLocationsResult,
        },
    };

    const NAME: &str = "fake";

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 11, hour, minute, 0).unwrap()
    }

    fn trip_at(minutes_after_eight: i64) -> Trip {
        let dep = at(8, 0) + Duration::minutes(minutes_after_eight);
        let leg = PublicLeg::new(
            Line::new(Some(Product::Rail), "S5"),
            Stop::new(Location::station("a")).with_departure(Some(dep), None),
            Stop::new(Location::station("b")).with_arrival(Some(dep + Duration::minutes(25)), None),
        )
        .unwrap();
        Trip::new(None, vec![leg.into()]).unwrap()
    }

    fn header() -> ResultHeader {
        ResultHeader::new(NAME, "fake")
    }

    fn context(earlier: bool, later: bool) -> TripsContext {
        TripsContext::new(NAME, earlier, later, ContextToken::from_bytes(vec![]))
    }

    /// Timetable with a departure every ten minutes; pages of three that
    /// overlap by one trip, as many backends do
    #[derive(Default)]
    struct FakeProvider {
        continuations: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl TransitProvider for FakeProvider {
        fn provider_name(&self) -> &'static str {
            NAME
        }

        fn capabilities(&self) -> &'static [Capability] {
            &[Capability::Trips]
        }

        async fn suggest_locations(
            &self,
            _query: &SuggestQuery,
        ) -> Result<SuggestLocationsResult, ProviderError> {
            Ok(SuggestLocationsResult::ok(header(), vec![]))
        }

        async fn query_nearby_locations(
            &self,
            _query: &NearbyQuery,
        ) -> Result<NearbyLocationsResult, ProviderError> {
            Ok(NearbyLocationsResult::ok(header(), vec![]))
        }

        async fn query_departures(
            &self,
            _query: &DeparturesQuery,
        ) -> Result<QueryDeparturesResult, ProviderError> {
            Ok(QueryDeparturesResult::service_down(header()))
        }

        async fn request_trips(
            &self,
            _query: &TripsQuery,
        ) -> Result<QueryTripsResult, ProviderError> {
            Ok(QueryTripsResult::ok(
                header(),
                vec![trip_at(0), trip_at(10), trip_at(20)],
                context(true, true),
            ))
        }

        async fn request_more_trips(
            &self,
            ctx: &TripsContext,
            later: bool,
        ) -> Result<QueryTripsResult, ProviderError> {
            self.continuations.lock().unwrap().push(later);
            let window = ctx.window().unwrap();
            let anchor = if later { window.latest } else { window.earliest };
            let anchor = (anchor - at(8, 0)).num_minutes();
            let page = if later {
                vec![trip_at(anchor), trip_at(anchor + 10), trip_at(anchor + 20)]
            } else {
                vec![trip_at(anchor - 20), trip_at(anchor - 10), trip_at(anchor)]
            };
            Ok(QueryTripsResult::ok(header(), page, context(true, later)))
        }
    }

    fn query() -> TripsQuery {
        TripsQuery::departing(Location::station("a"), Location::station("b"), at(8, 0))
    }

    #[tokio::test]
    async fn later_pages_strictly_advance() {
        let provider = Arc::new(FakeProvider::default());
        let mut pager = TripPager::start(provider.clone(), &query())
            .await
            .unwrap()
            .unwrap();
        let first_page_max = pager.trips().last().unwrap().first_departure_time();

        let added = pager.later().await.unwrap();
        assert_eq!(added, 2);
        let new_min = pager.trips()[3].first_departure_time();
        assert!(new_min > first_page_max);
        assert_eq!(pager.trips().len(), 5);
        assert_eq!(*provider.continuations.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn earlier_pages_strictly_recede() {
        let provider = Arc::new(FakeProvider::default());
        let mut pager = TripPager::start(provider, &query()).await.unwrap().unwrap();

        let added = pager.earlier().await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(pager.trips()[0].first_departure_time(), at(7, 40));
        // the fake closes the later direction after an earlier page
        assert!(!pager.can_query_later());
        assert!(pager.later().await.unwrap_err().is_precondition());
    }

    #[tokio::test]
    async fn provider_filters_overlap_without_pager() {
        let provider = FakeProvider::default();
        let first = provider.query_trips(&query()).await.unwrap();
        let ctx = first.context().unwrap();
        let next = provider.query_more_trips(ctx, true).await.unwrap();

        let max_before = first
            .trips()
            .iter()
            .map(Trip::first_departure_time)
            .max()
            .unwrap();
        assert!(
            next.trips()
                .iter()
                .all(|t| t.first_departure_time() > max_before)
        );
        let window = next.context().unwrap().window().unwrap();
        assert_eq!(window.earliest, at(8, 0));
        assert_eq!(window.latest, at(8, 40));
    }

    #[tokio::test]
    async fn foreign_context_is_rejected_locally() {
        let provider = FakeProvider::default();
        let foreign = TripsContext::new("other", true, true, ContextToken::from_bytes(vec![]));
        let err = provider.query_more_trips(&foreign, true).await.unwrap_err();
        assert!(err.is_precondition());
        assert!(provider.continuations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_direction_never_reaches_provider() {
        let mut mock = MockTransitProvider::new();
        mock.expect_provider_name().return_const(NAME);
        mock.expect_query_more_trips().never();
        mock.expect_request_more_trips().never();

        let mut pager = TripPager::resume(Arc::new(mock), context(true, false));
        let err = pager.later().await.unwrap_err();
        assert!(matches!(err, ProviderError::Precondition(_)));
        assert!(pager.trips().is_empty());
    }

    #[tokio::test]
    async fn non_ok_start_returns_result() {
        let mut mock = MockTransitProvider::new();
        mock.expect_provider_name().return_const(NAME);
        mock.expect_query_trips().times(1).returning(|_| {
            Ok(QueryTripsResult::ambiguous(
                header(),
                vec![Location::any("Hbf"), Location::station("1")],
                vec![],
                vec![],
            ))
        });

        let outcome = TripPager::start(Arc::new(mock), &query()).await.unwrap();
        let result = outcome.unwrap_err();
        assert_eq!(result.status(), TripsStatus::Ambiguous);
        assert_eq!(result.ambiguous_from().len(), 2);
        assert!(result.ambiguous_to().is_empty());
    }

    #[tokio::test]
    async fn non_ok_continuation_adds_nothing() {
        let mut mock = MockTransitProvider::new();
        mock.expect_provider_name().return_const(NAME);
        mock.expect_query_more_trips()
            .times(1)
            .returning(|_, _| Ok(QueryTripsResult::service_down(header())));

        let mut pager = TripPager::resume(Arc::new(mock), context(true, true));
        assert_eq!(pager.later().await.unwrap(), 0);
        assert!(pager.can_query_later());
    }
}
