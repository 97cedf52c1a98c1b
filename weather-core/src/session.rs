//! Search session state as immutable snapshots.
//!
//! Every transition returns a new [`Snapshot`]. A lookup captures a [`Ticket`]
//! when it starts; transitions presented with a ticket from an older
//! generation are ignored, so typing a new location supersedes whatever lookup
//! is still in flight. Dropping the [`WeatherSearch::search`] future cancels it.

use std::sync::Arc;

use crate::{
    Config,
    error::WeatherError,
    flag::FlagPolicy,
    location::{self, DisplayLocation},
    model::DailyForecast,
    provider::{self, ForecastService, GeocodingService},
};

/// The geocoder only searches once the query has this many characters.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub location: String,
    pub is_loading: bool,
    pub display_location: Option<DisplayLocation>,
    pub forecast: Option<DailyForecast>,
    pub error: Option<String>,
    generation: u64,
}

impl Snapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    /// Whether the current location is long enough to look up.
    pub fn needs_lookup(&self) -> bool {
        self.location.chars().count() >= MIN_QUERY_CHARS
    }

    /// New input. Starts a new generation; short input clears the forecast.
    pub fn with_location(&self, location: impl Into<String>) -> Snapshot {
        let mut next = Snapshot {
            location: location.into(),
            is_loading: false,
            error: None,
            generation: self.generation + 1,
            ..self.clone()
        };
        if !next.needs_lookup() {
            next.forecast = None;
        }
        next
    }

    pub fn geocode_started(&self, ticket: Ticket) -> Snapshot {
        self.advance(ticket, |s| {
            s.is_loading = true;
            s.error = None;
        })
    }

    pub fn geocode_done(&self, ticket: Ticket, display: DisplayLocation) -> Snapshot {
        self.advance(ticket, |s| s.display_location = Some(display))
    }

    pub fn forecast_done(&self, ticket: Ticket, forecast: DailyForecast) -> Snapshot {
        self.advance(ticket, |s| {
            s.forecast = Some(forecast);
            s.is_loading = false;
        })
    }

    pub fn failed(&self, ticket: Ticket, message: impl Into<String>) -> Snapshot {
        self.advance(ticket, |s| {
            s.error = Some(message.into());
            s.is_loading = false;
        })
    }

    /// Keep whichever of `self` and `result` belongs to the newer generation.
    pub fn merge(&self, result: Snapshot) -> Snapshot {
        if result.generation >= self.generation {
            result
        } else {
            tracing::debug!(
                stale = result.generation,
                current = self.generation,
                "discarding superseded lookup result"
            );
            self.clone()
        }
    }

    fn advance(&self, ticket: Ticket, apply: impl FnOnce(&mut Snapshot)) -> Snapshot {
        let mut next = self.clone();
        if ticket.0 != self.generation {
            tracing::debug!(stale = ticket.0, current = self.generation, "ignoring stale transition");
            return next;
        }
        apply(&mut next);
        next
    }
}

/// Geocode → display label → forecast, sequenced over a snapshot.
#[derive(Debug, Clone)]
pub struct WeatherSearch {
    geocoder: Arc<dyn GeocodingService>,
    forecaster: Arc<dyn ForecastService>,
    policy: FlagPolicy,
}

impl WeatherSearch {
    pub fn new(
        geocoder: Arc<dyn GeocodingService>,
        forecaster: Arc<dyn ForecastService>,
        policy: FlagPolicy,
    ) -> Self {
        Self { geocoder, forecaster, policy }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (geocoder, forecaster) = provider::services_from_config(config)?;

        Ok(Self::new(geocoder, forecaster, config.flag_policy))
    }

    pub fn policy(&self) -> FlagPolicy {
        self.policy
    }

    pub async fn search(&self, snapshot: &Snapshot) -> Snapshot {
        self.search_with(snapshot, |_| {}).await
    }

    /// Like [`search`](Self::search), calling `observe` with each intermediate snapshot.
    /// The returned snapshot is never loading.
    pub async fn search_with<F>(&self, snapshot: &Snapshot, mut observe: F) -> Snapshot
    where
        F: FnMut(&Snapshot),
    {
        if !snapshot.needs_lookup() {
            return snapshot.clone();
        }

        let ticket = snapshot.ticket();
        let mut current = snapshot.geocode_started(ticket);
        observe(&current);

        let place = match self.geocoder.geocode(&snapshot.location).await {
            Ok(place) => place,
            Err(err) => return current.failed(ticket, describe(&err)),
        };

        let display = match location::build_with(&place.name, &place.country_code, self.policy) {
            Ok(display) => display,
            Err(err) => {
                tracing::warn!(error = %err, "could not build display location");
                return current.failed(ticket, err.user_message());
            }
        };
        current = current.geocode_done(ticket, display);
        observe(&current);

        match self.forecaster.forecast(&place).await {
            Ok(forecast) => current.forecast_done(ticket, forecast),
            Err(err) => current.failed(ticket, describe(&err)),
        }
    }
}

fn describe(err: &anyhow::Error) -> String {
    tracing::warn!(error = ?err, "weather lookup failed");

    match err.downcast_ref::<WeatherError>() {
        Some(weather) => weather.user_message(),
        None => format!("{err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeocodeResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeGeocoder {
        place: Option<GeocodeResult>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodingService for FakeGeocoder {
        async fn geocode(&self, query: &str) -> anyhow::Result<GeocodeResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.place
                .clone()
                .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()).into())
        }
    }

    #[derive(Debug)]
    struct FakeForecaster {
        fail: bool,
    }

    #[async_trait]
    impl ForecastService for FakeForecaster {
        async fn forecast(&self, _place: &GeocodeResult) -> anyhow::Result<DailyForecast> {
            if self.fail {
                anyhow::bail!("forecast backend unavailable");
            }
            Ok(forecast())
        }
    }

    fn forecast() -> DailyForecast {
        DailyForecast {
            time: vec!["2024-06-21".parse().unwrap()],
            weathercode: vec![3],
            temperature_2m_max: vec![21.3],
            temperature_2m_min: vec![14.8],
        }
    }

    fn place(country_code: &str) -> GeocodeResult {
        GeocodeResult {
            latitude: 38.71667,
            longitude: -9.13333,
            timezone: "Europe/Lisbon".to_string(),
            name: "Lisbon".to_string(),
            country_code: country_code.to_string(),
        }
    }

    fn searcher(
        place: Option<GeocodeResult>,
        fail_forecast: bool,
        policy: FlagPolicy,
    ) -> (WeatherSearch, Arc<FakeGeocoder>) {
        let geocoder = Arc::new(FakeGeocoder { place, calls: AtomicUsize::new(0) });
        let search = WeatherSearch::new(
            geocoder.clone(),
            Arc::new(FakeForecaster { fail: fail_forecast }),
            policy,
        );
        (search, geocoder)
    }

    #[test]
    fn with_location_bumps_generation() {
        let s0 = Snapshot::default();
        let s1 = s0.with_location("Lisbon");

        assert_eq!(s1.generation(), s0.generation() + 1);
        assert_eq!(s1.location, "Lisbon");
        assert!(s1.needs_lookup());
        assert_eq!(s0.location, "");
    }

    #[test]
    fn short_input_clears_forecast() {
        let s = Snapshot::default().with_location("Lisbon");
        let t = s.ticket();
        let s = s.geocode_started(t).forecast_done(t, forecast());
        assert!(s.forecast.is_some());

        let short = s.with_location("L");
        assert!(!short.needs_lookup());
        assert!(short.forecast.is_none());
        assert!(!short.is_loading);
    }

    #[test]
    fn needs_lookup_counts_characters_not_bytes() {
        assert!(!Snapshot::default().with_location("é").needs_lookup());
        assert!(Snapshot::default().with_location("Ōu").needs_lookup());
    }

    #[test]
    fn stale_ticket_leaves_snapshot_unchanged() {
        let first = Snapshot::default().with_location("Lisbon");
        let stale = first.ticket();
        let second = first.geocode_started(stale).with_location("Porto");

        let display = location::build("Lisbon", "pt").unwrap();
        assert_eq!(second.geocode_done(stale, display), second);
        assert_eq!(second.forecast_done(stale, forecast()), second);
        assert_eq!(second.failed(stale, "boom"), second);
    }

    #[test]
    fn merge_prefers_newer_generation() {
        let older = Snapshot::default().with_location("Lisbon");
        let newer = older.with_location("Porto");

        assert_eq!(newer.merge(older.clone()), newer);
        assert_eq!(older.merge(newer.clone()), newer);
    }

    #[tokio::test]
    async fn successful_search_fills_snapshot() {
        let (search, _) = searcher(Some(place("pt")), false, FlagPolicy::Strict);
        let start = Snapshot::default().with_location("Lisbon");

        let mut seen = Vec::new();
        let done = search.search_with(&start, |s| seen.push(s.clone())).await;

        assert!(!done.is_loading);
        assert_eq!(done.error, None);
        assert_eq!(done.display_location.map(|d| d.label()), Some("Lisbon 🇵🇹".to_string()));
        assert_eq!(done.forecast, Some(forecast()));
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.is_loading));
        assert!(seen[1].display_location.is_some());
    }

    #[tokio::test]
    async fn short_input_skips_lookup() {
        let (search, geocoder) = searcher(Some(place("pt")), false, FlagPolicy::Strict);
        let start = Snapshot::default().with_location("L");

        let done = search.search(&start).await;

        assert_eq!(done, start);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_location_reports_error_and_stops_loading() {
        let (search, _) = searcher(None, false, FlagPolicy::Strict);

        let done = search.search(&Snapshot::default().with_location("Atlantis")).await;

        assert!(!done.is_loading);
        assert_eq!(done.error.as_deref(), Some("No location matches 'Atlantis'"));
        assert!(done.forecast.is_none());
    }

    #[tokio::test]
    async fn forecast_failure_keeps_display_location() {
        let (search, _) = searcher(Some(place("pt")), true, FlagPolicy::Strict);

        let done = search.search(&Snapshot::default().with_location("Lisbon")).await;

        assert!(!done.is_loading);
        assert!(done.display_location.is_some());
        assert!(done.error.unwrap().contains("forecast backend unavailable"));
    }

    #[tokio::test]
    async fn malformed_country_code_follows_policy() {
        let (strict, _) = searcher(Some(place("PRT")), false, FlagPolicy::Strict);
        let done = strict.search(&Snapshot::default().with_location("Lisbon")).await;
        assert!(done.error.unwrap().contains("PRT"));
        assert!(done.forecast.is_none());

        let (lenient, _) = searcher(Some(place("PRT")), false, FlagPolicy::BestEffort);
        let done = lenient.search(&Snapshot::default().with_location("Lisbon")).await;
        assert_eq!(done.error, None);
        assert_eq!(done.display_location.map(|d| d.label()), Some("Lisbon 🇵🇷".to_string()));
    }

    #[tokio::test]
    async fn result_of_superseded_search_is_discarded() {
        let (search, _) = searcher(Some(place("pt")), false, FlagPolicy::Strict);
        let first = Snapshot::default().with_location("Lisbon");
        let latest = first.with_location("Lisbo");

        let result = search.search(&first).await;

        assert_eq!(latest.merge(result), latest);
    }
}
