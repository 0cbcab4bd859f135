//! The Weather Store: one injectable state container plus the async intents
//! that move it through its request lifecycles.
//!
//! Weather and search are independent flows, each going
//! `Idle -> Pending -> {Fulfilled, Rejected} -> Idle`. Requests are neither
//! cancelled nor fenced: when two fetches overlap, whichever settles last
//! decides the final state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::{
    error::WeatherError,
    model::{CitySearchResult, Location},
    provider::WeatherProvider,
};

pub mod state;

pub use state::{Action, Loading, WeatherState, reduce};

/// Queries shorter than this (after trimming) never reach the provider.
pub const MIN_QUERY_CHARS: usize = 2;

pub const DEFAULT_SEARCH_LIMIT: u8 = 5;

#[derive(Debug)]
pub struct WeatherStore {
    provider: Arc<dyn WeatherProvider>,
    search_limit: u8,
    state: watch::Sender<WeatherState>,
}

impl WeatherStore {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(WeatherState::default());
        Self {
            provider,
            search_limit: DEFAULT_SEARCH_LIMIT,
            state,
        }
    }

    pub fn with_search_limit(mut self, limit: u8) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn provider(&self) -> &Arc<dyn WeatherProvider> {
        &self.provider
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, action: Action) {
        self.state.send_modify(|state| state.apply(action));
    }

    /// Replaces the selected location. Callers issue the fetch themselves.
    pub fn select_location(&self, location: Location) {
        self.dispatch(Action::LocationSelected(location));
    }

    pub fn clear_error(&self) {
        self.dispatch(Action::ErrorCleared);
    }

    pub fn clear_weather_data(&self) {
        self.dispatch(Action::WeatherDataCleared);
    }

    /// Fetches current conditions, then the forecast, for `location`.
    ///
    /// On success both are replaced in a single transition. On any failure
    /// both are reset and the error message is stored.
    pub async fn fetch_current_weather(&self, location: &Location) -> Result<(), WeatherError> {
        let Some(at) = location.coordinates() else {
            self.reject_weather(WeatherError::InvalidLocation);
            return Err(WeatherError::InvalidLocation);
        };

        self.dispatch(Action::WeatherPending);
        debug!(lat = at.lat, lon = at.lon, "Fetching weather");

        let result = async {
            let current = self.provider.current_weather(at).await?;
            let forecast = self.provider.forecast(at).await?;
            Ok::<_, WeatherError>((current, forecast))
        }
        .await;

        match result {
            Ok((current, forecast)) => {
                debug!(entries = forecast.list.len(), "Weather fetched");
                self.dispatch(Action::WeatherFulfilled {
                    current: Box::new(current),
                    forecast,
                });
                Ok(())
            }
            Err(err) => {
                self.reject_weather(err.clone());
                Err(err)
            }
        }
    }

    fn reject_weather(&self, err: WeatherError) {
        error!(error = %err, "Weather fetch error");
        self.dispatch(Action::WeatherRejected {
            message: err.to_string(),
        });
    }

    /// Looks up candidate cities for `query`.
    ///
    /// Failures are logged and yield an empty result set; they never touch
    /// the weather flow or the stored error.
    pub async fn search_cities(&self, query: &str) -> Vec<CitySearchResult> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.dispatch(Action::SearchFulfilled(Vec::new()));
            return Vec::new();
        }

        self.dispatch(Action::SearchPending);
        debug!(query, "Searching cities");

        match self.provider.geocode(query, self.search_limit).await {
            Ok(hits) => {
                let cities: Vec<CitySearchResult> =
                    hits.into_iter().map(CitySearchResult::from).collect();
                self.dispatch(Action::SearchFulfilled(cities.clone()));
                cities
            }
            Err(err) => {
                warn!(error = %err, query, "City search error");
                self.dispatch(Action::SearchRejected);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        collections::HashMap,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use async_trait::async_trait;

    use crate::{
        error::WeatherError,
        model::{Coordinates, CurrentWeather, ForecastSeries, GeoHit},
        provider::WeatherProvider,
        views::fixtures,
    };

    /// In-memory provider keyed by latitude, with optional per-latitude delays.
    #[derive(Debug, Default)]
    pub struct FakeProvider {
        pub calls: AtomicUsize,
        pub current_failure: Mutex<Option<WeatherError>>,
        pub forecast_failure: Mutex<Option<WeatherError>>,
        pub geocode_result: Mutex<Option<Result<Vec<GeoHit>, WeatherError>>>,
        pub failing_lats: Mutex<Vec<f64>>,
        pub queries: Mutex<Vec<String>>,
        delays: Mutex<HashMap<u64, Duration>>,
    }

    impl FakeProvider {
        pub fn delay_for(&self, lat: f64, delay: Duration) {
            self.delays.lock().unwrap().insert(lat.to_bits(), delay);
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn wait(&self, lat: f64) {
            let delay = self.delays.lock().unwrap().get(&lat.to_bits()).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.wait(at.lat).await;
            let failing = self.failing_lats.lock().unwrap().contains(&at.lat);
            if failing {
                return Err(WeatherError::Network("connection reset".into()));
            }
            let failure = self.current_failure.lock().unwrap().clone();
            if let Some(err) = failure {
                return Err(err);
            }
            // Temperature mirrors latitude so tests can tell locations apart.
            Ok(fixtures::current(1_700_000_000, at.lat))
        }

        async fn forecast(&self, at: Coordinates) -> Result<ForecastSeries, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failure = self.forecast_failure.lock().unwrap().clone();
            if let Some(err) = failure {
                return Err(err);
            }
            Ok(fixtures::series(1_700_000_000, 8 + at.lat as usize % 4))
        }

        async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoHit>, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            let result = self.geocode_result.lock().unwrap().clone();
            match result {
                Some(result) => result.map(|hits| hits.into_iter().take(limit.into()).collect()),
                None => Ok(Vec::new()),
            }
        }
    }
}
