use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, CurrentWeather, ForecastSeries, GeoHit},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Remote source of weather data and geocoding.
///
/// The store only talks to this trait, so tests drive it with an in-memory
/// implementation.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, WeatherError>;

    /// 5-day forecast in 3-hour steps.
    async fn forecast(&self, at: Coordinates) -> Result<ForecastSeries, WeatherError>;

    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoHit>, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    Ok(Arc::new(OpenWeatherProvider::new(
        api_key,
        config.endpoints.clone(),
        config.units.clone(),
        config.lang.clone(),
    )))
}
