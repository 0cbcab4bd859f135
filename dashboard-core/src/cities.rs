//! The "other cities" panel: current conditions for a fixed list of places.

use futures::future::join_all;
use tracing::warn;

use crate::{
    error::WeatherError,
    model::Location,
    provider::WeatherProvider,
    store::WeatherStore,
    views::{self, round_half_up},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CityReading {
    pub temp: i64,
    pub description: String,
    pub glyph: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitySummary {
    pub location: Location,
    /// Empty when this city's request failed.
    pub reading: Option<CityReading>,
}

/// Fetches current weather for every city concurrently.
///
/// A failing city is logged and reported without a reading; it never fails
/// the panel as a whole.
pub async fn fetch_city_summaries(
    provider: &dyn WeatherProvider,
    cities: &[Location],
) -> Vec<CitySummary> {
    let requests = cities.iter().map(|city| async move {
        let reading = match fetch_reading(provider, city).await {
            Ok(reading) => Some(reading),
            Err(err) => {
                warn!(city = %city.name, error = %err, "Error fetching city weather");
                None
            }
        };
        CitySummary {
            location: city.clone(),
            reading,
        }
    });

    join_all(requests).await
}

async fn fetch_reading(
    provider: &dyn WeatherProvider,
    city: &Location,
) -> Result<CityReading, WeatherError> {
    let at = city.coordinates().ok_or(WeatherError::InvalidLocation)?;
    let current = provider.current_weather(at).await?;

    Ok(CityReading {
        temp: round_half_up(current.main.temp),
        description: views::description(&current),
        glyph: views::glyph(&current),
    })
}

/// Makes `city` the selected location and loads its weather.
pub async fn choose_city(store: &WeatherStore, city: &Location) -> Result<(), WeatherError> {
    store.select_location(city.clone());
    store.fetch_current_weather(city).await
}
