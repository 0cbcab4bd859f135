use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-selected place. Coordinates are optional so that incomplete
/// selections can be represented and rejected by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            state: None,
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// Both coordinates, if present and finite.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Coordinates { lat, lon })
            }
            _ => None,
        }
    }

    /// `"{name}, {country}"`, as shown in the dashboard header.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

/// One entry of the provider's `weather[]` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: Option<u32>,
    /// Condition group, e.g. `Clear`, `Clouds`, `Rain`.
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "3h", default, skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

/// Current-conditions payload, kept as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub dt: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub clouds: Clouds,
    pub sys: Sun,
}

/// One 3-hour slot of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub clouds: Clouds,
    /// Probability of precipitation, 0..=1.
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<Precipitation>,
}

impl ForecastEntry {
    /// Rain volume for the slot in mm, 0 when the provider omits it.
    pub fn rain_mm(&self) -> f64 {
        self.rain.as_ref().and_then(|r| r.three_hours).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// Forecast entries in provider order. Consumers never re-sort them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: Option<ForecastCity>,
}

impl ForecastSeries {
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Raw record of the geocoding endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoHit {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// A candidate location from a city search, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearchResult {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub full_name: String,
}

impl From<GeoHit> for CitySearchResult {
    fn from(hit: GeoHit) -> Self {
        let state = hit.state.filter(|s| !s.is_empty());
        let full_name = match &state {
            Some(state) => format!("{}, {}, {}", hit.name, state, hit.country),
            None => format!("{}, {}", hit.name, hit.country),
        };

        Self {
            name: hit.name,
            country: hit.country,
            state,
            lat: hit.lat,
            lon: hit.lon,
            full_name,
        }
    }
}

impl From<&CitySearchResult> for Location {
    fn from(result: &CitySearchResult) -> Self {
        Location {
            name: result.name.clone(),
            country: result.country.clone(),
            state: result.state.clone(),
            lat: Some(result.lat),
            lon: Some(result.lon),
        }
    }
}

/// Fields shared by the current snapshot and forecast entries, so that views
/// can render either one.
pub trait Reading {
    fn timestamp(&self) -> i64;
    fn main(&self) -> &MainReadings;
    fn conditions(&self) -> &[Condition];
    fn wind(&self) -> &Wind;
    fn visibility(&self) -> Option<u32>;
    fn clouds(&self) -> &Clouds;

    /// Probability of precipitation, when the reading carries one.
    fn pop(&self) -> Option<f64> {
        None
    }

    fn sun(&self) -> Option<&Sun> {
        None
    }

    fn observed_at(&self) -> DateTime<Utc> {
        unix_to_utc(self.timestamp())
    }

    fn condition(&self) -> Option<&Condition> {
        self.conditions().first()
    }
}

impl Reading for CurrentWeather {
    fn timestamp(&self) -> i64 {
        self.dt
    }

    fn main(&self) -> &MainReadings {
        &self.main
    }

    fn conditions(&self) -> &[Condition] {
        &self.weather
    }

    fn wind(&self) -> &Wind {
        &self.wind
    }

    fn visibility(&self) -> Option<u32> {
        self.visibility
    }

    fn clouds(&self) -> &Clouds {
        &self.clouds
    }

    fn sun(&self) -> Option<&Sun> {
        Some(&self.sys)
    }
}

impl Reading for ForecastEntry {
    fn timestamp(&self) -> i64 {
        self.dt
    }

    fn main(&self) -> &MainReadings {
        &self.main
    }

    fn conditions(&self) -> &[Condition] {
        &self.weather
    }

    fn wind(&self) -> &Wind {
        &self.wind
    }

    fn visibility(&self) -> Option<u32> {
        self.visibility
    }

    fn clouds(&self) -> &Clouds {
        &self.clouds
    }

    fn pop(&self) -> Option<f64> {
        Some(self.pop)
    }
}

pub(crate) fn unix_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
