//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The remote weather provider abstraction and its OpenWeather client
//! - The Weather Store: selected location, fetched data and request state
//! - View-level derivations (daily grouping, next hours, tomorrow, rain)
//! - Debounced city search and the "other cities" panel
//!
//! It is used by `dashboard-cli`, but can also back other front-ends.

pub mod cities;
pub mod condition;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;
pub mod views;

pub use config::Config;
pub use error::WeatherError;
pub use model::{CitySearchResult, CurrentWeather, ForecastEntry, ForecastSeries, Location};
pub use provider::{WeatherProvider, provider_from_config};
pub use store::{WeatherState, WeatherStore};
