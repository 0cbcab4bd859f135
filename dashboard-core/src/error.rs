use thiserror::Error;

/// Failure of a single request against the weather provider.
///
/// Every variant is terminal for the request that produced it; nothing in the
/// crate retries.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeatherError {
    /// The location has no usable latitude/longitude. Raised before any
    /// network call is made.
    #[error("Invalid location data: latitude and longitude are required")]
    InvalidLocation,

    /// The provider answered with a non-success status.
    #[error("{message}")]
    ProviderHttp { status: u16, message: String },

    /// The request could not be completed (DNS, connect, timeout, body read).
    #[error("Network failure: {0}")]
    Network(String),

    /// The provider answered successfully but the body had an unexpected shape.
    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Network(err.to_string())
    }
}
