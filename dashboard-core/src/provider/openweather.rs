use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config::Endpoints,
    error::WeatherError,
    model::{Coordinates, CurrentWeather, ForecastSeries, GeoHit},
};

use super::WeatherProvider;

pub const CURRENT_FALLBACK: &str = "Failed to fetch weather data";
pub const FORECAST_FALLBACK: &str = "Failed to fetch forecast data";
pub const SEARCH_FALLBACK: &str = "Failed to search cities";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    units: String,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, endpoints: Endpoints, units: String, lang: String) -> Self {
        Self {
            api_key,
            endpoints,
            units,
            lang,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
        fallback: &str,
    ) -> Result<T, WeatherError> {
        debug!(%url, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::ProviderHttp {
                status: status.as_u16(),
                message: error_message(&body, fallback),
            });
        }

        serde_json::from_str(&body).map_err(|err| {
            WeatherError::Decode(format!("{err} (body: {})", truncate_body(&body)))
        })
    }

    fn coordinate_query(&self, at: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("lat", at.lat.to_string()),
            ("lon", at.lon.to_string()),
            ("units", self.units.clone()),
            ("lang", self.lang.clone()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, WeatherError> {
        let url = format!("{}/weather", self.endpoints.base_url);
        self.get_json(url, &self.coordinate_query(at), CURRENT_FALLBACK).await
    }

    async fn forecast(&self, at: Coordinates) -> Result<ForecastSeries, WeatherError> {
        let url = format!("{}/forecast", self.endpoints.base_url);
        self.get_json(url, &self.coordinate_query(at), FORECAST_FALLBACK).await
    }

    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<GeoHit>, WeatherError> {
        let url = format!("{}/direct", self.endpoints.geo_url);
        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        // The endpoint answers `null` instead of `[]` for some queries.
        let hits: Option<Vec<GeoHit>> = self.get_json(url, &params, SEARCH_FALLBACK).await?;
        Ok(hits.unwrap_or_default())
    }
}

/// Message of an error body, or `fallback` if the body carries none.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Answers a single HTTP request with `status` and `body`, and returns a
    /// provider pointed at it.
    async fn serve_once(status: &'static str, body: &'static str) -> OpenWeatherProvider {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let endpoints = Endpoints {
            base_url: format!("http://{addr}"),
            geo_url: format!("http://{addr}"),
        };
        OpenWeatherProvider::new("KEY".into(), endpoints, "metric".into(), "en".into())
    }

    #[tokio::test]
    async fn rejected_request_carries_status_and_message() {
        let provider =
            serve_once("401 Unauthorized", r#"{"cod":401,"message":"Invalid API key"}"#).await;

        let err = provider
            .current_weather(Coordinates { lat: 30.0, lon: 31.0 })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WeatherError::ProviderHttp {
                status: 401,
                message: "Invalid API key".into(),
            }
        );
    }

    #[tokio::test]
    async fn rejected_request_without_message_uses_fallback() {
        let provider = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

        let err = provider
            .forecast(Coordinates { lat: 30.0, lon: 31.0 })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            WeatherError::ProviderHttp {
                status: 502,
                message: FORECAST_FALLBACK.into(),
            }
        );
    }

    #[tokio::test]
    async fn null_geocoding_body_is_no_hits() {
        let provider = serve_once("200 OK", "null").await;

        let hits = provider.geocode("zz", 5).await.unwrap();

        assert!(hits.is_empty());
    }

    #[test]
    fn error_message_prefers_provider_message() {
        let body = r#"{"cod":401,"message":"Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."}"#;
        assert!(error_message(body, CURRENT_FALLBACK).starts_with("Invalid API key"));
    }

    #[test]
    fn error_message_falls_back_without_message() {
        assert_eq!(error_message(r#"{"cod":"500"}"#, FORECAST_FALLBACK), FORECAST_FALLBACK);
        assert_eq!(error_message("<html>bad gateway</html>", CURRENT_FALLBACK), CURRENT_FALLBACK);
        assert_eq!(error_message(r#"{"message":""}"#, SEARCH_FALLBACK), SEARCH_FALLBACK);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "ط".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }

    #[test]
    fn coordinate_query_carries_units_and_lang() {
        let provider = OpenWeatherProvider::new(
            "KEY".into(),
            Endpoints::default(),
            "metric".into(),
            "ar".into(),
        );
        let query = provider.coordinate_query(Coordinates { lat: 30.5, lon: 31.25 });

        assert!(query.contains(&("lat", "30.5".to_string())));
        assert!(query.contains(&("lon", "31.25".to_string())));
        assert!(query.contains(&("units", "metric".to_string())));
        assert!(query.contains(&("lang", "ar".to_string())));
    }

    #[test]
    fn current_weather_payload_decodes() {
        let body = r#"{
            "coord": {"lon": 31.2357, "lat": 30.0444},
            "weather": [{"id": 800, "main": "Clear", "description": "سماء صافية", "icon": "01d"}],
            "main": {"temp": 29.6, "feels_like": 28.9, "temp_min": 28.1, "temp_max": 30.4, "pressure": 1012, "humidity": 34},
            "visibility": 10000,
            "wind": {"speed": 4.1, "deg": 20},
            "clouds": {"all": 0},
            "dt": 1700000000,
            "sys": {"country": "EG", "sunrise": 1699976000, "sunset": 1700015000},
            "name": "Cairo",
            "cod": 200
        }"#;
        let current: CurrentWeather = serde_json::from_str(body).unwrap();

        assert_eq!(current.name.as_deref(), Some("Cairo"));
        assert_eq!(current.main.humidity, 34);
        assert_eq!(current.weather[0].main, "Clear");
        assert_eq!(current.visibility, Some(10000));
        assert_eq!(current.sys.sunset, 1700015000);
    }
}
