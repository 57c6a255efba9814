use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    http::{build_client, build_client_with_timeout, read_body},
    model::{Coordinates, LocationQuery, WeatherObservation, WeatherRequest},
};

use super::WeatherProvider;

pub const OPENWEATHER_BASE: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_BASE)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: build_client()?,
        })
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_client_with_timeout(timeout)?;
        Ok(self)
    }

    fn location_params(location: &LocationQuery) -> Vec<(&'static str, String)> {
        match location {
            LocationQuery::PostalCode { code, country } => {
                vec![("zip", format!("{code},{country}"))]
            }
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize, Default)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: Option<OwCoord>,
    #[serde(default)]
    timezone: i32,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, request: &WeatherRequest) -> Result<WeatherObservation> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut params = Self::location_params(&request.location);
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "imperial".to_string()));

        tracing::debug!(location = %request.location, "Requesting OpenWeather current conditions");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let body = read_body(res, "OpenWeather current").await?;

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let observation_time = DateTime::<Utc>::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let location_name = match parsed.sys.country {
            Some(country) if !country.is_empty() => format!("{}, {}", parsed.name, country),
            _ => parsed.name,
        };

        Ok(WeatherObservation {
            provider: "openweather".to_string(),
            location_name,
            coordinates: parsed.coord.map(|c| Coordinates { lat: c.lat, lon: c.lon }),
            temperature_f: parsed.main.temp,
            feels_like_f: parsed.main.feels_like,
            condition,
            humidity_pct: parsed.main.humidity.round().clamp(0.0, 100.0) as u8,
            wind_speed_mph: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            observation_time,
            utc_offset_secs: parsed.timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "name": "Beverly Hills",
            "coord": { "lon": -118.4, "lat": 34.07 },
            "dt": 1717243200,
            "timezone": -25200,
            "main": { "temp": 72.4, "feels_like": 71.0, "humidity": 50, "pressure": 1013 },
            "weather": [{ "main": "Clear", "description": "clear sky" }],
            "wind": { "speed": 5.2, "deg": 270 },
            "sys": { "country": "US" }
        })
    }

    #[tokio::test]
    async fn fetches_by_zip_in_imperial_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("zip", "90210,us"))
            .and(query_param("units", "imperial"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample()))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let request = WeatherRequest::new(LocationQuery::postal_code("90210", "us").unwrap());
        let obs = provider.current(&request).await.unwrap();

        assert_eq!(obs.location_name, "Beverly Hills, US");
        assert_eq!(obs.coordinates, Some(Coordinates { lat: 34.07, lon: -118.4 }));
        assert_eq!(obs.temperature_f, 72.4);
        assert_eq!(obs.humidity_pct, 50);
        assert_eq!(obs.condition, "Clear");
        assert_eq!(obs.pressure_hpa, Some(1013.0));
        assert_eq!(obs.observation_time.timestamp(), 1717243200);
        assert_eq!(obs.utc_offset_secs, -25200);
        assert_eq!(obs.local_hour(), 5);
    }

    #[tokio::test]
    async fn fetches_by_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "34.07"))
            .and(query_param("lon", "-118.4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample()))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let request = WeatherRequest::new(LocationQuery::coordinates(34.07, -118.4).unwrap());
        assert!(provider.current(&request).await.is_ok());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("BAD".into(), &server.uri()).unwrap();
        let request = WeatherRequest::new(LocationQuery::postal_code("90210", "us").unwrap());
        let err = provider.current(&request).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let request = WeatherRequest::new(LocationQuery::postal_code("90210", "us").unwrap());
        let err = provider.current(&request).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather"));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(sample()).set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::with_base_url("KEY".into(), &server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(200))
            .unwrap();
        let request = WeatherRequest::new(LocationQuery::postal_code("90210", "us").unwrap());
        let err = provider.current(&request).await.unwrap_err();
        assert!(err.to_string().contains("Failed to send request to OpenWeather"));
    }
}
