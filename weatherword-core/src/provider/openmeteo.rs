use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    condition::condition_from_wmo_code,
    geocode::Geocoder,
    http::{build_client, build_client_with_timeout, read_body},
    model::{Coordinates, LocationQuery, WeatherObservation, WeatherRequest},
};

use super::WeatherProvider;

pub const OPEN_METEO_BASE: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
                              wind_speed_10m,weather_code,pressure_msl";

/// Keyless provider. Postal codes are geocoded first; coordinates are
/// labelled by reverse geocoding.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    geocoder: Geocoder,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoder: Geocoder) -> Result<Self> {
        Self::with_base_url(geocoder, OPEN_METEO_BASE)
    }

    pub fn with_base_url(geocoder: Geocoder, base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            geocoder,
            http: build_client()?,
        })
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = build_client_with_timeout(timeout)?;
        Ok(self)
    }

    async fn resolve(&self, location: &LocationQuery) -> Result<(f64, f64, String)> {
        match location {
            LocationQuery::PostalCode { code, country } => {
                let place = self.geocoder.locate_postal_code(code, country).await?;
                Ok((place.lat, place.lon, place.name))
            }
            LocationQuery::Coordinates { lat, lon } => {
                let name = match self.geocoder.reverse(*lat, *lon).await {
                    Some(name) => name,
                    None => format!("{lat:.2}, {lon:.2}"),
                };
                Ok((*lat, *lon, name))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: i64,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: i32,
    /// Sea-level pressure, comparable across altitudes.
    pressure_msl: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: OmCurrent,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, request: &WeatherRequest) -> Result<WeatherObservation> {
        let (lat, lon, location_name) = self.resolve(&request.location).await?;
        let url = format!("{}/v1/forecast", self.base_url);

        tracing::debug!(lat, lon, "Requesting Open-Meteo current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("wind_speed_unit", "mph".to_string()),
                ("timeformat", "unixtime".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current weather)")?;

        let body = read_body(res, "Open-Meteo current").await?;

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo current JSON")?;
        let current = parsed.current;

        let observation_time =
            DateTime::<Utc>::from_timestamp(current.time, 0).unwrap_or_else(Utc::now);

        Ok(WeatherObservation {
            provider: "openmeteo".to_string(),
            location_name,
            coordinates: Some(Coordinates { lat, lon }),
            temperature_f: current.temperature_2m,
            feels_like_f: current.apparent_temperature,
            condition: condition_from_wmo_code(current.weather_code).to_string(),
            humidity_pct: current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
            wind_speed_mph: current.wind_speed_10m,
            pressure_hpa: current.pressure_msl,
            observation_time,
            utc_offset_secs: parsed.utc_offset_seconds,
        })
    }
}
