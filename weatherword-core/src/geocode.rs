//! Postal code lookup (Open-Meteo geocoding) and reverse geocoding
//! (Nominatim). Neither needs an API key.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;

use crate::http::{build_client, read_body};

pub const OPEN_METEO_GEOCODING_BASE: &str = "https://geocoding-api.open-meteo.com";
pub const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    search_base: String,
    reverse_base: String,
    http: Client,
}

impl Geocoder {
    pub fn new() -> Result<Self> {
        Self::with_base_urls(OPEN_METEO_GEOCODING_BASE, NOMINATIM_BASE)
    }

    pub fn with_base_urls(search_base: &str, reverse_base: &str) -> Result<Self> {
        Ok(Self {
            search_base: search_base.trim_end_matches('/').to_string(),
            reverse_base: reverse_base.trim_end_matches('/').to_string(),
            http: build_client()?,
        })
    }

    /// Resolve a postal code to coordinates and a display name.
    pub async fn locate_postal_code(&self, code: &str, country: &str) -> Result<Place> {
        let url = format!("{}/v1/search", self.search_base);
        let country = country.to_uppercase();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("name", code),
                ("countryCode", country.as_str()),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo geocoding")?;

        let body = read_body(res, "Open-Meteo geocoding").await?;
        let parsed: GeoSearchResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        let hit = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No location found for postal code {code} ({country})"))?;

        let name = match hit.admin1.filter(|a| !a.is_empty() && *a != hit.name) {
            Some(region) => format!("{}, {}", hit.name, region),
            None => format!("{}, {}", hit.name, country),
        };

        tracing::debug!(%name, lat = hit.latitude, lon = hit.longitude, "Geocoded postal code");
        Ok(Place { lat: hit.latitude, lon: hit.longitude, name })
    }

    /// Human-readable place name for coordinates, e.g. "Seattle, Washington".
    /// Returns `None` on any failure so the caller can fall back to coordinates.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Option<String> {
        let url = format!("{}/reverse", self.reverse_base);

        let res = match self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "10".to_string()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Reverse geocode request failed: {e}");
                return None;
            }
        };

        if !res.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", res.status());
            return None;
        }

        let body: NominatimResponse = match res.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {e}");
                return None;
            }
        };

        let addr = body.address?;
        let suffix = addr.state.clone().or_else(|| addr.country.clone());
        let place = addr.city.or(addr.town).or(addr.village).or(addr.county).or(addr.state)?;

        Some(match suffix {
            Some(s) if !s.is_empty() && s != place => format!("{place}, {s}"),
            _ => place,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    latitude: f64,
    longitude: f64,
    admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn geocoder(server: &MockServer) -> Geocoder {
        Geocoder::with_base_urls(&server.uri(), &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn postal_code_resolves_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "90210"))
            .and(query_param("countryCode", "US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "name": "Beverly Hills", "latitude": 34.07, "longitude": -118.4, "admin1": "California" }
                ]
            })))
            .mount(&server)
            .await;

        let place = geocoder(&server).await.locate_postal_code("90210", "us").await.unwrap();
        assert_eq!(
            place,
            Place { lat: 34.07, lon: -118.4, name: "Beverly Hills, California".to_string() }
        );
    }

    #[tokio::test]
    async fn postal_code_without_results_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = geocoder(&server).await.locate_postal_code("00000", "us").await.unwrap_err();
        assert!(err.to_string().contains("No location found"));
    }

    #[tokio::test]
    async fn reverse_prefers_city_and_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": { "city": "Seattle", "state": "Washington", "country": "United States" }
            })))
            .mount(&server)
            .await;

        let name = geocoder(&server).await.reverse(47.6, -122.3).await;
        assert_eq!(name.as_deref(), Some("Seattle, Washington"));
    }

    #[tokio::test]
    async fn reverse_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert_eq!(geocoder(&server).await.reverse(0.0, 0.0).await, None);
    }
}
