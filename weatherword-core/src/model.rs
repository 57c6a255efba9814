use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub const DEFAULT_COUNTRY: &str = "us";

/// Where to look up the weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationQuery {
    PostalCode { code: String, country: String },
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Validate a postal code for `country` (ISO 3166 alpha-2, case-insensitive).
    ///
    /// US codes must be exactly five digits; other countries accept 3 to 10
    /// alphanumeric characters, spaces or dashes.
    pub fn postal_code(code: &str, country: &str) -> Result<Self, InputError> {
        let code = code.trim();
        let country = country.trim().to_lowercase();

        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(InputError::InvalidCountry(country));
        }

        let valid = if country == "us" {
            code.len() == 5 && code.chars().all(|c| c.is_ascii_digit())
        } else {
            (3..=10).contains(&code.len())
                && code.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
        };

        if !valid {
            return Err(InputError::InvalidPostalCode { code: code.to_string(), country });
        }

        Ok(LocationQuery::PostalCode { code: code.to_uppercase(), country })
    }

    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, InputError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(InputError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(InputError::InvalidLongitude(lon));
        }
        Ok(LocationQuery::Coordinates { lat, lon })
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::PostalCode { code, country } => {
                write!(f, "{code}, {}", country.to_uppercase())
            }
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
        }
    }
}

/// Position of an observation, when the provider reports one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Within about a kilometre of `other`.
    pub fn is_near(&self, other: &Coordinates) -> bool {
        const TOLERANCE_DEG: f64 = 0.01;
        (self.lat - other.lat).abs() < TOLERANCE_DEG && (self.lon - other.lon).abs() < TOLERANCE_DEG
    }
}

#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub location: LocationQuery,
}

impl WeatherRequest {
    pub fn new(location: LocationQuery) -> Self {
        Self { location }
    }
}

/// A single current-conditions reading, normalized to imperial units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub provider: String,
    pub location_name: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_mph: f64,
    pub pressure_hpa: Option<f64>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub observation_time: DateTime<Utc>,
    /// Offset of the observed location from UTC, in seconds.
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl WeatherObservation {
    /// Hour of day (0-23) at the observed location.
    pub fn local_hour(&self) -> u32 {
        match FixedOffset::east_opt(self.utc_offset_secs) {
            Some(offset) => self.observation_time.with_timezone(&offset).hour(),
            None => self.observation_time.hour(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// 72°F, 50%, 5 mph, clear skies, 1013 hPa at noon UTC.
    pub fn mild_clear() -> WeatherObservation {
        WeatherObservation {
            provider: "test".to_string(),
            location_name: "Springfield, US".to_string(),
            coordinates: Some(Coordinates { lat: 39.8, lon: -89.65 }),
            temperature_f: 72.0,
            feels_like_f: 71.0,
            condition: "Clear".to_string(),
            humidity_pct: 50,
            wind_speed_mph: 5.0,
            pressure_hpa: Some(1013.0),
            observation_time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            utc_offset_secs: 0,
        }
    }
}
