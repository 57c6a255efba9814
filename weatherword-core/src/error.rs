//! Typed errors for problems a caller may want to tell apart.
//!
//! Network and parsing failures stay as `anyhow::Error` with context; these
//! cover bad user input and bad configuration, which are rejected before any
//! request is made.

/// Invalid location input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Invalid postal code '{code}' for country '{country}'. US codes must be 5 digits.")]
    InvalidPostalCode { code: String, country: String },
    #[error("Invalid country code '{0}'. Use a two-letter code such as 'us'.")]
    InvalidCountry(String),
    #[error("Latitude {0} is out of range (-90..=90)")]
    InvalidLatitude(f64),
    #[error("Longitude {0} is out of range (-180..=180)")]
    InvalidLongitude(f64),
}

/// Invalid factor weight configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightsError {
    #[error("Weight for factor '{factor}' must be finite and non-negative, got {value}")]
    Invalid { factor: &'static str, value: f64 },
}
