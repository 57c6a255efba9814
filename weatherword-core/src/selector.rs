//! Mapping a weather observation to a single word.
//!
//! Each factor is normalized to `[0, 1]`, weighted, and averaged into a
//! composite score. The score indexes linearly into the candidate list, so
//! the same observation and word list always give the same word.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{condition::sky_condition_value, error::WeightsError, model::WeatherObservation};

/// Returned when there are no candidate words to choose from.
pub const FALLBACK_WORD: &str = "enigmatic";

const TEMPERATURE_MIN_F: f64 = -20.0;
const TEMPERATURE_MAX_F: f64 = 100.0;
const WIND_CAP_MPH: f64 = 50.0;
const WIND_EXPONENT: f64 = 0.7;
const PRESSURE_MIN_HPA: f64 = 970.0;
const PRESSURE_MAX_HPA: f64 = 1030.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Temperature,
    Humidity,
    Wind,
    Sky,
    Time,
    Pressure,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Temperature => "temperature",
            Factor::Humidity => "humidity",
            Factor::Wind => "wind",
            Factor::Sky => "sky",
            Factor::Time => "time",
            Factor::Pressure => "pressure",
        }
    }

    pub const fn all() -> &'static [Factor] {
        &[
            Factor::Temperature,
            Factor::Humidity,
            Factor::Wind,
            Factor::Sky,
            Factor::Time,
            Factor::Pressure,
        ]
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much each factor influences the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
    pub sky: f64,
    pub time: f64,
    pub pressure: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self { temperature: 0.25, humidity: 0.15, wind: 0.20, sky: 0.25, time: 0.10, pressure: 0.05 }
    }
}

impl FactorWeights {
    /// Same weights with pressure dropped from the calculation.
    pub fn without_pressure(self) -> Self {
        Self { pressure: 0.0, ..self }
    }

    pub fn weight(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Temperature => self.temperature,
            Factor::Humidity => self.humidity,
            Factor::Wind => self.wind,
            Factor::Sky => self.sky,
            Factor::Time => self.time,
            Factor::Pressure => self.pressure,
        }
    }

    pub fn validate(&self) -> Result<(), WeightsError> {
        for factor in Factor::all() {
            let value = self.weight(*factor);
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::Invalid { factor: factor.as_str(), value });
            }
        }
        Ok(())
    }
}

/// Weather factors mapped to `[0, 1]`. Pressure is `None` when the
/// observation carried no reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedFactors {
    pub temperature: f64,
    pub humidity: f64,
    pub wind: f64,
    pub sky: f64,
    pub time: f64,
    pub pressure: Option<f64>,
}

impl NormalizedFactors {
    pub fn from_observation(obs: &WeatherObservation) -> Self {
        Self {
            temperature: normalize_temperature(obs.temperature_f),
            humidity: (f64::from(obs.humidity_pct) / 100.0).clamp(0.0, 1.0),
            wind: normalize_wind(obs.wind_speed_mph),
            sky: sky_condition_value(&obs.condition),
            time: f64::from(obs.local_hour()) / 24.0,
            pressure: obs.pressure_hpa.map(normalize_pressure),
        }
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::Temperature => Some(self.temperature),
            Factor::Humidity => Some(self.humidity),
            Factor::Wind => Some(self.wind),
            Factor::Sky => Some(self.sky),
            Factor::Time => Some(self.time),
            Factor::Pressure => self.pressure,
        }
    }

    /// Factors that are present and carry a non-zero weight, with their
    /// weighted value.
    pub fn weighted(&self, weights: &FactorWeights) -> Vec<(Factor, f64, f64)> {
        Factor::all()
            .iter()
            .filter_map(|factor| {
                let value = self.get(*factor)?;
                let weight = weights.weight(*factor);
                (weight > 0.0).then_some((*factor, weight, value * weight))
            })
            .collect()
    }
}

fn normalize_temperature(temperature_f: f64) -> f64 {
    ((temperature_f - TEMPERATURE_MIN_F) / (TEMPERATURE_MAX_F - TEMPERATURE_MIN_F)).clamp(0.0, 1.0)
}

fn normalize_wind(speed_mph: f64) -> f64 {
    (speed_mph.max(0.0) / WIND_CAP_MPH).powf(WIND_EXPONENT).min(1.0)
}

fn normalize_pressure(pressure_hpa: f64) -> f64 {
    ((pressure_hpa - PRESSURE_MIN_HPA) / (PRESSURE_MAX_HPA - PRESSURE_MIN_HPA)).clamp(0.0, 1.0)
}

/// Each factor's share of the total weighted influence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorContributions(BTreeMap<Factor, f64>);

impl FactorContributions {
    fn from_weighted(weighted: &[(Factor, f64, f64)]) -> Self {
        let total: f64 = weighted.iter().map(|(_, _, v)| v.abs()).sum();
        let shares = weighted
            .iter()
            .map(|(factor, _, v)| {
                let share = if total > 0.0 { v.abs() / total } else { 0.0 };
                (*factor, share)
            })
            .collect();
        Self(shares)
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.0.get(&factor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        self.0.iter().map(|(f, v)| (*f, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Factor with the largest share, if any.
    pub fn dominant(&self) -> Option<(Factor, f64)> {
        self.iter().max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSelection {
    pub word: String,
    pub score: f64,
    pub contributions: FactorContributions,
}

impl WordSelection {
    pub fn fallback() -> Self {
        Self {
            word: FALLBACK_WORD.to_string(),
            score: 0.0,
            contributions: FactorContributions::default(),
        }
    }
}

/// Weighted average of the present factors, clamped to `[0, 1]`.
/// Returns 0.5 when every weight is zero.
pub fn composite_score(normalized: &NormalizedFactors, weights: &FactorWeights) -> f64 {
    let weighted = normalized.weighted(weights);
    composite_from_weighted(&weighted)
}

fn composite_from_weighted(weighted: &[(Factor, f64, f64)]) -> f64 {
    let total_weight: f64 = weighted.iter().map(|(_, w, _)| w).sum();
    if total_weight <= 0.0 {
        return 0.5;
    }
    let sum: f64 = weighted.iter().map(|(_, _, v)| v).sum();
    (sum / total_weight).clamp(0.0, 1.0)
}

/// Index into a list of `len` words for a score in `[0, 1]`.
pub fn index_for_score(score: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    let index = (score.clamp(0.0, 1.0) * last as f64).floor() as usize;
    index.min(last)
}

#[derive(Debug, Clone, Default)]
pub struct WordSelector {
    weights: FactorWeights,
}

impl WordSelector {
    pub fn new(weights: FactorWeights) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    pub fn select(&self, obs: &WeatherObservation, candidates: &[String]) -> WordSelection {
        if candidates.is_empty() {
            tracing::warn!("No candidate words available, using fallback '{FALLBACK_WORD}'");
            return WordSelection::fallback();
        }

        let normalized = NormalizedFactors::from_observation(obs);
        let weighted = normalized.weighted(&self.weights);
        let score = composite_from_weighted(&weighted);
        let index = index_for_score(score, candidates.len());

        tracing::debug!(score, index, candidates = candidates.len(), "Selected word index");

        WordSelection {
            word: candidates[index].clone(),
            score,
            contributions: FactorContributions::from_weighted(&weighted),
        }
    }
}
