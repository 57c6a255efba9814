//! Sky condition scoring.
//!
//! Conditions are scored from fair (near 1.0) to severe (near 0.0).

/// Value used when a condition matches nothing in [`SKY_CONDITIONS`].
pub const UNKNOWN_CONDITION_VALUE: f64 = 0.5;

/// Known sky conditions and their fairness score. Order matters for
/// substring matching: the first key contained in a condition wins.
pub const SKY_CONDITIONS: &[(&str, f64)] = &[
    // clear / sunny
    ("Clear", 0.92),
    ("Sunny", 0.98),
    ("Mostly Clear", 0.86),
    ("Mostly Sunny", 0.88),
    ("Fair", 0.82),
    // partly cloudy
    ("Partly Cloudy", 0.75),
    ("Partly Sunny", 0.78),
    ("Few Clouds", 0.80),
    ("Scattered Clouds", 0.68),
    // mostly cloudy
    ("Broken Clouds", 0.55),
    ("Mostly Cloudy", 0.45),
    ("Clouds", 0.50),
    // haze / mist
    ("Haze", 0.48),
    ("Mist", 0.40),
    ("Fog", 0.25),
    ("Dense Fog", 0.15),
    ("Overcast", 0.30),
    // light precipitation
    ("Drizzle", 0.28),
    ("Light Rain", 0.26),
    ("Chance Light Rain", 0.32),
    ("Light Snow", 0.24),
    ("Flurries", 0.27),
    // moderate precipitation
    ("Moderate Rain", 0.18),
    ("Snow", 0.16),
    ("Rain", 0.15),
    ("Freezing Rain", 0.14),
    ("Wintry Mix", 0.13),
    ("Sleet", 0.12),
    // heavy precipitation
    ("Heavy Rain", 0.08),
    ("Heavy Snow", 0.06),
    ("Blizzard", 0.03),
    // severe
    ("Thunderstorm", 0.05),
    ("Severe Thunderstorm", 0.02),
    ("Tornado", 0.01),
    ("Hurricane", 0.01),
    ("Tropical Storm", 0.02),
];

/// Score a free-text sky condition in `[0, 1]`.
///
/// Exact table entries return their configured value. Anything else is
/// matched case-insensitively against the table keys as substrings, and
/// falls back to [`UNKNOWN_CONDITION_VALUE`].
pub fn sky_condition_value(condition: &str) -> f64 {
    if let Some((_, value)) = SKY_CONDITIONS.iter().find(|(key, _)| *key == condition) {
        return *value;
    }

    let lower = condition.to_lowercase();
    SKY_CONDITIONS
        .iter()
        .find(|(key, _)| lower.contains(&key.to_lowercase()))
        .map(|(_, value)| *value)
        .unwrap_or(UNKNOWN_CONDITION_VALUE)
}

/// Convert an Open-Meteo WMO weather code into a label from [`SKY_CONDITIONS`].
/// See: https://open-meteo.com/en/docs#weathervariables
pub fn condition_from_wmo_code(code: i32) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mostly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Dense Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing Rain", // freezing drizzle
        61 | 80 => "Light Rain",
        63 | 81 => "Moderate Rain",
        65 | 82 => "Heavy Rain",
        66 | 67 => "Freezing Rain",
        71 | 85 => "Light Snow",
        73 | 77 => "Snow",
        75 | 86 => "Heavy Snow",
        95 => "Thunderstorm",
        96 | 99 => "Severe Thunderstorm",
        _ => "Unknown",
    }
}
