use chrono::FixedOffset;
use weatherword_core::{WeatherObservation, WordSelection};

const BAR_WIDTH: usize = 20;

/// Word, weather details and factor breakdown as plain text.
pub fn selection(obs: &WeatherObservation, result: &WordSelection) -> String {
    let mut out = String::new();

    out.push_str(&format!("  {}\n\n", result.word.to_uppercase()));
    out.push_str(&format!("{} ({})\n", obs.location_name, observed_at(obs)));
    out.push_str(&format!(
        "{}, {:.0}°F (feels like {:.0}°F), humidity {}%, wind {:.0} mph",
        obs.condition, obs.temperature_f, obs.feels_like_f, obs.humidity_pct, obs.wind_speed_mph
    ));
    if let Some(pressure) = obs.pressure_hpa {
        out.push_str(&format!(", {pressure:.0} hPa"));
    }
    out.push('\n');

    if !result.contributions.is_empty() {
        out.push_str(&format!("\nScore {:.2}; what shaped the word:\n", result.score));
        let mut shares: Vec<_> = result.contributions.iter().collect();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (factor, share) in shares {
            out.push_str(&format!("  {:<12} {} {:>3.0}%\n", factor.as_str(), bar(share), share * 100.0));
        }
    }

    out.trim_end().to_string()
}

pub fn definition(word: &str, definition: Option<&str>) -> String {
    match definition {
        Some(def) => format!("{word}: {def}"),
        None => format!("No definition found for \"{word}\"."),
    }
}

fn observed_at(obs: &WeatherObservation) -> String {
    match FixedOffset::east_opt(obs.utc_offset_secs) {
        Some(offset) => obs.observation_time.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        None => obs.observation_time.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

fn bar(share: f64) -> String {
    let filled = ((share.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
