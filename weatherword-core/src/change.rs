use std::time::Duration;

use crate::model::WeatherObservation;

/// Thresholds for deciding whether new weather is worth a new word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePolicy {
    pub temperature_f: f64,
    pub humidity_pct: f64,
    pub wind_mph: f64,
    /// Recompute once observations are further apart than this, regardless of
    /// the readings. `None` disables the time gate.
    pub max_age: Option<Duration>,
}

impl Default for ChangePolicy {
    fn default() -> Self {
        Self {
            temperature_f: 2.0,
            humidity_pct: 5.0,
            wind_mph: 3.0,
            max_age: Some(Duration::from_secs(15 * 60)),
        }
    }
}

impl ChangePolicy {
    pub fn ungated() -> Self {
        Self { max_age: None, ..Self::default() }
    }

    pub fn has_changed_significantly(
        &self,
        previous: Option<&WeatherObservation>,
        next: &WeatherObservation,
    ) -> bool {
        let Some(prev) = previous else {
            return true;
        };

        if !same_place(prev, next) {
            return true;
        }

        if let Some(max_age) = self.max_age {
            let elapsed = (next.observation_time - prev.observation_time).num_seconds().unsigned_abs();
            if elapsed > max_age.as_secs() {
                return true;
            }
        }

        (next.temperature_f - prev.temperature_f).abs() >= self.temperature_f
            || (f64::from(next.humidity_pct) - f64::from(prev.humidity_pct)).abs()
                >= self.humidity_pct
            || (next.wind_speed_mph - prev.wind_speed_mph).abs() >= self.wind_mph
            || next.condition != prev.condition
    }
}

/// Coordinates win when both observations carry them, so a label that
/// flips between a place name and formatted coordinates is not a move.
fn same_place(prev: &WeatherObservation, next: &WeatherObservation) -> bool {
    match (&prev.coordinates, &next.coordinates) {
        (Some(a), Some(b)) => a.is_near(b),
        _ => prev.location_name == next.location_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::mild_clear;

    #[test]
    fn first_observation_is_always_significant() {
        assert!(ChangePolicy::default().has_changed_significantly(None, &mild_clear()));
    }

    #[test]
    fn identical_observations_are_not_significant() {
        let obs = mild_clear();
        assert!(!ChangePolicy::default().has_changed_significantly(Some(&obs), &obs.clone()));
    }

    #[test]
    fn small_changes_are_ignored() {
        let prev = mild_clear();
        let mut next = prev.clone();
        next.temperature_f += 1.5;
        next.humidity_pct += 4;
        next.wind_speed_mph += 2.0;
        next.observation_time += chrono::Duration::minutes(10);

        assert!(!ChangePolicy::default().has_changed_significantly(Some(&prev), &next));
    }

    #[test]
    fn any_single_threshold_breach_is_significant() {
        let policy = ChangePolicy::default();
        let prev = mild_clear();

        let mut next = prev.clone();
        next.temperature_f -= 2.0;
        assert!(policy.has_changed_significantly(Some(&prev), &next));

        let mut next = prev.clone();
        next.humidity_pct += 5;
        assert!(policy.has_changed_significantly(Some(&prev), &next));

        let mut next = prev.clone();
        next.wind_speed_mph += 3.5;
        assert!(policy.has_changed_significantly(Some(&prev), &next));

        let mut next = prev.clone();
        next.condition = "Clouds".to_string();
        assert!(policy.has_changed_significantly(Some(&prev), &next));
    }

    #[test]
    fn location_change_alone_is_significant() {
        let prev = mild_clear();
        let mut next = prev.clone();
        next.location_name = "Shelbyville, US".to_string();
        next.coordinates = Some(crate::model::Coordinates { lat: 39.3, lon: -88.6 });

        assert!(ChangePolicy::default().has_changed_significantly(Some(&prev), &next));
        assert!(ChangePolicy::ungated().has_changed_significantly(Some(&prev), &next));
    }

    #[test]
    fn time_gate_only_applies_when_enabled() {
        let prev = mild_clear();
        let mut next = prev.clone();
        next.observation_time += chrono::Duration::minutes(16);

        assert!(ChangePolicy::default().has_changed_significantly(Some(&prev), &next));
        assert!(!ChangePolicy::ungated().has_changed_significantly(Some(&prev), &next));
    }

    #[test]
    fn label_change_at_same_coordinates_is_not_a_move() {
        let prev = mild_clear();
        let mut next = prev.clone();
        next.location_name = "39.80, -89.65".to_string();

        assert!(!ChangePolicy::default().has_changed_significantly(Some(&prev), &next));
    }

    #[test]
    fn label_decides_when_coordinates_are_missing() {
        let mut prev = mild_clear();
        prev.coordinates = None;
        let mut next = prev.clone();
        next.location_name = "Shelbyville, US".to_string();

        assert!(ChangePolicy::default().has_changed_significantly(Some(&prev), &next));
    }
}
