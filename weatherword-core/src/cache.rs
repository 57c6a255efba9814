use crate::{
    change::ChangePolicy,
    model::WeatherObservation,
    selector::{WordSelection, WordSelector},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The word was recomputed from the new observation.
    Fresh,
    /// Weather did not change enough; the previous word was kept.
    Reused,
}

/// Last observation and the word chosen for it.
#[derive(Debug, Clone, Default)]
pub struct WordCache {
    policy: ChangePolicy,
    last: Option<(WeatherObservation, WordSelection)>,
}

impl WordCache {
    pub fn new(policy: ChangePolicy) -> Self {
        Self { policy, last: None }
    }

    pub fn last_observation(&self) -> Option<&WeatherObservation> {
        self.last.as_ref().map(|(obs, _)| obs)
    }

    pub fn last_selection(&self) -> Option<&WordSelection> {
        self.last.as_ref().map(|(_, sel)| sel)
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Return the cached word unless `observation` differs significantly
    /// from the cached one, in which case select a new word and store it.
    pub fn select_or_reuse(
        &mut self,
        observation: WeatherObservation,
        selector: &WordSelector,
        candidates: &[String],
    ) -> (WordSelection, CacheOutcome) {
        if let Some((prev, selection)) = &self.last {
            if !self.policy.has_changed_significantly(Some(prev), &observation) {
                tracing::debug!(word = %selection.word, "Weather unchanged, reusing word");
                return (selection.clone(), CacheOutcome::Reused);
            }
        }

        let selection = selector.select(&observation, candidates);
        tracing::info!(word = %selection.word, location = %observation.location_name, "Selected weather word");
        self.last = Some((observation, selection.clone()));
        (selection, CacheOutcome::Fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::mild_clear;

    fn candidates() -> Vec<String> {
        (0..50).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn first_selection_is_fresh() {
        let mut cache = WordCache::default();
        let (_, outcome) = cache.select_or_reuse(mild_clear(), &WordSelector::default(), &candidates());
        assert_eq!(outcome, CacheOutcome::Fresh);
        assert!(cache.last_selection().is_some());
    }

    #[test]
    fn unchanged_weather_reuses_word() {
        let mut cache = WordCache::default();
        let selector = WordSelector::default();
        let words = candidates();

        let (first, _) = cache.select_or_reuse(mild_clear(), &selector, &words);

        let mut next = mild_clear();
        next.temperature_f += 1.0;
        let (second, outcome) = cache.select_or_reuse(next, &selector, &words);

        assert_eq!(outcome, CacheOutcome::Reused);
        assert_eq!(first, second);
        // the cached observation is not replaced on reuse
        assert_eq!(cache.last_observation().unwrap().temperature_f, 72.0);
    }

    #[test]
    fn significant_change_recomputes() {
        let mut cache = WordCache::new(ChangePolicy::ungated());
        let selector = WordSelector::default();
        let words = candidates();

        cache.select_or_reuse(mild_clear(), &selector, &words);

        let mut next = mild_clear();
        next.condition = "Thunderstorm".to_string();
        let (selection, outcome) = cache.select_or_reuse(next, &selector, &words);

        assert_eq!(outcome, CacheOutcome::Fresh);
        assert_eq!(cache.last_observation().unwrap().condition, "Thunderstorm");
        assert_eq!(cache.last_selection(), Some(&selection));
    }

    #[test]
    fn clear_forces_recompute() {
        let mut cache = WordCache::default();
        let selector = WordSelector::default();
        let words = candidates();

        cache.select_or_reuse(mild_clear(), &selector, &words);
        cache.clear();
        let (_, outcome) = cache.select_or_reuse(mild_clear(), &selector, &words);
        assert_eq!(outcome, CacheOutcome::Fresh);
    }
}
