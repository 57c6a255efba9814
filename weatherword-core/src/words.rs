//! Candidate word lists.
//!
//! The selector only needs an ordered list of words; where it comes from is
//! behind [`WordSource`].

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::http::{build_client, read_body};

pub const DWYL_WORDS_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/master/words_dictionary.json";

const MIN_WORD_LEN: usize = 4;
const MAX_WORD_LEN: usize = 11;
const MAX_REMOTE_WORDS: usize = 15_000;

#[async_trait]
pub trait WordSource: Send + Sync + std::fmt::Debug {
    /// Ordered candidate words. Order must be stable between calls.
    async fn list_candidate_words(&self) -> Result<Vec<String>>;
}

/// Curated list of evocative words, used when nothing better is available.
pub const CURATED_WORDS: &[&str] = &[
    "serenity", "zephyr", "cascade", "luminous", "verdant", "ethereal", "radiance", "tranquil",
    "whisper", "gentle", "tempest", "torrent", "deluge", "cyclone", "maelstrom", "turbulent",
    "tumultuous", "typhoon", "whirlwind", "blizzard", "crystalline", "glacial", "pristine",
    "powdery", "frosty", "icicle", "shimmering", "blanket", "alpine", "crisp", "azure",
    "cerulean", "sapphire", "expansive", "boundless", "infinite", "celestial", "cosmic",
    "heavenly", "zenith", "misty", "nebulous", "obscured", "veiled", "foggy", "shrouded",
    "enigmatic", "mysterious", "ghostly", "spectral", "scorching", "blazing", "searing",
    "sweltering", "torrid", "arid", "parched", "blistering", "fiery", "intense", "balmy",
    "tepid", "mild", "pleasant", "comfortable", "genial", "benign", "favorable", "idyllic",
    "perfect", "biting", "bitter", "brisk", "chilling", "nippy", "piercing", "raw", "frigid",
    "arctic", "gelid", "damp", "dewy", "moist", "muggy", "humid", "clammy", "sticky", "sultry",
    "steamy", "tropical", "gusty", "blustery", "drafty", "squally", "whistling", "howling",
    "roaring", "rushing", "swirling", "eddying", "amber", "golden", "resplendent", "brilliant",
    "dazzling", "glittering", "shining", "glowing", "vibrant", "vivid", "somber", "gloomy",
    "mournful", "melancholy", "dreary", "dismal", "bleak", "depressing", "oppressive",
    "foreboding", "refreshing", "invigorating", "revitalizing", "rejuvenating", "energizing",
    "stimulating", "exhilarating", "bracing", "enlivening", "reviving", "ephemeral",
    "resonant", "synchronous", "parallel", "abstract", "abundant", "adjacent", "adventurous",
    "algorithmic", "ambiguous", "analog", "anomalous", "anonymous", "anticipatory", "arcane",
    "astronomical", "atmospheric", "authentic", "autonomous", "auxiliary", "balanced",
    "baroque", "botanical", "buoyant", "calibrated", "capricious", "cardinal", "cathartic",
    "chromatic", "cinematic", "cognitive", "coherent", "collective", "colloquial", "composite",
    "concentric", "concurrent", "conditional", "conductive", "continuous", "convergent",
    "crystallized", "cumulative", "curious", "cyclical", "defining", "deliberate", "delicate",
    "diagonal", "diaphanous", "diffuse", "digital", "dimensional", "dynamic", "eccentric",
    "eclectic", "economic", "elemental", "elliptical", "embedded", "emergent", "empirical",
    "enchanted", "encoded", "encompassing", "endemic", "equidistant", "equinoctial",
    "ergonomic", "evocative", "evolutionary", "exponential", "extraordinary", "faceted",
    "factorial", "figurative", "finite", "flourishing", "fluctuating", "fragmented",
    "galactic", "geometric", "gradient", "harmonic", "holographic", "horizontal", "hypnotic",
    "hypothetical", "iconic", "identical", "idiomatic", "illuminated", "illusory", "immersive",
    "implicit", "improvisational", "incidental", "indicative", "indigenous", "inductive",
    "inevitable", "innovative", "integral", "interactive", "interdependent", "intuitive",
    "inventive", "recursive", "kaleidoscopic", "kinetic", "layered", "lexical", "liminal",
    "linguistic", "logical", "magnetic", "manifold", "meditative", "melodious", "metaphoric",
    "microscopic", "modular", "molecular", "momentary", "monumental", "multilinear",
    "multiple", "mutational", "narrative", "nebular", "networked", "neutral", "nocturnal",
    "nomadic", "nonlinear", "nostalgic", "nuanced", "numeric", "objective", "observant",
    "ominous", "orbital", "organic", "oscillating", "panoramic", "paradoxical", "parametric",
    "particular", "perceptive", "peripheral", "perpetual", "phenomenal", "philosophical",
    "photographic", "physical", "planetary", "poetic", "polarized", "polygonal", "potential",
    "prismatic", "procedural", "profound", "progressive", "prolific", "protean",
    "prototypical", "proximate", "quantum", "quixotic", "quotidian", "radiant", "reflective",
    "refractive", "relative", "reminiscent", "reproductive", "revelatory", "rhythmic",
    "seasonal", "sequential", "significant", "simultaneous", "singular", "solstice",
    "synchronic", "synthetic", "systematic", "telescopic", "temporal", "tessellated",
    "theoretical", "threshold", "transcendent", "transitional", "ultramarine", "unfolding",
    "unified", "universal", "variant", "vector", "verbal", "vertical", "vestigial",
    "vibrational", "virtual", "visceral", "vortical", "wandering", "wavelike", "whimsical",
    "xenial", "zero",
];

#[derive(Debug, Clone)]
pub struct StaticWordSource {
    words: Vec<String>,
}

impl StaticWordSource {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn curated() -> Self {
        Self::new(CURATED_WORDS.iter().map(|w| w.to_string()).collect())
    }
}

impl Default for StaticWordSource {
    fn default() -> Self {
        Self::curated()
    }
}

#[async_trait]
impl WordSource for StaticWordSource {
    async fn list_candidate_words(&self) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }
}

/// Large English word list fetched from the dwyl `words_dictionary.json`
/// corpus, filtered to plain lowercase words of 4 to 11 letters and kept in
/// alphabetical order.
#[derive(Debug, Clone)]
pub struct RemoteWordSource {
    url: String,
    http: Client,
}

impl RemoteWordSource {
    pub fn new() -> Result<Self> {
        Self::with_url(DWYL_WORDS_URL)
    }

    pub fn with_url(url: &str) -> Result<Self> {
        Ok(Self { url: url.to_string(), http: build_client()? })
    }
}

#[async_trait]
impl WordSource for RemoteWordSource {
    async fn list_candidate_words(&self) -> Result<Vec<String>> {
        tracing::debug!(url = %self.url, "Fetching word list");

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("Failed to send request for word list")?;

        let body = read_body(res, "Word list").await?;

        let parsed: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&body).context("Failed to parse word list JSON")?;

        let words = filter_words(parsed.into_keys());
        if words.is_empty() {
            return Err(anyhow!("Word list contained no usable words"));
        }

        tracing::info!(count = words.len(), "Loaded remote word list");
        Ok(words)
    }
}

fn filter_words(words: impl Iterator<Item = String>) -> Vec<String> {
    words
        .filter(|w| (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&w.len()))
        .filter(|w| w.chars().all(|c| c.is_ascii_lowercase()))
        .take(MAX_REMOTE_WORDS)
        .collect()
}

/// Uses `primary`, falling back to `fallback` when it fails or comes back empty.
#[derive(Debug, Clone)]
pub struct FallbackWordSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackWordSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: WordSource, F: WordSource> WordSource for FallbackWordSource<P, F> {
    async fn list_candidate_words(&self) -> Result<Vec<String>> {
        match self.primary.list_candidate_words().await {
            Ok(words) if !words.is_empty() => Ok(words),
            Ok(_) => {
                tracing::warn!("Primary word source returned no words, using fallback");
                self.fallback.list_candidate_words().await
            }
            Err(err) => {
                tracing::warn!("Primary word source failed: {err:#}; using fallback");
                self.fallback.list_candidate_words().await
            }
        }
    }
}
