//! Word definitions, fetched on demand.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::http::{build_client, read_body};

pub const DICTIONARY_API_BASE: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Words whose definitions are known without a lookup.
pub const RELIABLE_DEFINITIONS: &[(&str, &str)] = &[
    ("serenity", "The state of being calm, peaceful, and untroubled."),
    ("luminous", "Full of or shedding light; bright or shining."),
    ("cascade", "A small waterfall, typically one of several that fall in stages."),
    ("tranquil", "Free from disturbance; calm."),
    ("ethereal", "Extremely delicate and light in a way that seems too perfect for this world."),
    ("tempest", "A violent windy storm."),
    ("pristine", "In its original condition; unspoiled."),
    ("azure", "Bright blue in color like a cloudless sky."),
    ("celestial", "Positioned in or relating to the sky, or outer space as observed in astronomy."),
    ("enigmatic", "Difficult to interpret or understand; mysterious."),
];

pub fn reliable_definition(word: &str) -> Option<&'static str> {
    RELIABLE_DEFINITIONS
        .iter()
        .find(|(w, _)| w.eq_ignore_ascii_case(word.trim()))
        .map(|(_, d)| *d)
}

#[async_trait]
pub trait DefinitionProvider: Send + Sync + std::fmt::Debug {
    /// Short human-readable definition, or `None` when the word is unknown.
    async fn define(&self, word: &str) -> Result<Option<String>>;
}

/// Looks words up in the free dictionaryapi.dev service.
#[derive(Debug, Clone)]
pub struct DictionaryApiProvider {
    base_url: String,
    http: Client,
}

impl DictionaryApiProvider {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DICTIONARY_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http: build_client()? })
    }

    async fn fetch(&self, word: &str) -> Result<Option<String>> {
        let url = format!("{}/{}", self.base_url, word);
        tracing::debug!(%url, "Fetching definition");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to dictionary API")?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = read_body(res, "Dictionary API").await?;
        let entries: Vec<DaEntry> =
            serde_json::from_str(&body).context("Failed to parse dictionary API JSON")?;

        Ok(first_definition(&entries))
    }
}

#[async_trait]
impl DefinitionProvider for DictionaryApiProvider {
    async fn define(&self, word: &str) -> Result<Option<String>> {
        let word = word.trim().to_lowercase();
        if word.is_empty() || !word.chars().all(|c| c.is_alphabetic() || c == '-' || c == '\'') {
            return Ok(None);
        }

        if let Some(def) = reliable_definition(&word) {
            return Ok(Some(def.to_string()));
        }

        self.fetch(&word).await
    }
}

fn first_definition(entries: &[DaEntry]) -> Option<String> {
    entries.iter().flat_map(|e| &e.meanings).find_map(|meaning| {
        let def = meaning
            .definitions
            .iter()
            .map(|d| d.definition.trim())
            .find(|d| !d.is_empty())?;

        Some(match meaning.part_of_speech.as_deref() {
            Some(pos) if !pos.is_empty() => format!("({pos}) {def}"),
            _ => def.to_string(),
        })
    })
}

#[derive(Debug, Deserialize)]
struct DaDefinition {
    definition: String,
}

#[derive(Debug, Deserialize)]
struct DaMeaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<DaDefinition>,
}

#[derive(Debug, Deserialize)]
struct DaEntry {
    #[serde(default)]
    meanings: Vec<DaMeaning>,
}
