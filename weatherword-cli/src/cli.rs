use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password};
use weatherword_core::{
    CacheOutcome, ChangePolicy, Config, DefinitionProvider, DictionaryApiProvider,
    FallbackWordSource, LocationQuery, ProviderId, RemoteWordSource, StaticWordSource,
    WeatherProvider, WeatherRequest, WordCache, WordSelector, WordSource,
    provider::{default_provider_from_config, provider_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherword", version, about = "Turn the current weather into a word")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Postal code, e.g. 90210.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    zip: Option<String>,

    /// Country for --zip (two-letter code); defaults to the configured country.
    #[arg(long, requires = "zip")]
    country: Option<String>,

    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Provider short name: "openweather" or "openmeteo".
    #[arg(long)]
    provider: Option<String>,
}

impl LocationArgs {
    fn query(&self, config: &Config) -> anyhow::Result<LocationQuery> {
        let query = match (&self.zip, self.lat, self.lon) {
            (Some(zip), _, _) => {
                let country = self.country.as_deref().unwrap_or(config.country());
                LocationQuery::postal_code(zip, country)?
            }
            (None, Some(lat), Some(lon)) => LocationQuery::coordinates(lat, lon)?,
            _ => bail!("Specify a location with --zip <code> or --lat <lat> --lon <lon>."),
        };
        Ok(query)
    }

    fn provider(&self, config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
        match &self.provider {
            Some(name) => provider_from_config(ProviderId::try_from(name.as_str())?, config),
            None => default_provider_from_config(config),
        }
    }
}

#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Leave barometric pressure out of the score.
    #[arg(long)]
    no_pressure: bool,

    /// Choose from the large remote word list (falls back to the curated list).
    #[arg(long)]
    remote_words: bool,
}

impl SelectionArgs {
    fn selector(&self, config: &Config) -> anyhow::Result<WordSelector> {
        let mut weights = config.factor_weights()?;
        if self.no_pressure {
            weights = weights.without_pressure();
        }
        Ok(WordSelector::new(weights)?)
    }

    async fn candidates(&self, config: &Config) -> anyhow::Result<Vec<String>> {
        if self.remote_words || config.selection.remote_words {
            let source = FallbackWordSource::new(RemoteWordSource::new()?, StaticWordSource::curated());
            source.list_candidate_words().await
        } else {
            StaticWordSource::curated().list_candidate_words().await
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "openmeteo".
        provider: String,
    },

    /// Show the weather word for a location.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Also look up the word's definition.
        #[arg(long)]
        define: bool,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Look up the definition of a word.
    Define { word: String },

    /// Keep refreshing, changing the word only when the weather changes noticeably.
    Watch {
        #[command(flatten)]
        location: LocationArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Seconds between refreshes.
        #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(10..))]
        interval: u64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { location, selection, define, json } => {
                show(&location, &selection, define, json).await
            }
            Command::Define { word } => {
                let provider = DictionaryApiProvider::new()?;
                let definition = provider.define(&word).await?;
                println!("{}", render::definition(&word, definition.as_deref()));
                Ok(())
            }
            Command::Watch { location, selection, interval } => {
                watch(&location, &selection, Duration::from_secs(interval)).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {id}:"))
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            bail!("API key must not be empty");
        }
        config.upsert_provider_api_key(id, api_key);
    }

    if config.can_become_default(id)? {
        let make_default = Confirm::new(&format!("Make {id} the default provider?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    location: &LocationArgs,
    selection: &SelectionArgs,
    define: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    // reject bad input before building clients or touching the network
    let query = location.query(&config)?;
    let selector = selection.selector(&config)?;
    let provider = location.provider(&config)?;

    let observation = provider.current(&WeatherRequest::new(query)).await?;
    let candidates = selection.candidates(&config).await?;
    tracing::debug!(candidates = candidates.len(), "Loaded candidate words");
    let result = selector.select(&observation, &candidates);

    let definition = if define {
        lookup_definition(DictionaryApiProvider::new(), &result.word).await
    } else {
        None
    };

    if json {
        let out = serde_json::json!({
            "observation": observation,
            "selection": result,
            "definition": definition,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", render::selection(&observation, &result));
        if define {
            println!();
            println!("{}", render::definition(&result.word, definition.as_deref()));
        }
    }

    Ok(())
}

/// A failed lookup is reported on stderr; the word is still shown.
async fn lookup_definition(
    dictionary: anyhow::Result<impl DefinitionProvider>,
    word: &str,
) -> Option<String> {
    let looked_up = match dictionary {
        Ok(dictionary) => dictionary.define(word).await,
        Err(err) => Err(err),
    };
    match looked_up {
        Ok(definition) => definition,
        Err(err) => {
            eprintln!("Definition lookup failed: {err:#}");
            None
        }
    }
}

async fn watch(
    location: &LocationArgs,
    selection: &SelectionArgs,
    interval: Duration,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let query = location.query(&config)?;
    let selector = selection.selector(&config)?;
    let provider = location.provider(&config)?;
    let candidates = selection.candidates(&config).await?;
    let request = WeatherRequest::new(query);

    let mut cache = WordCache::new(ChangePolicy::default());
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let observation = match provider.current(&request).await {
            Ok(obs) => obs,
            Err(err) => {
                // keep the previous word; try again on the next tick
                eprintln!("Weather error: {err:#}");
                continue;
            }
        };

        let (result, outcome) = cache.select_or_reuse(observation, &selector, &candidates);
        match outcome {
            CacheOutcome::Fresh => {
                if let Some(obs) = cache.last_observation() {
                    println!("{}\n", render::selection(obs, &result));
                }
            }
            CacheOutcome::Reused => {
                println!("No significant change; still \"{}\"", result.word);
            }
        }
    }
}
