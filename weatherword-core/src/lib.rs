//! Core library for the `weatherword` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers, geocoding and definitions
//! - The word selector that turns an observation into a single word
//! - The change check and cache that decide when a new word is warranted
//!
//! It is used by `weatherword-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod change;
pub mod condition;
pub mod config;
pub mod definition;
pub mod error;
pub mod geocode;
mod http;
pub mod model;
pub mod provider;
pub mod selector;
pub mod words;

pub use cache::{CacheOutcome, WordCache};
pub use change::ChangePolicy;
pub use config::{Config, ProviderConfig, SelectionConfig};
pub use definition::{DefinitionProvider, DictionaryApiProvider};
pub use error::{InputError, WeightsError};
pub use model::{Coordinates, LocationQuery, WeatherObservation, WeatherRequest};
pub use provider::{ProviderId, WeatherProvider};
pub use selector::{Factor, FactorContributions, FactorWeights, WordSelection, WordSelector};
pub use words::{FallbackWordSource, RemoteWordSource, StaticWordSource, WordSource};
