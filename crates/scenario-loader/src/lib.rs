//! Scenario Loader
//!
//! Loads one scenario from a multi-scenario dataset and produces the
//! artifacts consumed by rendering: the indexed, speed-annotated scenario
//! table, its map features, and the static / moving-vehicle / VRU split.
//!
//! Parsed datasets and per-scenario bundles are memoized on a fingerprint
//! of the source files, so re-selecting a scenario never re-parses or
//! re-classifies unless a file changed on disk.

mod bundle;
mod cache;
mod loader;
mod source;

pub use bundle::ScenarioBundle;
pub use cache::{CacheConfig, Eviction, ScenarioCache};
pub use loader::{build_bundle, CacheStats, ScenarioLoader};
pub use source::{CsvSource, Dataset, DatasetSource, FileStamp, SourceFingerprint};

use motion_log::SchemaError;
use thiserror::Error;

/// Scenario loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Cache lock poisoned: {0}")]
    CachePoisoned(String),
}
