//! TOML configuration for dataset builds.
//!
//! ```toml
//! endpoint = "https://query.wikidata.org/bigdata/namespace/wdq/sparql"
//! graph-host = "www.wikidata.org"
//! only-identifiers = false
//! train-ratio = 0.8
//! timeout-secs = 60
//! identifier-scheme = "wikidata"
//!
//! [filters]
//! accept-entity = true
//! accept-reference = false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::classify::{EntityClassifier, EntityFilters, IdentifierScheme, WIKIDATA_HOST};
use crate::endpoint::{SparqlEndpoint, WIKIDATA_ENDPOINT};
use crate::error::{ConfigError, SplitError};
use crate::split::DEFAULT_TRAIN_RATIO;

/// Settings for fetching, classifying and splitting a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DatasetConfig {
    /// SPARQL endpoint URL.
    pub endpoint: String,
    /// Authority whose IRIs are filtered by category.
    pub graph_host: String,
    /// Reject literal entities even when literal admission is on.
    pub only_identifiers: bool,
    /// Fraction of triplets kept for training.
    pub train_ratio: f64,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Validation of plain identifiers in direct and delimited ingest.
    pub identifier_scheme: IdentifierScheme,
    pub filters: EntityFilters,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            endpoint: WIKIDATA_ENDPOINT.to_string(),
            graph_host: WIKIDATA_HOST.to_string(),
            only_identifiers: false,
            train_ratio: DEFAULT_TRAIN_RATIO,
            timeout_secs: 60,
            identifier_scheme: IdentifierScheme::Plain,
            filters: EntityFilters::default(),
        }
    }
}

impl DatasetConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if !(config.train_ratio > 0.0 && config.train_ratio < 1.0) {
            return Err(ConfigError::Parse {
                path: path.display().to_string(),
                message: SplitError::InvalidRatio {
                    ratio: config.train_ratio,
                }
                .to_string(),
            });
        }
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml().map_err(|message| ConfigError::Write {
            path: path.display().to_string(),
            message,
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Pretty TOML rendering.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }

    pub fn classifier(&self) -> EntityClassifier {
        EntityClassifier::new(self.graph_host.clone(), self.filters)
            .with_scheme(self.identifier_scheme)
    }

    pub fn endpoint(&self) -> SparqlEndpoint {
        SparqlEndpoint::new(self.endpoint.clone(), Duration::from_secs(self.timeout_secs))
    }
}
