use std::path::PathBuf;

use serde::Deserialize;
use tracing::{info, warn};

use retention_core::CustomerRecord;

use crate::csv::load_csv;
use crate::error::DatasetError;
use crate::fallback::fallback_records;
use crate::features::{ChurnModel, DEFAULT_JITTER};

/// Where customer data comes from and how features are derived.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file with customer rows.
    pub path: Option<PathBuf>,
    /// Use the built-in sample when the file cannot be loaded.
    pub fallback: bool,
    /// Seed for churn-score noise. Unset means a fresh seed per run.
    pub seed: Option<u64>,
    /// Width of the churn-score noise.
    pub jitter: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("data/telco_sample.csv")),
            fallback: true,
            seed: None,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl DatasetConfig {
    /// The churn model described by this configuration.
    pub fn churn_model(&self) -> ChurnModel {
        ChurnModel::new(self.seed).with_jitter(self.jitter)
    }
}

/// Where a loaded batch came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Rows read from a CSV file.
    File(PathBuf),
    /// The built-in sample.
    Fallback,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Fallback => f.write_str("built-in sample"),
        }
    }
}

/// Raw customer rows and their origin, before feature derivation.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: DataSource,
    pub records: Vec<CustomerRecord>,
}

impl Dataset {
    /// Load the configured file.
    ///
    /// When loading fails and `fallback` is enabled, the error is logged and
    /// the built-in sample is returned instead. Otherwise the error is
    /// returned. A file with a header but no rows counts as a failure. With
    /// no path configured the sample is used only if `fallback` is enabled.
    pub fn load(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let loaded = match &config.path {
            Some(path) => load_csv(path).map(|records| Self {
                source: DataSource::File(path.clone()),
                records,
            }),
            None => Err(DatasetError::EmptyInput),
        };

        match loaded {
            Ok(dataset) => {
                info!(source = %dataset.source, rows = dataset.records.len(), "loaded customer data");
                Ok(dataset)
            }
            Err(e) if config.fallback => {
                warn!(error = %e, "customer data unavailable, using built-in sample");
                Ok(Self::fallback())
            }
            Err(e) => Err(e),
        }
    }

    /// The built-in sample.
    pub fn fallback() -> Self {
        Self {
            source: DataSource::Fallback,
            records: fallback_records(),
        }
    }

    /// Derive `segment` and `churn_score` for every row.
    pub fn derive_features(&self, model: &mut ChurnModel) -> Vec<CustomerRecord> {
        model.enrich_all(&self.records)
    }
}
