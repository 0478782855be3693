use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use retention_dataset::DatasetConfig;
use retention_simulation::ScoringConfig;

use crate::OutputFormat;

/// Contents of `retention.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetentionConfig {
    /// Policy document selection.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// KPI scoring constants.
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Customer data source and feature derivation.
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Output rendering.
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Policy document to load instead of the built-in one.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Number of enriched rows printed in text output.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            format: OutputFormat::default(),
        }
    }
}

fn default_rows() -> usize {
    15
}

/// Load configuration from a TOML file, or use defaults if the file does not exist.
pub fn load_config(path: &Path) -> anyhow::Result<RetentionConfig> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(toml::from_str("")?);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: RetentionConfig = toml::from_str("").unwrap();
        assert!(config.policy.path.is_none());
        assert_eq!(config.scoring, ScoringConfig::default());
        assert!(config.dataset.fallback);
        assert_eq!(config.output.rows, 15);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn full_config() {
        let config: RetentionConfig = toml::from_str(
            r#"
[policy]
path = "policies/aggressive.policy"

[scoring]
budget_ceiling = 5000.0
penalty_rate = 0.0

[dataset]
path = "data/customers.csv"
fallback = false
seed = 42
jitter = 0.05

[output]
rows = 30
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(
            config.policy.path,
            Some(PathBuf::from("policies/aggressive.policy"))
        );
        assert!((config.scoring.budget_ceiling - 5000.0).abs() < f64::EPSILON);
        assert!((config.scoring.coverage_target - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.dataset.seed, Some(42));
        assert!(!config.dataset.fallback);
        assert_eq!(config.output.rows, 30);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/retention.toml")).unwrap();
        assert_eq!(config.output.rows, 15);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nrows = \"many\"").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
