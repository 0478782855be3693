pub mod diagram;
pub mod explain;
pub mod rules;
pub mod simulate;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use tracing::debug;

use retention_core::CustomerRecord;
use retention_dataset::{Dataset, DatasetConfig};
use retention_rules::{RuleFrontend, RuleSet};
use retention_rules_policy::{DEFAULT_POLICY, PolicyFrontend};

use crate::OutputFormat;
use crate::config::RetentionConfig;

/// Everything a command needs: the merged configuration and the policy text.
pub struct Context {
    pub config: RetentionConfig,
    pub policy_text: String,
    pub format: OutputFormat,
}

impl Context {
    /// Merge CLI overrides into the file configuration and read the policy.
    pub fn new(
        config: RetentionConfig,
        policy: Option<PathBuf>,
        format: Option<OutputFormat>,
    ) -> anyhow::Result<Self> {
        let format = format.unwrap_or(config.output.format);
        let policy_text = match policy.as_deref().or(config.policy.path.as_deref()) {
            Some(path) => read_policy(path)?,
            None => {
                debug!("using built-in policy");
                DEFAULT_POLICY.to_owned()
            }
        };
        Ok(Self {
            config,
            policy_text,
            format,
        })
    }

    /// Parse the policy rules.
    pub fn rules(&self) -> anyhow::Result<RuleSet> {
        Ok(PolicyFrontend.parse(&self.policy_text)?)
    }
}

fn read_policy(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy at {}", path.display()))
}

/// Flags that select and shape the customer data.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Customer CSV file. Overrides `[dataset] path`.
    #[arg(long, env = "RETENTION_DATA")]
    pub data: Option<PathBuf>,

    /// Seed for churn-score noise. Overrides `[dataset] seed`.
    #[arg(long, env = "RETENTION_SEED")]
    pub seed: Option<u64>,
}

impl DataArgs {
    fn apply(&self, config: &DatasetConfig) -> DatasetConfig {
        let mut config = config.clone();
        if let Some(path) = &self.data {
            config.path = Some(path.clone());
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

/// Load the customer data and derive `segment` and `churn_score`.
pub fn load_records(ctx: &Context, args: &DataArgs) -> anyhow::Result<Vec<CustomerRecord>> {
    let config = args.apply(&ctx.config.dataset);
    let dataset = Dataset::load(&config)?;
    Ok(dataset.derive_features(&mut config.churn_model()))
}

/// Render an optional number, blank when absent.
pub fn opt_number(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(String::new, |v| format!("{v:.precision$}"))
}
