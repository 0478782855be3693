use retention_rules::RuleError;
use thiserror::Error;

/// Errors from policy simulation and fixture runs.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A fixture file could not be read or parsed.
    #[error("fixture error: {0}")]
    Fixture(String),

    /// The policy rules could not be loaded.
    #[error(transparent)]
    Rules(#[from] RuleError),
}
