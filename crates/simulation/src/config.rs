use serde::{Deserialize, Serialize};

/// Constants of the KPI scoring formula.
///
/// Deserialized from the `[scoring]` table of the CLI configuration; every
/// field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Churn score at or above which a customer counts as high risk.
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: f64,
    /// Coverage at which the safety score is maxed out.
    #[serde(default = "default_coverage_target")]
    pub coverage_target: f64,
    /// Maximum safety score.
    #[serde(default = "default_safety_points")]
    pub safety_points: f64,
    /// Total spend above which efficiency drops to zero and the penalty applies.
    #[serde(default = "default_budget_ceiling")]
    pub budget_ceiling: f64,
    /// Efficiency score awarded for any spend within budget.
    #[serde(default = "default_efficiency_base")]
    pub efficiency_base: f64,
    /// Additional efficiency score, scaled by unspent budget.
    #[serde(default = "default_efficiency_points")]
    pub efficiency_points: f64,
    /// Score deducted per unit of spend over budget. Zero disables the penalty.
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: default_high_risk_threshold(),
            coverage_target: default_coverage_target(),
            safety_points: default_safety_points(),
            budget_ceiling: default_budget_ceiling(),
            efficiency_base: default_efficiency_base(),
            efficiency_points: default_efficiency_points(),
            penalty_rate: default_penalty_rate(),
        }
    }
}

fn default_high_risk_threshold() -> f64 {
    0.7
}

fn default_coverage_target() -> f64 {
    0.9
}

fn default_safety_points() -> f64 {
    50.0
}

fn default_budget_ceiling() -> f64 {
    3500.0
}

fn default_efficiency_base() -> f64 {
    30.0
}

fn default_efficiency_points() -> f64 {
    20.0
}

fn default_penalty_rate() -> f64 {
    0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_gives_defaults() {
        let config: ScoringConfig = toml::from_str("").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn partial_table_overrides_only_given_fields() {
        let config: ScoringConfig =
            toml::from_str("budget_ceiling = 1000.0\npenalty_rate = 0.0").unwrap();
        assert!((config.budget_ceiling - 1000.0).abs() < f64::EPSILON);
        assert!(config.penalty_rate.abs() < f64::EPSILON);
        assert!((config.high_risk_threshold - 0.7).abs() < f64::EPSILON);
        assert!((config.safety_points - 50.0).abs() < f64::EPSILON);
    }
}
