use serde::{Deserialize, Serialize};

use retention_core::Label;

/// Result of evaluating a single rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleTraceResult {
    /// The rule's condition held, or the rule is a fallback.
    Matched,
    /// The rule's condition did not hold.
    NotMatched,
    /// The rule was not reached because an earlier rule matched.
    Skipped,
    /// The rule's condition could not be compiled.
    Error,
}

impl RuleTraceResult {
    /// Return the `snake_case` string representation (matches serde serialization).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NotMatched => "not_matched",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

/// Trace entry for a single rule evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTraceEntry {
    /// Position of the rule in the rule set (0-based).
    pub index: usize,
    /// Source line of the rule, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Human-readable representation of the rule.
    pub rule_display: String,
    /// The label this rule returns on a match.
    pub label: Label,
    /// Result of evaluating this rule.
    pub result: RuleTraceResult,
    /// Time spent evaluating this rule in microseconds.
    pub evaluation_duration_us: u64,
    /// Compile error of the rule's condition, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete trace of evaluating one record against a rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEvaluationTrace {
    /// The final outcome.
    pub offer: Label,
    /// Index of the rule that decided the outcome, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<usize>,
    /// `true` when one or more reached rules had an invalid condition.
    #[serde(default)]
    pub has_errors: bool,
    /// Number of rules whose conditions were actually evaluated.
    pub total_rules_evaluated: usize,
    /// Number of rules that were skipped.
    pub total_rules_skipped: usize,
    /// Total wall-clock time for the entire evaluation in microseconds.
    pub evaluation_duration_us: u64,
    /// Per-rule trace entries in evaluation order.
    pub trace: Vec<RuleTraceEntry>,
}
