use std::time::Instant;

use tracing::{debug, instrument};

use retention_core::{CustomerRecord, Label};

use crate::engine::eval::evaluate;
use crate::engine::trace::{RuleEvaluationTrace, RuleTraceEntry, RuleTraceResult};
use crate::ir::rule::{Condition, Rule, RuleSet};

/// Outcome of checking one rule against a record.
enum RuleCheck {
    Matched,
    NotMatched,
    Invalid(String),
}

/// Check a single rule without looking at its neighbours.
fn check_rule(rule: &Rule, record: &CustomerRecord) -> RuleCheck {
    match rule {
        Rule::Fallback { .. } => RuleCheck::Matched,
        Rule::Conditional {
            condition: Condition::Compiled(expr),
            ..
        } => {
            if evaluate(expr, record) {
                RuleCheck::Matched
            } else {
                RuleCheck::NotMatched
            }
        }
        Rule::Conditional {
            condition: Condition::Invalid { reason, .. },
            ..
        } => RuleCheck::Invalid(reason.clone()),
    }
}

/// Run a record through an ordered rule list and return the first matching label.
///
/// Returns `NO_OFFER` when no rule matches, including for an empty rule set.
pub fn decide(record: &CustomerRecord, rules: &RuleSet) -> Label {
    for (index, rule) in rules.iter().enumerate() {
        match check_rule(rule, record) {
            RuleCheck::Matched => {
                debug!(index, line = ?rule.line(), offer = %rule.result(), "rule matched");
                return rule.result().clone();
            }
            RuleCheck::NotMatched => {}
            RuleCheck::Invalid(reason) => {
                debug!(index, line = ?rule.line(), %reason, "skipping rule with invalid condition");
            }
        }
    }

    debug!("no rules matched, returning NO_OFFER");
    Label::no_offer()
}

/// The rule engine evaluates customer records against a rule set.
///
/// Rules are evaluated in the order they were written. The first matching
/// rule determines the outcome. If no rule matches, the outcome is
/// `NO_OFFER`. The engine holds no mutable state and can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    /// Create a new rule engine with the given rules.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Return a reference to the rules in evaluation order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Decide the outcome for one record.
    pub fn decide(&self, record: &CustomerRecord) -> Label {
        decide(record, &self.rules)
    }

    /// Decide the outcome for many records, preserving input order.
    #[instrument(skip_all, fields(rules_count = self.rules.len(), records = records.len()))]
    pub fn decide_all(&self, records: &[CustomerRecord]) -> Vec<Label> {
        records.iter().map(|r| self.decide(r)).collect()
    }

    /// Evaluate one record and record what every rule did.
    ///
    /// Produces the same outcome as [`decide`](Self::decide). Rules after the
    /// deciding rule are reported as skipped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn trace(&self, record: &CustomerRecord) -> RuleEvaluationTrace {
        let start = Instant::now();
        let mut trace = Vec::with_capacity(self.rules.len());
        let mut matched_rule = None;
        let mut has_errors = false;
        let mut evaluated = 0;
        let mut skipped = 0;

        for (index, rule) in self.rules.iter().enumerate() {
            let entry = |result, evaluation_duration_us, error| RuleTraceEntry {
                index,
                line: rule.line(),
                rule_display: rule.to_source(),
                label: rule.result().clone(),
                result,
                evaluation_duration_us,
                error,
            };

            if matched_rule.is_some() {
                skipped += 1;
                trace.push(entry(RuleTraceResult::Skipped, 0, None));
                continue;
            }

            let rule_start = Instant::now();
            let check = check_rule(rule, record);
            let elapsed = rule_start.elapsed().as_micros() as u64;
            evaluated += 1;

            match check {
                RuleCheck::Matched => {
                    matched_rule = Some(index);
                    trace.push(entry(RuleTraceResult::Matched, elapsed, None));
                }
                RuleCheck::NotMatched => {
                    trace.push(entry(RuleTraceResult::NotMatched, elapsed, None));
                }
                RuleCheck::Invalid(reason) => {
                    has_errors = true;
                    trace.push(entry(RuleTraceResult::Error, elapsed, Some(reason)));
                }
            }
        }

        let offer = matched_rule
            .and_then(|i| self.rules.rules().get(i))
            .map_or_else(Label::no_offer, |r| r.result().clone());

        RuleEvaluationTrace {
            offer,
            matched_rule,
            has_errors,
            total_rules_evaluated: evaluated,
            total_rules_skipped: skipped,
            evaluation_duration_us: start.elapsed().as_micros() as u64,
            trace,
        }
    }
}
