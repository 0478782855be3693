use serde::{Deserialize, Serialize};

use retention_core::Label;

use super::expr::Expr;
use crate::error::RuleError;

/// The compiled condition of a conditional rule.
///
/// A condition that failed to compile stays in the rule set so it can be
/// listed and traced, but it never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// A type-checked expression.
    Compiled(Expr),
    /// Condition text that could not be compiled.
    Invalid {
        /// The raw condition text.
        source: String,
        /// Why compilation failed.
        reason: String,
    },
}

impl Condition {
    /// Wrap a compile result, keeping the raw text when it failed.
    pub fn from_result(source: &str, result: Result<Expr, RuleError>) -> Self {
        match result {
            Ok(expr) => Self::Compiled(expr),
            Err(e) => Self::Invalid {
                source: source.to_owned(),
                reason: e.to_string(),
            },
        }
    }

    /// The compiled expression, if compilation succeeded.
    pub fn expr(&self) -> Option<&Expr> {
        match self {
            Self::Compiled(expr) => Some(expr),
            Self::Invalid { .. } => None,
        }
    }

    /// Returns a human-readable representation of the condition.
    pub fn to_source(&self) -> String {
        match self {
            Self::Compiled(expr) => expr.to_source(),
            Self::Invalid { source, .. } => source.clone(),
        }
    }
}

/// A single policy rule.
///
/// Rules are evaluated in the order they appear in the [`RuleSet`]. The
/// first conditional rule whose condition holds, or the first fallback rule
/// reached, determines the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// `IF <condition> THEN RETURN "<LABEL>"`.
    Conditional {
        /// The condition that must hold.
        condition: Condition,
        /// The label returned on a match.
        result: Label,
        /// 1-based line in the policy document, if parsed from text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
    },
    /// `RETURN "<LABEL>"`, which matches unconditionally.
    Fallback {
        /// The label returned.
        result: Label,
        /// 1-based line in the policy document, if parsed from text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        line: Option<usize>,
    },
}

impl Rule {
    /// Create a conditional rule from a compiled expression.
    pub fn conditional(expr: Expr, result: impl Into<Label>) -> Self {
        Self::Conditional {
            condition: Condition::Compiled(expr),
            result: result.into(),
            line: None,
        }
    }

    /// Create a fallback rule.
    pub fn fallback(result: impl Into<Label>) -> Self {
        Self::Fallback {
            result: result.into(),
            line: None,
        }
    }

    /// Set the source line of this rule.
    #[must_use]
    pub fn with_line(mut self, source_line: usize) -> Self {
        match &mut self {
            Self::Conditional { line, .. } | Self::Fallback { line, .. } => {
                *line = Some(source_line);
            }
        }
        self
    }

    /// The label this rule returns when it matches.
    pub fn result(&self) -> &Label {
        match self {
            Self::Conditional { result, .. } | Self::Fallback { result, .. } => result,
        }
    }

    /// The source line, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Conditional { line, .. } | Self::Fallback { line, .. } => *line,
        }
    }

    /// Returns `true` for a fallback rule.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Returns a human-readable representation of the whole rule line.
    pub fn to_source(&self) -> String {
        match self {
            Self::Conditional {
                condition, result, ..
            } => format!("IF {} THEN RETURN \"{result}\"", condition.to_source()),
            Self::Fallback { result, .. } => format!("RETURN \"{result}\""),
        }
    }
}

/// An ordered list of rules. Insertion order is evaluation priority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set from rules in priority order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Append a rule with the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterate over the rules in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose condition failed to compile.
    pub fn invalid_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| {
            matches!(
                r,
                Rule::Conditional {
                    condition: Condition::Invalid { .. },
                    ..
                }
            )
        })
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
