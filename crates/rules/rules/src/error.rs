use thiserror::Error;

/// Errors that can occur while parsing or compiling policy rules.
///
/// Evaluation itself never fails: a condition that cannot be compiled is
/// kept in the rule set as non-matching and reported through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// An operator or literal does not fit the kind of the field it is applied to.
    #[error("type error: {0}")]
    TypeError(String),

    /// A condition referenced a field the record does not have.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The condition or document text could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}
