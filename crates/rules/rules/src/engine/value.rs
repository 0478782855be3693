use retention_core::CustomerRecord;

use crate::ir::expr::{Field, Literal};

/// Runtime value produced by resolving a field or a literal.
///
/// Values borrow from the record or the expression they were resolved from,
/// so evaluating a condition does not allocate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// The null value: an absent field or the `null` literal.
    Null,
    /// A 64-bit floating-point number.
    Number(f64),
    /// A UTF-8 string.
    Text(&'a str),
}

impl<'a> Value<'a> {
    /// Resolve a field on a record. Absent fields resolve to `Null`.
    pub fn resolve(field: Field, record: &'a CustomerRecord) -> Self {
        let number = |n: Option<f64>| n.map_or(Self::Null, Self::Number);
        match field {
            Field::ChurnScore => number(record.churn_score),
            Field::MonthlyCharges => number(record.monthly_charges),
            Field::Tenure => number(record.tenure),
            Field::Segment => record
                .segment
                .map_or(Self::Null, |s| Self::Text(s.as_str())),
            Field::Contract => record.contract.as_deref().map_or(Self::Null, Self::Text),
        }
    }

    /// Convert a literal into a runtime value.
    pub fn from_literal(literal: &'a Literal) -> Self {
        match literal {
            Literal::Null => Self::Null,
            Literal::Number(n) => Self::Number(*n),
            Literal::String(s) => Self::Text(s),
        }
    }

    /// Returns `true` for the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns a string representation of the value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }

    /// Returns a human-readable display string for the value.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => (*s).to_owned(),
        }
    }
}
