use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Whether a field holds numbers or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Compared numerically with any operator.
    Numeric,
    /// Compared by exact string equality only.
    Text,
}

/// The record fields a condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Churn probability.
    ChurnScore,
    /// Monthly charges.
    MonthlyCharges,
    /// Tenure in months.
    Tenure,
    /// Value tier (`VIP`, `STANDARD`, `OTHER`).
    Segment,
    /// Contract type.
    Contract,
}

impl Field {
    /// All recognized fields.
    pub const ALL: [Self; 5] = [
        Self::ChurnScore,
        Self::MonthlyCharges,
        Self::Tenure,
        Self::Segment,
        Self::Contract,
    ];

    /// The name used in condition text.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChurnScore => "churn_score",
            Self::MonthlyCharges => "monthly_charges",
            Self::Tenure => "tenure",
            Self::Segment => "segment",
            Self::Contract => "contract",
        }
    }

    /// The value kind this field resolves to.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::ChurnScore | Self::MonthlyCharges | Self::Tenure => FieldKind::Numeric,
            Self::Segment | Self::Contract => FieldKind::Text,
        }
    }
}

impl FromStr for Field {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| RuleError::UnknownField(s.to_owned()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparison operators supported in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CompareOp {
    /// The operator as written in condition text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns `true` for the ordering operators `<`, `<=`, `>`, `>=`.
    pub fn is_relational(&self) -> bool {
        !matches!(self, Self::Eq | Self::Ne)
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// The `null` keyword.
    Null,
    /// A numeric literal.
    Number(f64),
    /// A double-quoted string literal.
    String(String),
}

impl Literal {
    /// Returns a short name of the literal kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }

    /// Returns the literal as it would be written in condition text.
    pub fn to_source(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

/// A single `<field> <op> <literal>` term.
///
/// Construction through [`Comparison::new`] checks that the operator and the
/// literal fit the field kind, so a compiled comparison can always be
/// evaluated. Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComparison")]
pub struct Comparison {
    field: Field,
    op: CompareOp,
    literal: Literal,
}

#[derive(Deserialize)]
struct RawComparison {
    field: Field,
    op: CompareOp,
    literal: Literal,
}

impl TryFrom<RawComparison> for Comparison {
    type Error = RuleError;

    fn try_from(raw: RawComparison) -> Result<Self, Self::Error> {
        Self::new(raw.field, raw.op, raw.literal)
    }
}

impl Comparison {
    /// Build a type-checked comparison.
    pub fn new(field: Field, op: CompareOp, literal: Literal) -> Result<Self, RuleError> {
        match (&literal, field.kind()) {
            (Literal::Null, _) if op.is_relational() => {
                return Err(RuleError::TypeError(format!(
                    "{field} {op} null: null only supports == and !="
                )));
            }
            (Literal::Null, _) | (Literal::Number(_), FieldKind::Numeric) => {}
            (Literal::String(_), FieldKind::Text) if !op.is_relational() => {}
            (Literal::String(_), FieldKind::Text) => {
                return Err(RuleError::TypeError(format!(
                    "{field} is a text field and does not support {op}"
                )));
            }
            _ => {
                return Err(RuleError::TypeError(format!(
                    "{field} cannot be compared with a {} literal",
                    literal.type_name()
                )));
            }
        }
        Ok(Self { field, op, literal })
    }

    /// The field on the left-hand side.
    pub fn field(&self) -> Field {
        self.field
    }

    /// The comparison operator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The literal on the right-hand side.
    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Returns the term as it would be written in condition text.
    pub fn to_source(&self) -> String {
        format!("{} {} {}", self.field, self.op, self.literal.to_source())
    }
}

/// A compiled condition: one or more comparisons joined by `AND`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExpr")]
pub struct Expr {
    terms: Vec<Comparison>,
}

#[derive(Deserialize)]
struct RawExpr {
    terms: Vec<Comparison>,
}

impl TryFrom<RawExpr> for Expr {
    type Error = RuleError;

    fn try_from(raw: RawExpr) -> Result<Self, Self::Error> {
        Self::new(raw.terms)
    }
}

impl Expr {
    /// Build a condition from its terms. At least one term is required.
    pub fn new(terms: Vec<Comparison>) -> Result<Self, RuleError> {
        if terms.is_empty() {
            return Err(RuleError::Parse("empty condition".to_owned()));
        }
        Ok(Self { terms })
    }

    /// A condition with a single term.
    pub fn single(term: Comparison) -> Self {
        Self { terms: vec![term] }
    }

    /// The AND-joined terms in source order.
    pub fn terms(&self) -> &[Comparison] {
        &self.terms
    }

    /// Returns a human-readable representation of the condition.
    pub fn to_source(&self) -> String {
        self.terms
            .iter()
            .map(Comparison::to_source)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
