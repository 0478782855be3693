pub mod engine;
pub mod error;
pub mod frontend;
pub mod ir;

pub use engine::trace::{RuleEvaluationTrace, RuleTraceEntry, RuleTraceResult};
pub use engine::{RuleEngine, Value, decide, evaluate};
pub use error::RuleError;
pub use frontend::RuleFrontend;
pub use ir::expr::{CompareOp, Comparison, Expr, Field, FieldKind, Literal};
pub use ir::rule::{Condition, Rule, RuleSet};
