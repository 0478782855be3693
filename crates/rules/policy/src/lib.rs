//! Plain-text policy frontend.
//!
//! A policy document is free text with bracketed sections. The `[RULES]`
//! section holds one rule per line:
//!
//! ```text
//! [RULES]
//! // comments and blank lines are ignored
//! IF churn_score < 0.7 THEN RETURN "NO_OFFER"
//! IF segment == "VIP" AND contract == "Month-to-month" THEN RETURN "BIG"
//! RETURN "SMALL"
//! ```

pub mod document;
mod frontend;
mod parser;

pub use document::{DEFAULT_POLICY, PolicyDocument, Section, SectionLine};
pub use frontend::{LineShape, PolicyFrontend, classify_line};
pub use parser::compile_condition;
