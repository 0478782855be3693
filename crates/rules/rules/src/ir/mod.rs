pub mod expr;
pub mod rule;
