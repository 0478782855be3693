pub mod eval;
pub mod executor;
pub mod trace;
pub mod value;

pub use eval::evaluate;
pub use executor::{RuleEngine, decide};
pub use value::Value;
