//! Policy simulation for retention rules.
//!
//! Runs a [`RuleSet`](retention_rules::RuleSet) over a batch of customer
//! records, prices each offer and scores the run:
//!
//! ```
//! use retention_core::CustomerRecord;
//! use retention_rules::{Rule, RuleSet};
//! use retention_simulation::{PolicySimulator, ScoringConfig};
//!
//! let rules = RuleSet::new(vec![Rule::fallback("SMALL")]);
//! let records = vec![CustomerRecord::new("c-1").with_churn_score(0.9)];
//!
//! let report = PolicySimulator::new(rules, ScoringConfig::default()).run(&records);
//! assert_eq!(report.summary.covered, 1);
//! ```
//!
//! Policies can also be checked against YAML fixtures with
//! [`run_fixtures`].

pub mod config;
mod error;
pub mod fixtures;
pub mod kpi;
pub mod simulator;

pub use config::ScoringConfig;
pub use error::SimulationError;
pub use fixtures::{
    FixtureCase, FixtureCaseResult, FixtureFile, FixtureRunSummary, load_fixtures,
    parse_fixtures, run_fixtures,
};
pub use kpi::{KpiSummary, summarize};
pub use simulator::{PolicySimulator, SimulationReport};
