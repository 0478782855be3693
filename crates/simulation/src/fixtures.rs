//! Policy test-suite runner.
//!
//! Loads YAML fixture files and runs each case through a [`RuleEngine`],
//! comparing the expected offer (and optionally the deciding rule's line)
//! against the actual outcome.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use retention_core::{CustomerRecord, Label};
use retention_rules::RuleEngine;

use crate::error::SimulationError;

/// A YAML fixture file containing policy test cases.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureFile {
    /// The test cases to execute.
    pub tests: Vec<FixtureCase>,
}

/// A single test case within a fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureCase {
    /// Human-readable test name.
    pub name: String,
    /// The record to evaluate.
    #[serde(default)]
    pub record: CustomerRecord,
    /// Expected offer label.
    pub expect: Label,
    /// If set, the policy line of the rule that should decide the case.
    #[serde(default)]
    pub matched_line: Option<usize>,
}

/// Result of running a fixture file.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureRunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<FixtureCaseResult>,
    pub duration_ms: u64,
}

impl FixtureRunSummary {
    /// Returns `true` when every selected case passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Result of a single fixture case.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureCaseResult {
    pub name: String,
    pub passed: bool,
    pub expected: Label,
    pub actual: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_line: Option<usize>,
    pub duration_us: u64,
}

/// Parse a YAML fixture file from a string.
pub fn parse_fixtures(yaml: &str) -> Result<FixtureFile, SimulationError> {
    serde_yaml_ng::from_str(yaml)
        .map_err(|e| SimulationError::Fixture(format!("invalid fixture YAML: {e}")))
}

/// Read and parse a YAML fixture file.
pub fn load_fixtures(path: &Path) -> Result<FixtureFile, SimulationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SimulationError::Fixture(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_fixtures(&content)
}

/// Run fixture cases against an engine.
///
/// An optional `filter` restricts execution to cases whose name contains the
/// given substring.
#[instrument(skip_all, fields(cases = fixtures.tests.len()))]
pub fn run_fixtures(
    engine: &RuleEngine,
    fixtures: &FixtureFile,
    filter: Option<&str>,
) -> FixtureRunSummary {
    let suite_start = Instant::now();
    let results: Vec<FixtureCaseResult> = fixtures
        .tests
        .iter()
        .filter(|tc| filter.is_none_or(|f| tc.name.contains(f)))
        .map(|tc| run_case(engine, tc))
        .collect();

    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;
    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = suite_start.elapsed().as_millis() as u64;

    FixtureRunSummary {
        total: results.len(),
        passed,
        failed,
        results,
        duration_ms,
    }
}

fn run_case(engine: &RuleEngine, tc: &FixtureCase) -> FixtureCaseResult {
    let case_start = Instant::now();
    let trace = engine.trace(&tc.record);
    #[allow(clippy::cast_possible_truncation)]
    let duration_us = case_start.elapsed().as_micros() as u64;

    let actual_line = trace
        .matched_rule
        .and_then(|i| engine.rules().rules().get(i))
        .and_then(retention_rules::Rule::line);

    let offer_match = trace.offer == tc.expect;
    let line_match = tc.matched_line.is_none_or(|expected| actual_line == Some(expected));
    let passed = offer_match && line_match;
    debug!(name = %tc.name, passed, actual = %trace.offer, "fixture case evaluated");

    FixtureCaseResult {
        name: tc.name.clone(),
        passed,
        expected: tc.expect.clone(),
        actual: trace.offer,
        expected_line: tc.matched_line,
        actual_line,
        duration_us,
    }
}
