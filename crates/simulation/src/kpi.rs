use serde::{Deserialize, Serialize};

use retention_core::EnrichedRecord;

use crate::config::ScoringConfig;

/// Aggregate indicators of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Number of evaluated records.
    pub rows: usize,
    /// Sum of offer costs.
    pub total_cost: f64,
    /// Mean offer cost, zero for an empty run.
    pub avg_cost: f64,
    /// Records whose churn score reaches the high-risk threshold.
    ///
    /// Compared on the unrounded score, so `0.696` is below `0.7` even though
    /// it displays as `0.70`.
    pub high_risk: usize,
    /// High-risk records that received an offer.
    pub covered: usize,
    /// `covered / high_risk`, zero when there are no high-risk records.
    pub coverage: f64,
    /// Coverage points, capped at the configured maximum.
    pub safety_score: f64,
    /// Budget points, zero once total cost exceeds the ceiling.
    pub efficiency_score: f64,
    /// Overage charge subtracted from the final score.
    pub penalty: f64,
    /// `max(0, round(safety + efficiency - penalty))`.
    pub final_score: u32,
}

impl KpiSummary {
    /// Coverage as a whole percentage.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn coverage_percent(&self) -> u32 {
        (self.coverage * 100.0).round().max(0.0) as u32
    }
}

/// Aggregate enriched records into a [`KpiSummary`].
///
/// Ratios with an empty denominator are zero.
#[allow(clippy::cast_precision_loss)]
pub fn summarize(records: &[EnrichedRecord], scoring: &ScoringConfig) -> KpiSummary {
    let rows = records.len();
    let total_cost: f64 = records.iter().map(|r| r.cost).sum();
    let avg_cost = if rows == 0 {
        0.0
    } else {
        total_cost / rows as f64
    };

    let high_risk: Vec<&EnrichedRecord> = records
        .iter()
        .filter(|r| r.record.is_high_risk(scoring.high_risk_threshold))
        .collect();
    let covered = high_risk.iter().filter(|r| !r.offer.is_no_offer()).count();
    let coverage = if high_risk.is_empty() {
        0.0
    } else {
        covered as f64 / high_risk.len() as f64
    };

    let safety_score = safety_score(coverage, scoring);
    let efficiency_score = efficiency_score(total_cost, scoring);
    let penalty = ((total_cost - scoring.budget_ceiling) * scoring.penalty_rate).max(0.0);

    KpiSummary {
        rows,
        total_cost,
        avg_cost,
        high_risk: high_risk.len(),
        covered,
        coverage,
        safety_score,
        efficiency_score,
        penalty,
        final_score: final_score(safety_score + efficiency_score - penalty),
    }
}

fn safety_score(coverage: f64, scoring: &ScoringConfig) -> f64 {
    if scoring.coverage_target <= 0.0 {
        return scoring.safety_points;
    }
    (coverage / scoring.coverage_target * scoring.safety_points).min(scoring.safety_points)
}

fn efficiency_score(total_cost: f64, scoring: &ScoringConfig) -> f64 {
    if total_cost > scoring.budget_ceiling {
        return 0.0;
    }
    let used = if scoring.budget_ceiling > 0.0 {
        total_cost / scoring.budget_ceiling
    } else {
        0.0
    };
    scoring.efficiency_base + scoring.efficiency_points * (1.0 - used)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn final_score(raw: f64) -> u32 {
    raw.round().max(0.0) as u32
}
