use serde::Serialize;
use tracing::{info, instrument};

use retention_core::{CustomerRecord, EnrichedRecord};
use retention_rules::{RuleEngine, RuleSet};

use crate::config::ScoringConfig;
use crate::kpi::{KpiSummary, summarize};

/// Per-record outcomes and the aggregate KPIs of one run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// Enriched records in input order.
    pub records: Vec<EnrichedRecord>,
    pub summary: KpiSummary,
}

/// Runs a rule set over a batch of customer records and scores the result.
#[derive(Debug, Clone)]
pub struct PolicySimulator {
    engine: RuleEngine,
    scoring: ScoringConfig,
}

impl PolicySimulator {
    pub fn new(rules: RuleSet, scoring: ScoringConfig) -> Self {
        Self {
            engine: RuleEngine::new(rules),
            scoring,
        }
    }

    /// The engine used to decide each record.
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Decide every record, price the offers and aggregate the KPIs.
    #[instrument(skip_all, fields(rules_count = self.engine.rules().len(), records = records.len()))]
    pub fn run(&self, records: &[CustomerRecord]) -> SimulationReport {
        let enriched: Vec<EnrichedRecord> = records
            .iter()
            .map(|r| EnrichedRecord::new(r.clone(), self.engine.decide(r)))
            .collect();
        let summary = summarize(&enriched, &self.scoring);

        info!(
            rows = summary.rows,
            total_cost = summary.total_cost,
            coverage = summary.coverage,
            final_score = summary.final_score,
            "simulation complete"
        );

        SimulationReport {
            records: enriched,
            summary,
        }
    }
}
