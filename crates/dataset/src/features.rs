use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use retention_core::{CustomerRecord, Segment};

/// Monthly charges at or above which a customer is `VIP`.
pub const VIP_CHARGES: f64 = 90.0;
/// Monthly charges at or above which a customer is `STANDARD`.
pub const STANDARD_CHARGES: f64 = 50.0;

/// Default width of the uniform noise added to churn scores.
pub const DEFAULT_JITTER: f64 = 0.1;

const MIN_SCORE: f64 = 0.01;
const MAX_SCORE: f64 = 0.99;

/// Derive the value tier from monthly charges. Missing charges map to
/// [`Segment::Other`].
pub fn derive_segment(monthly_charges: Option<f64>) -> Segment {
    match monthly_charges {
        Some(c) if c >= VIP_CHARGES => Segment::Vip,
        Some(c) if c >= STANDARD_CHARGES => Segment::Standard,
        _ => Segment::Other,
    }
}

/// Heuristic churn-probability model.
///
/// Starts from 0.3, adds 0.4 for month-to-month contracts, subtracts 0.2 for
/// tenure above 48 months and 0.3 for two-year contracts, then adds uniform
/// noise of width `jitter` and clamps to `[0.01, 0.99]`.
#[derive(Debug, Clone)]
pub struct ChurnModel {
    rng: StdRng,
    jitter: f64,
}

impl ChurnModel {
    /// A reproducible model: the same seed yields the same scores.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            jitter: DEFAULT_JITTER,
        }
    }

    /// A model seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            jitter: DEFAULT_JITTER,
        }
    }

    /// Build from an optional seed.
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Set the noise width. Negative values are treated as zero.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    /// The configured noise width.
    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// The deterministic part of the score, before noise and clamping.
    pub fn base_score(record: &CustomerRecord) -> f64 {
        let mut score = 0.3;
        match record.contract.as_deref() {
            Some("Month-to-month") => score += 0.4,
            Some("Two year") => score -= 0.3,
            _ => {}
        }
        if record.tenure.is_some_and(|t| t > 48.0) {
            score -= 0.2;
        }
        score
    }

    /// Score one record.
    pub fn score(&mut self, record: &CustomerRecord) -> f64 {
        let noise = if self.jitter > 0.0 {
            self.rng.gen_range(-0.5..0.5) * self.jitter
        } else {
            0.0
        };
        (Self::base_score(record) + noise).clamp(MIN_SCORE, MAX_SCORE)
    }

    /// Return a copy of `record` with derived `segment` and `churn_score`.
    ///
    /// Derived values replace any the source provided.
    pub fn enrich(&mut self, record: &CustomerRecord) -> CustomerRecord {
        let mut enriched = record.clone();
        enriched.segment = Some(derive_segment(record.monthly_charges));
        enriched.churn_score = Some(self.score(record));
        enriched
    }

    /// Enrich a batch, preserving order.
    pub fn enrich_all(&mut self, records: &[CustomerRecord]) -> Vec<CustomerRecord> {
        records.iter().map(|r| self.enrich(r)).collect()
    }
}
