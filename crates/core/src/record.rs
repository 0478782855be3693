use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::label::Label;

/// Customer value tier derived from monthly charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Segment {
    /// High-value customers.
    Vip,
    /// Mid-tier customers.
    Standard,
    /// Everyone else.
    Other,
}

impl Segment {
    /// Return the upper-case tag used in rule conditions (e.g. `"VIP"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Standard => "STANDARD",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "VIP" => Ok(Self::Vip),
            "STANDARD" => Ok(Self::Standard),
            "OTHER" => Ok(Self::Other),
            other => Err(CoreError::UnknownSegment(other.to_owned())),
        }
    }
}

/// One customer row as seen by the rule engine.
///
/// Every recognized field is optional: a field the upstream pipeline has not
/// populated resolves to `null` when a rule condition reads it. Columns the
/// engine does not recognize are carried verbatim in `extra` so the enriched
/// output can reproduce the input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// External customer identifier, if the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Value tier.
    #[serde(default)]
    pub segment: Option<Segment>,
    /// Contract type, e.g. `"Month-to-month"`, `"One year"`, `"Two year"`.
    #[serde(default)]
    pub contract: Option<String>,
    /// Monthly charges in currency units.
    #[serde(default)]
    pub monthly_charges: Option<f64>,
    /// Tenure in months.
    #[serde(default)]
    pub tenure: Option<f64>,
    /// Churn probability in `[0, 1]`.
    #[serde(default)]
    pub churn_score: Option<f64>,
    /// Unrecognized source columns.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CustomerRecord {
    /// Create an empty record with the given customer id.
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            ..Self::default()
        }
    }

    /// Set the segment.
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Set the contract type.
    #[must_use]
    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    /// Set the monthly charges.
    #[must_use]
    pub fn with_monthly_charges(mut self, charges: f64) -> Self {
        self.monthly_charges = Some(charges);
        self
    }

    /// Set the tenure in months.
    #[must_use]
    pub fn with_tenure(mut self, tenure: f64) -> Self {
        self.tenure = Some(tenure);
        self
    }

    /// Set the churn score.
    #[must_use]
    pub fn with_churn_score(mut self, score: f64) -> Self {
        self.churn_score = Some(score);
        self
    }

    /// Returns `true` when the churn score is present and at least `threshold`.
    pub fn is_high_risk(&self, threshold: f64) -> bool {
        self.churn_score.is_some_and(|s| s >= threshold)
    }
}

/// A customer record together with the offer the policy assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// The evaluated record.
    #[serde(flatten)]
    pub record: CustomerRecord,
    /// Outcome label returned by the rule engine.
    pub offer: Label,
    /// Cost of the offer.
    pub cost: f64,
}

impl EnrichedRecord {
    /// Attach an offer to a record, pricing it with [`Label::cost`].
    pub fn new(record: CustomerRecord, offer: Label) -> Self {
        let cost = offer.cost();
        Self {
            record,
            offer,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_round_trips_through_tag() {
        for seg in [Segment::Vip, Segment::Standard, Segment::Other] {
            assert_eq!(seg.as_str().parse::<Segment>().unwrap(), seg);
        }
    }

    #[test]
    fn segment_rejects_unknown_tag() {
        let err = "vip".parse::<Segment>().unwrap_err();
        assert_eq!(err.to_string(), "unknown segment: vip");
    }

    #[test]
    fn high_risk_requires_score() {
        let record = CustomerRecord::new("c-1");
        assert!(!record.is_high_risk(0.7));

        let record = record.with_churn_score(0.7);
        assert!(record.is_high_risk(0.7));
        assert!(!record.is_high_risk(0.71));
    }

    #[test]
    fn enriched_record_prices_offer() {
        let enriched = EnrichedRecord::new(CustomerRecord::new("c-1"), Label::new("big"));
        assert_eq!(enriched.offer.as_str(), "BIG");
        assert!((enriched.cost - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn enriched_record_serializes_flat() {
        let record = CustomerRecord::new("VIP-001")
            .with_segment(Segment::Vip)
            .with_contract("Month-to-month");
        let enriched = EnrichedRecord::new(record, Label::new("SMALL"));
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["customer_id"], "VIP-001");
        assert_eq!(json["segment"], "VIP");
        assert_eq!(json["offer"], "SMALL");
        assert_eq!(json["cost"], 10.0);
    }
}
