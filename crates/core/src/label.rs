use serde::{Deserialize, Serialize};

/// Label returned when no rule matches.
pub const NO_OFFER: &str = "NO_OFFER";
/// Small retention offer.
pub const SMALL: &str = "SMALL";
/// Medium retention offer.
pub const MEDIUM: &str = "MEDIUM";
/// Large retention offer.
pub const BIG: &str = "BIG";

/// Outcome tag produced by a policy rule.
///
/// Labels are always stored upper-case. The vocabulary is open: any tag a
/// policy returns is accepted, and tags without a known price cost nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Label(String);

impl Label {
    /// Create a label, normalizing it to upper case.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().to_uppercase())
    }

    /// The engine-level default outcome.
    #[must_use]
    pub fn no_offer() -> Self {
        Self(NO_OFFER.to_owned())
    }

    /// Return the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the `NO_OFFER` outcome.
    pub fn is_no_offer(&self) -> bool {
        self.0 == NO_OFFER
    }

    /// Fixed price of the offer this label stands for.
    pub fn cost(&self) -> f64 {
        match self.0.as_str() {
            BIG => 50.0,
            MEDIUM => 25.0,
            SMALL => 10.0,
            _ => 0.0,
        }
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::no_offer()
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Label {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<&str> for Label {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_upper_cased() {
        assert_eq!(Label::new("medium"), "MEDIUM");
        assert_eq!(Label::from("No_Offer"), Label::no_offer());
    }

    #[test]
    fn cost_table() {
        assert!((Label::new(BIG).cost() - 50.0).abs() < f64::EPSILON);
        assert!((Label::new(MEDIUM).cost() - 25.0).abs() < f64::EPSILON);
        assert!((Label::new(SMALL).cost() - 10.0).abs() < f64::EPSILON);
        assert!(Label::no_offer().cost().abs() < f64::EPSILON);
        assert!(Label::new("PLATINUM").cost().abs() < f64::EPSILON);
    }

    #[test]
    fn default_is_no_offer() {
        assert!(Label::default().is_no_offer());
        assert!(!Label::new(SMALL).is_no_offer());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::new("big")).unwrap();
        assert_eq!(json, "\"BIG\"");

        let label: Label = serde_json::from_str("\"small\"").unwrap();
        assert_eq!(label, "SMALL");
    }
}
