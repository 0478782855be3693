use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use retention_core::Label;
use retention_rules::ir::rule::{Condition, Rule, RuleSet};
use retention_rules::{RuleError, RuleFrontend};

use crate::document::{PolicyDocument, RULES_SECTION};
use crate::parser::compile_condition;

/// `IF <condition> THEN RETURN "<LABEL>"`; the condition is matched lazily.
static CONDITIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^IF\s+(.+?)\s+THEN\s+RETURN\s+"?([A-Z_]+)"?$"#)
        .expect("conditional rule regex is valid")
});

/// `RETURN "<LABEL>"`.
static FALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^RETURN\s+"?([A-Z_]+)"?$"#).expect("fallback rule regex is valid")
});

/// The shape of a single trimmed rule line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape<'a> {
    /// `IF ... THEN RETURN ...` with the raw condition text and label.
    Conditional { condition: &'a str, label: &'a str },
    /// `RETURN ...` with the raw label.
    Fallback { label: &'a str },
    /// Anything else.
    Unrecognized,
}

/// Classify a trimmed line by its shape. Keywords are case-insensitive and
/// the quotes around the label are optional.
pub fn classify_line(line: &str) -> LineShape<'_> {
    if let Some((condition, label)) = CONDITIONAL_RE
        .captures(line)
        .and_then(|c| Some((c.get(1)?, c.get(2)?)))
    {
        return LineShape::Conditional {
            condition: condition.as_str(),
            label: label.as_str(),
        };
    }
    if let Some(label) = FALLBACK_RE.captures(line).and_then(|c| c.get(1)) {
        return LineShape::Fallback {
            label: label.as_str(),
        };
    }
    LineShape::Unrecognized
}

/// A [`RuleFrontend`] for plain-text policy documents.
///
/// Only the `[RULES]` section is read. Blank lines and `//` comments are
/// skipped, lines of an unrecognized shape are dropped, and a condition that
/// fails to compile is kept as [`Condition::Invalid`]. Parsing document text
/// never fails; the `Result` only carries I/O errors from
/// [`parse_file`](RuleFrontend::parse_file).
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyFrontend;

impl PolicyFrontend {
    /// Parse the rule section of a document that has already been split.
    pub fn parse_document(&self, document: &PolicyDocument<'_>) -> RuleSet {
        let Some(section) = document.section(RULES_SECTION) else {
            debug!("policy has no [{RULES_SECTION}] section, rule set is empty");
            return RuleSet::default();
        };

        let mut rules = RuleSet::default();
        for line in section.lines() {
            let text = line.text.trim();
            if text.is_empty() || text.starts_with("//") {
                continue;
            }

            match classify_line(text) {
                LineShape::Conditional { condition, label } => {
                    let compiled = compile_condition(condition);
                    if let Err(e) = &compiled {
                        warn!(line = line.number, condition, error = %e, "rule condition does not compile and will never match");
                    }
                    rules.push(Rule::Conditional {
                        condition: Condition::from_result(condition, compiled),
                        result: Label::new(label),
                        line: Some(line.number),
                    });
                }
                LineShape::Fallback { label } => {
                    rules.push(Rule::fallback(label).with_line(line.number));
                }
                LineShape::Unrecognized => {
                    trace!(line = line.number, text, "ignoring unrecognized rule line");
                }
            }
        }

        debug!(
            rules_count = rules.len(),
            invalid = rules.invalid_rules().count(),
            "parsed policy rules"
        );
        rules
    }
}

impl RuleFrontend for PolicyFrontend {
    fn extensions(&self) -> &[&str] {
        &["policy", "txt"]
    }

    fn parse(&self, content: &str) -> Result<RuleSet, RuleError> {
        Ok(self.parse_document(&PolicyDocument::new(content)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use retention_core::{CustomerRecord, Segment};
    use retention_rules::RuleEngine;

    use super::*;
    use crate::document::DEFAULT_POLICY;

    fn parse(text: &str) -> RuleSet {
        PolicyFrontend.parse(text).unwrap()
    }

    #[test]
    fn classify_conditional_line() {
        assert_eq!(
            classify_line(r#"IF churn_score < 0.7 THEN RETURN "NO_OFFER""#),
            LineShape::Conditional {
                condition: "churn_score < 0.7",
                label: "NO_OFFER"
            }
        );
    }

    #[test]
    fn classify_is_case_insensitive_and_quotes_optional() {
        assert_eq!(
            classify_line("if tenure > 3 then return small"),
            LineShape::Conditional {
                condition: "tenure > 3",
                label: "small"
            }
        );
        assert_eq!(
            classify_line("Return \"BIG\""),
            LineShape::Fallback { label: "BIG" }
        );
    }

    #[test]
    fn classify_rejects_other_shapes() {
        for line in [
            "IF churn_score < 0.7",
            "RETURN \"BIG-ONE\"",
            "THEN RETURN \"BIG\"",
            "ELSE RETURN \"BIG\"",
            "RETURN",
        ] {
            assert_eq!(classify_line(line), LineShape::Unrecognized, "{line}");
        }
    }

    #[test]
    fn label_must_end_the_line() {
        assert_eq!(
            classify_line(r#"IF contract == "x THEN RETURN y" THEN RETURN "BIG""#),
            LineShape::Conditional {
                condition: r#"contract == "x THEN RETURN y""#,
                label: "BIG"
            }
        );
        assert_eq!(classify_line(r#"IF a THEN RETURN "B" X"#), LineShape::Unrecognized);
    }

    #[test]
    fn missing_rules_header_gives_empty_set() {
        assert!(parse("ROLE:\nnobody\nRETURN \"BIG\"").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn comments_blanks_and_junk_are_skipped() {
        let rules = parse(
            "[RULES]\n\n// a comment\nthis is not a rule\nIF tenure > 3 THEN RETURN \"small\"\n   RETURN NO_OFFER   \n",
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].result(), &Label::new("SMALL"));
        assert_eq!(rules.rules()[0].line(), Some(5));
        assert!(rules.rules()[1].is_fallback());
        assert_eq!(rules.rules()[1].line(), Some(6));
    }

    #[test]
    fn section_ends_at_next_header() {
        let rules = parse("[RULES]\nRETURN \"SMALL\"\n[OTHER]\nRETURN \"BIG\"");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.rules()[0].result().as_str(), "SMALL");
    }

    #[test]
    fn repeated_rules_header_ends_section() {
        let rules = parse("[RULES]\nRETURN \"SMALL\"\n[RULES]\nRETURN \"BIG\"\n");
        let labels: Vec<_> = rules.iter().map(|r| r.result().as_str()).collect();
        assert_eq!(labels, ["SMALL"]);
    }

    #[test]
    fn invalid_condition_is_kept_but_never_matches() {
        let rules = parse("[RULES]\nIF age > 30 THEN RETURN \"BIG\"\nRETURN \"SMALL\"");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.invalid_rules().count(), 1);

        let engine = RuleEngine::new(rules);
        let record = CustomerRecord::new("c").with_tenure(40.0);
        assert_eq!(engine.decide(&record).as_str(), "SMALL");
    }

    #[test]
    fn parse_is_idempotent() {
        assert_eq!(parse(DEFAULT_POLICY), parse(DEFAULT_POLICY));
    }

    #[test]
    fn default_policy_rules() {
        let rules = parse(DEFAULT_POLICY);
        assert_eq!(rules.len(), 7);
        assert_eq!(rules.invalid_rules().count(), 0);
        assert!(rules.rules()[6].is_fallback());

        let engine = RuleEngine::new(rules);
        let vip = CustomerRecord::new("VIP-001")
            .with_segment(Segment::Vip)
            .with_contract("Month-to-month")
            .with_churn_score(0.85);
        assert_eq!(engine.decide(&vip).as_str(), "BIG");

        let unscored = CustomerRecord::new("STD-001").with_segment(Segment::Standard);
        assert!(engine.decide(&unscored).is_no_offer());
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".policy")
            .tempfile()
            .unwrap();
        file.write_all(b"[RULES]\nRETURN \"MEDIUM\"\n").unwrap();

        let rules = PolicyFrontend.parse_file(file.path()).unwrap();
        assert_eq!(rules.rules()[0].result().as_str(), "MEDIUM");
    }

    #[test]
    fn parse_file_missing_is_an_error() {
        let err = PolicyFrontend
            .parse_file(std::path::Path::new("/nonexistent/policy.txt"))
            .unwrap_err();
        assert!(matches!(err, RuleError::Parse(msg) if msg.contains("cannot read")));
    }

    #[test]
    fn extensions() {
        assert_eq!(PolicyFrontend.extensions(), &["policy", "txt"]);
    }
}
