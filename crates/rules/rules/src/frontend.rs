use crate::error::RuleError;
use crate::ir::rule::RuleSet;

/// Trait for rule frontends that turn policy text into a [`RuleSet`].
pub trait RuleFrontend: Send + Sync {
    /// Return the file extensions this frontend supports (e.g., `["policy", "txt"]`).
    fn extensions(&self) -> &[&str];

    /// Parse rules from a string content.
    fn parse(&self, content: &str) -> Result<RuleSet, RuleError>;

    /// Parse rules from a file path.
    ///
    /// The default implementation reads the file and delegates to [`parse`](Self::parse).
    fn parse_file(&self, path: &std::path::Path) -> Result<RuleSet, RuleError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Parse(format!("cannot read {}: {e}", path.display())))?;
        self.parse(&content)
    }
}
