/// Name of the section holding the rule lines.
pub const RULES_SECTION: &str = "RULES";

/// Name of the section holding the flowchart source.
pub const DIAGRAM_SECTION: &str = "MERMAID";

/// Diagram returned when a document has no diagram section.
pub const MISSING_DIAGRAM: &str = "flowchart TD\n  A[No MERMAID section found]";

/// The policy document shipped with the tool.
pub const DEFAULT_POLICY: &str = include_str!("../policies/default.policy");

/// One raw line of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLine<'a> {
    /// 1-based line number in the whole document.
    pub number: usize,
    /// The line text, untrimmed.
    pub text: &'a str,
}

/// The lines between a `[NAME]` header and the next bracketed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    header_line: usize,
    lines: Vec<SectionLine<'a>>,
}

impl<'a> Section<'a> {
    /// 1-based line number of the `[NAME]` header.
    pub fn header_line(&self) -> usize {
        self.header_line
    }

    /// The body lines in document order.
    pub fn lines(&self) -> &[SectionLine<'a>] {
        &self.lines
    }

    /// The body joined with newlines and trimmed.
    pub fn body(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_owned()
    }
}

/// A plain-text policy document made of free text and `[NAME]` sections.
///
/// A section starts after the first line whose trimmed text is exactly
/// `[NAME]` and runs until the next line whose trimmed text starts with `[`
/// or the end of the document. The diagram section alone tolerates a repeat
/// of its own header inside its body.
#[derive(Debug, Clone, Copy)]
pub struct PolicyDocument<'a> {
    text: &'a str,
}

impl<'a> PolicyDocument<'a> {
    /// Wrap document text without copying it.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// The full document text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Find a section by name, without brackets (e.g. `"RULES"`).
    pub fn section(&self, name: &str) -> Option<Section<'a>> {
        self.find_section(name, false)
    }

    fn find_section(&self, name: &str, allow_repeat: bool) -> Option<Section<'a>> {
        let header = format!("[{name}]");
        let mut lines = self.text.lines().enumerate();
        let (header_index, _) = lines.by_ref().find(|(_, l)| l.trim() == header)?;

        let body = lines
            .take_while(|(_, l)| {
                let trimmed = l.trim();
                !trimmed.starts_with('[') || (allow_repeat && trimmed == header)
            })
            .map(|(i, text)| SectionLine { number: i + 1, text })
            .collect();

        Some(Section {
            header_line: header_index + 1,
            lines: body,
        })
    }

    /// Names of all section headers, in document order.
    pub fn section_names(&self) -> Vec<&'a str> {
        self.text
            .lines()
            .filter_map(|l| {
                let trimmed = l.trim();
                trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
            })
            .filter(|name| !name.is_empty() && !name.contains(['[', ']']))
            .collect()
    }

    /// The flowchart source from the diagram section, or a placeholder
    /// diagram when the section is missing.
    pub fn diagram(&self) -> String {
        self.find_section(DIAGRAM_SECTION, true)
            .map_or_else(|| MISSING_DIAGRAM.to_owned(), |s| s.body())
    }
}
