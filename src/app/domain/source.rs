use super::issue::{Severity, ValidationIssue};

/// Raw HTML supplied by the user for a single compile request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceDocument {
    pub content: String,
    /// Set when the bytes this document was built from were not valid UTF-8
    /// and had to be decoded lossily.
    pub had_invalid_utf8: bool,
}

impl SourceDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            had_invalid_utf8: false,
        }
    }

    /// Decode bytes as UTF-8, replacing invalid sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(s) => Self::new(s),
            Err(_) => Self {
                content: String::from_utf8_lossy(bytes).into_owned(),
                had_invalid_utf8: true,
            },
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl From<&str> for SourceDocument {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SourceDocument {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Output of one compile request: corrected markup plus the issues found in
/// the original input.
///
/// `corrected_html` and `issues` come from two independent passes over the
/// same source, so a clean `corrected_html` may still come with issues.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledResult {
    pub corrected_html: String,
    pub issues: Vec<ValidationIssue>,
}

impl CompiledResult {
    pub fn new(corrected_html: String, issues: Vec<ValidationIssue>) -> Self {
        Self {
            corrected_html,
            issues,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// One-line status text for the presentation layer.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            return "HTML compiled successfully!".to_string();
        }
        let errors = self.error_count();
        let warnings = self.warning_count();
        match (errors, warnings) {
            (e, 0) => format!("Found {} HTML error{}", e, plural(e)),
            (0, w) => format!("Found {} warning{}", w, plural(w)),
            (e, w) => format!(
                "Found {} HTML error{} and {} warning{}",
                e,
                plural(e),
                w,
                plural(w)
            ),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_valid_utf8() {
        let doc = SourceDocument::from_bytes("<p>héllo</p>".as_bytes());
        assert_eq!(doc.content, "<p>héllo</p>");
        assert!(!doc.had_invalid_utf8);
    }

    #[test]
    fn test_from_bytes_invalid_utf8_is_lossy() {
        let doc = SourceDocument::from_bytes(&[b'<', b'p', b'>', 0xff, 0xfe]);
        assert!(doc.had_invalid_utf8);
        assert!(doc.content.starts_with("<p>"));
        assert!(doc.content.contains('\u{fffd}'));
    }

    #[test]
    fn test_is_blank() {
        assert!(SourceDocument::new("").is_blank());
        assert!(SourceDocument::new(" \n\t ").is_blank());
        assert!(!SourceDocument::new("<br>").is_blank());
    }

    #[test]
    fn test_summary_clean() {
        let result = CompiledResult::new("<p>x</p>".to_string(), vec![]);
        assert!(result.is_clean());
        assert_eq!(result.summary(), "HTML compiled successfully!");
    }

    #[test]
    fn test_summary_counts() {
        let result = CompiledResult::new(
            String::new(),
            vec![
                ValidationIssue::error(Some(1), "a"),
                ValidationIssue::error(Some(2), "b"),
                ValidationIssue::warning(Some(1), "c"),
            ],
        );
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.summary(), "Found 2 HTML errors and 1 warning");
    }

    #[test]
    fn test_summary_single_error() {
        let result = CompiledResult::new(String::new(), vec![ValidationIssue::error(None, "a")]);
        assert_eq!(result.summary(), "Found 1 HTML error");
    }
}
