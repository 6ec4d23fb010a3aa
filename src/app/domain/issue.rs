use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// One reported nonconformity in a source document.
///
/// `line` is 1-based. The html5ever tokenizer only reports lines, so
/// `column` stays unknown for validator output. `line` is unknown for the
/// synthetic issue produced when the input could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub line: Option<u64>,
    pub column: Option<u64>,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    pub fn error(line: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(line: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => write!(f, "Line {}, column {}: {}", line, col, self.message),
            (Some(line), None) => write!(f, "Line {}: {}", line, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line() {
        let issue = ValidationIssue::error(Some(3), "Missing closing tag for <div>");
        assert_eq!(issue.to_string(), "Line 3: Missing closing tag for <div>");
    }

    #[test]
    fn test_display_with_line_and_column() {
        let issue = ValidationIssue {
            column: Some(7),
            ..ValidationIssue::warning(Some(1), "odd")
        };
        assert_eq!(issue.to_string(), "Line 1, column 7: odd");
        assert!(!issue.is_error());
    }

    #[test]
    fn test_display_without_position() {
        let issue = ValidationIssue::error(None, "input could not be processed");
        assert_eq!(issue.to_string(), "input could not be processed");
        assert_eq!(issue.severity.label(), "error");
    }
}
