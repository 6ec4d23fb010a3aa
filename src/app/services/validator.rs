//! Conformance checking over html5ever's token stream.
//!
//! The html5ever tokenizer reports lexical errors itself. On top of the tags
//! it emits we keep a stack of open elements and report end tags that close
//! nothing, end tags that skip over still-open elements, and elements that
//! are never closed. HTML5's optional end tags (`<li>`, `<p>`, table parts,
//! ...) and void elements are taken into account so that valid markup
//! produces no issues.

use std::cell::RefCell;

use html5ever::TokenizerResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use thiserror::Error;

use super::normalizer::is_void_element;
use crate::app::domain::issue::ValidationIssue;

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("tokenizer stopped with {0} bytes of input left unread")]
    Incomplete(usize),

    #[error("tokenizer paused for a script it cannot run")]
    ScriptPaused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatorOptions {
    /// Warn when a non-blank document has no `<!DOCTYPE>`.
    pub warn_missing_doctype: bool,
}

/// Reports HTML5 nonconformities without altering the input.
pub trait Validator {
    fn validate(&self, html: &str) -> Result<Vec<ValidationIssue>, ValidateError>;
}

#[derive(Debug, Clone, Default)]
pub struct Html5Validator {
    pub options: ValidatorOptions,
}

impl Html5Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }
}

impl Validator for Html5Validator {
    fn validate(&self, html: &str) -> Result<Vec<ValidationIssue>, ValidateError> {
        if html.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sink = IssueSink::new(self.options);
        let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));
        if let TokenizerResult::Script(()) = tokenizer.feed(&input) {
            return Err(ValidateError::ScriptPaused);
        }

        let mut remaining = 0;
        while let Some(chunk) = input.pop_front() {
            remaining += chunk.len();
        }
        if remaining > 0 {
            return Err(ValidateError::Incomplete(remaining));
        }
        tokenizer.end();

        let issues = tokenizer.sink.into_issues();
        tracing::debug!(issues = issues.len(), "validation finished");
        Ok(issues)
    }
}

/// Elements whose end tag may be omitted; leaving them open is not an error.
const OPTIONAL_END: &[&str] = &[
    "html", "head", "body", "p", "li", "dt", "dd", "rt", "rp", "optgroup", "option", "colgroup",
    "caption", "thead", "tbody", "tfoot", "tr", "td", "th",
];

/// Start tags that close an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dialog", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Structural elements whose start and end tags may both be omitted.
const IMPLIED: &[&str] = &["html", "head", "body"];

fn has_optional_end(name: &str) -> bool {
    OPTIONAL_END.contains(&name)
}

/// Whether opening `new` implicitly closes an open `open` element.
fn implicitly_closes(new: &str, open: &str) -> bool {
    match new {
        "li" => open == "li",
        "dt" | "dd" => matches!(open, "dt" | "dd"),
        "rt" | "rp" => matches!(open, "rt" | "rp"),
        "option" => open == "option",
        "optgroup" => matches!(open, "option" | "optgroup"),
        "tr" => matches!(open, "tr" | "td" | "th"),
        "td" | "th" => matches!(open, "td" | "th"),
        "thead" | "tbody" | "tfoot" => {
            matches!(open, "thead" | "tbody" | "tfoot" | "tr" | "td" | "th")
        }
        "body" => open == "head",
        _ => open == "p" && CLOSES_P.contains(&new),
    }
}

fn raw_kind_for(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    line: u64,
}

#[derive(Debug, Default)]
struct BalanceState {
    open: Vec<OpenElement>,
    issues: Vec<ValidationIssue>,
    doctype_checked: bool,
}

struct IssueSink {
    options: ValidatorOptions,
    state: RefCell<BalanceState>,
}

impl IssueSink {
    fn new(options: ValidatorOptions) -> Self {
        Self {
            options,
            state: RefCell::new(BalanceState::default()),
        }
    }

    fn into_issues(self) -> Vec<ValidationIssue> {
        self.state.into_inner().issues
    }
}

impl BalanceState {
    fn check_doctype(&mut self, options: ValidatorOptions, token: &Token, line: u64) {
        if self.doctype_checked {
            return;
        }
        match token {
            Token::DoctypeToken(_) => self.doctype_checked = true,
            Token::TagToken(_) => {
                self.doctype_checked = true;
                self.missing_doctype(options, line);
            }
            Token::CharacterTokens(text) if !text.trim().is_empty() => {
                self.doctype_checked = true;
                self.missing_doctype(options, line);
            }
            _ => {}
        }
    }

    fn missing_doctype(&mut self, options: ValidatorOptions, line: u64) {
        if options.warn_missing_doctype {
            self.issues.push(ValidationIssue::warning(
                Some(line),
                "Missing <!DOCTYPE html> declaration",
            ));
        }
    }

    /// Whether the current node sits in SVG or MathML content, where CDATA
    /// sections are allowed.
    fn in_foreign_content(&self) -> bool {
        for element in self.open.iter().rev() {
            match element.name.as_str() {
                "svg" | "math" => return true,
                "foreignobject" | "desc" | "title" | "annotation-xml" | "mi" | "mo" | "mn"
                | "ms" | "mtext" => return false,
                _ => {}
            }
        }
        false
    }

    fn start_tag(&mut self, name: &str, self_closing: bool, foreign: bool, line: u64) {
        while let Some(top) = self.open.last() {
            if implicitly_closes(name, &top.name) {
                self.open.pop();
            } else {
                break;
            }
        }

        if is_void_element(name) {
            return;
        }
        // Foreign content (svg, math) legitimately self-closes; in HTML the
        // flag is ignored, but treating it as closed keeps the stack sane.
        // Raw-text elements always open in HTML, since the tokenizer switches state.
        if self_closing && (foreign || raw_kind_for(name).is_none()) {
            return;
        }

        self.open.push(OpenElement {
            name: name.to_string(),
            line,
        });
    }

    fn end_tag(&mut self, name: &str, line: u64) {
        let Some(pos) = self.open.iter().rposition(|e| e.name == name) else {
            if !IMPLIED.contains(&name) {
                self.issues.push(ValidationIssue::error(
                    Some(line),
                    format!("Closing tag </{}> without opening tag", name),
                ));
            }
            return;
        };

        for skipped in self.open.drain(pos + 1..).rev() {
            if !has_optional_end(&skipped.name) {
                self.issues.push(ValidationIssue::error(
                    Some(line),
                    format!("Mismatched tags: expected </{}>, got </{}>", skipped.name, name),
                ));
            }
        }
        self.open.pop();
    }

    fn finish(&mut self) {
        while let Some(element) = self.open.pop() {
            if !has_optional_end(&element.name) {
                self.issues.push(ValidationIssue::error(
                    Some(element.line),
                    format!("Missing closing tag for <{}>", element.name),
                ));
            }
        }
    }
}

impl TokenSink for IssueSink {
    type Handle = ();

    fn process_token(&self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        let mut state = self.state.borrow_mut();
        state.check_doctype(self.options, &token, line_number);

        match token {
            Token::ParseError(message) => {
                state
                    .issues
                    .push(ValidationIssue::error(Some(line_number), message.into_owned()));
            }
            Token::TagToken(tag) => {
                let name: &str = &tag.name;
                match tag.kind {
                    TagKind::StartTag => {
                        let foreign = state.in_foreign_content();
                        state.start_tag(name, tag.self_closing, foreign, line_number);
                        if foreign {
                            return TokenSinkResult::Continue;
                        }
                        if name == "plaintext" {
                            return TokenSinkResult::Plaintext;
                        }
                        if let Some(kind) = raw_kind_for(name) {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => state.end_tag(name, line_number),
                }
            }
            Token::EOFToken => state.finish(),
            _ => {}
        }
        TokenSinkResult::Continue
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        self.state.borrow().in_foreign_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(html: &str) -> Vec<ValidationIssue> {
        Html5Validator::default().validate(html).unwrap()
    }

    fn messages(html: &str) -> Vec<String> {
        issues(html).into_iter().map(|i| i.message).collect()
    }

    #[test]
    fn test_blank_input_has_no_issues() {
        assert!(issues("").is_empty());
        assert!(issues("   \n").is_empty());
    }

    #[test]
    fn test_well_formed_document_has_no_issues() {
        let html = "<!DOCTYPE html>\n<html>\n<head>\n    <title>Sample HTML</title>\n</head>\n<body>\n    <h1>Welcome</h1>\n    <p>Start editing your HTML code here!</p>\n</body>\n</html>";
        assert!(issues(html).is_empty(), "{:?}", issues(html));
    }

    #[test]
    fn test_void_and_optional_end_tags_are_valid() {
        let html = "<ul><li>one<li>two</ul><p>a<br>b<img src=\"x.png\" alt=\"\"><p>c<table><tr><td>1<td>2<tr><td>3</table>";
        assert!(issues(html).is_empty(), "{:?}", issues(html));
    }

    #[test]
    fn test_omitted_structural_end_tags_are_valid() {
        let html = "<!DOCTYPE html><title>x</title><p>hi</p></body></html>";
        assert!(issues(html).is_empty(), "{:?}", issues(html));
    }

    #[test]
    fn test_unclosed_tags_reported_innermost_first() {
        assert_eq!(
            messages("<div><span>text"),
            vec!["Missing closing tag for <span>", "Missing closing tag for <div>"]
        );
    }

    #[test]
    fn test_unclosed_div_with_paragraph() {
        assert_eq!(messages("<div><p>text"), vec!["Missing closing tag for <div>"]);
    }

    #[test]
    fn test_stray_closing_tag() {
        let found = issues("<p>a</p>\n</span>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Closing tag </span> without opening tag");
        assert_eq!(found[0].line, Some(2));
    }

    #[test]
    fn test_mismatched_tags() {
        assert_eq!(
            messages("<div><span>x</div>"),
            vec!["Mismatched tags: expected </span>, got </div>"]
        );
    }

    #[test]
    fn test_mismatch_closes_skipped_elements() {
        // </div> closes the span, so the later </span> is stray
        assert_eq!(
            messages("<div><span>x</div></span>"),
            vec![
                "Mismatched tags: expected </span>, got </div>",
                "Closing tag </span> without opening tag"
            ]
        );
    }

    #[test]
    fn test_paragraph_closed_by_block_leaves_stray_end_tag() {
        assert_eq!(
            messages("<p>a<div>b</div></p>"),
            vec!["Closing tag </p> without opening tag"]
        );
    }

    #[test]
    fn test_missing_closing_tag_reports_opening_line() {
        let found = issues("<section>\n\n<em>x\n</section>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Mismatched tags: expected </em>, got </section>");
        assert_eq!(found[0].line, Some(4));

        let found = issues("<p>ok</p>\n<article>\n<p>x");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, Some(2));
    }

    #[test]
    fn test_script_content_is_not_parsed_as_tags() {
        let html = "<script>if (a < b && c > d) { x = '</div>'; }</script><p>ok</p>";
        assert!(issues(html).is_empty(), "{:?}", issues(html));
    }

    #[test]
    fn test_title_and_textarea_are_rcdata() {
        let html = "<title>a <b> c</title><textarea><div></textarea>";
        assert!(issues(html).is_empty(), "{:?}", issues(html));
    }

    #[test]
    fn test_self_closing_svg_content() {
        let html = "<svg viewBox=\"0 0 1 1\"><path d=\"M0 0\"/><circle r=\"1\"/></svg>";
        assert!(issues(html).is_empty(), "{:?}", issues(html));
    }

    #[test]
    fn test_tokenizer_errors_are_reported() {
        let found = issues("<p class=\"a\" class=\"b\">x</p>");
        assert_eq!(found.len(), 1);
        assert!(found[0].is_error());
        assert_eq!(found[0].line, Some(1));
    }

    #[test]
    fn test_missing_doctype_warning_is_optional() {
        assert!(issues("<p>x</p>").is_empty());

        let strict = Html5Validator::new(ValidatorOptions {
            warn_missing_doctype: true,
        });
        let found = strict.validate("\n<p>x</p>").unwrap();
        assert_eq!(found.len(), 1);
        assert!(!found[0].is_error());
        assert_eq!(found[0].line, Some(2));

        assert!(strict.validate("<!-- c --><!DOCTYPE html><p>x</p>").unwrap().is_empty());
        assert!(strict.validate("").unwrap().is_empty());
    }

    #[test]
    fn test_issue_order_is_detection_order() {
        assert_eq!(
            messages("</b><div><i>x</div><span>"),
            vec![
                "Closing tag </b> without opening tag",
                "Mismatched tags: expected </i>, got </div>",
                "Missing closing tag for <span>"
            ]
        );
    }

    #[test]
    fn test_implicit_close_rules() {
        assert!(implicitly_closes("li", "li"));
        assert!(implicitly_closes("div", "p"));
        assert!(implicitly_closes("tr", "td"));
        assert!(!implicitly_closes("span", "p"));
        assert!(!implicitly_closes("li", "ul"));
    }

    #[test]
    fn test_cdata_allowed_in_foreign_content() {
        assert!(issues("<svg><![CDATA[x < y]]></svg>").is_empty());
        assert!(issues("<math><mi>x</mi><![CDATA[1]]></math>").is_empty());
        assert!(issues("<svg><style/><title/></svg>").is_empty());
        assert!(
            issues("<svg><title>t</title><g><![CDATA[a]]></g></svg>").is_empty(),
            "{:?}",
            issues("<svg><title>t</title><g><![CDATA[a]]></g></svg>")
        );
    }

    #[test]
    fn test_cdata_outside_foreign_content_is_reported() {
        assert_eq!(issues("<p><![CDATA[x]]></p>").len(), 1);
        assert_eq!(issues("<svg><foreignObject><![CDATA[x]]></foreignObject></svg>").len(), 1);
    }

    #[test]
    fn test_validate_error_messages() {
        assert_eq!(
            ValidateError::ScriptPaused.to_string(),
            "tokenizer paused for a script it cannot run"
        );
        assert_eq!(
            ValidateError::Incomplete(3).to_string(),
            "tokenizer stopped with 3 bytes of input left unread"
        );
    }
}
