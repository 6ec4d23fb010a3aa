//! HTML correction backed by html5ever.
//!
//! The input is run through html5ever's tree builder, which closes unclosed
//! elements and repairs bad nesting the same way a browser would, and the
//! resulting tree is written back out. Input that looks like a complete
//! document is re-serialized as a document; anything else is treated as a
//! body fragment and only the fragment itself is written back.

use std::io;
use std::string::FromUtf8Error;
use std::sync::LazyLock;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, ns, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matches the markers of a complete document: a leading doctype or an
/// explicit `<html>`, `<head>` or `<body>` tag.
static DOCUMENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*<!doctype|<(html|head|body)[\s/>]").expect("document marker regex is valid")
});

/// Elements that never have content or an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text is kept as raw text by the parser and written back unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

/// Elements that lose one newline directly after their start tag when parsed.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("failed to serialize corrected HTML: {0}")]
    Serialize(#[from] io::Error),

    #[error("corrected HTML is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputStyle {
    /// Minimal re-serialization; whitespace is preserved as parsed.
    #[default]
    Compact,
    /// One element per line, indented.
    Pretty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub style: OutputStyle,
    pub indent_width: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            style: OutputStyle::Compact,
            indent_width: 2,
        }
    }
}

/// Turns possibly malformed HTML into well-formed HTML.
pub trait Normalizer {
    fn normalize(&self, html: &str) -> Result<String, NormalizeError>;
}

#[derive(Debug, Clone, Default)]
pub struct Html5Normalizer {
    pub options: NormalizeOptions,
}

impl Html5Normalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }
}

impl Normalizer for Html5Normalizer {
    fn normalize(&self, html: &str) -> Result<String, NormalizeError> {
        if html.trim().is_empty() {
            return Ok(String::new());
        }

        let full_document = looks_like_document(html);
        tracing::debug!(
            bytes = html.len(),
            full_document,
            style = ?self.options.style,
            "normalizing HTML"
        );

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let nodes = if full_document {
            vec![dom.document.clone()]
        } else {
            fragment_nodes(&dom.document)
        };

        match self.options.style {
            OutputStyle::Compact => {
                let mut out = String::new();
                for node in &nodes {
                    write_compact(node, &mut out)?;
                }
                Ok(out)
            }
            OutputStyle::Pretty => {
                let mut printer = PrettyPrinter::new(self.options.indent_width);
                for node in &nodes {
                    printer.node(node, 0)?;
                }
                Ok(printer.finish())
            }
        }
    }
}

/// Whether the input should be treated as a complete document rather than a
/// body fragment.
pub fn looks_like_document(html: &str) -> bool {
    let html = html.trim_start_matches('\u{feff}');
    DOCUMENT_MARKER.is_match(html)
}

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// For fragment input, the nodes to write back: the contents the parser put
/// in `<head>` and `<body>`, plus whatever it attached to the document or
/// `<html>` directly (leading comments, a `<frameset>`).
fn fragment_nodes(document: &Handle) -> Vec<Handle> {
    let mut nodes = Vec::new();
    for child in document.children.borrow().iter() {
        if !is_element(child, "html") {
            nodes.push(child.clone());
            continue;
        }
        for part in child.children.borrow().iter() {
            if is_element(part, "head") || is_element(part, "body") {
                nodes.extend(part.children.borrow().iter().cloned());
            } else {
                nodes.push(part.clone());
            }
        }
    }
    nodes
}

fn is_element(handle: &Handle, local: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == local)
}

/// Raw-text elements go through html5ever's serializer, which knows which
/// parents leave their text unescaped.
fn serialize_node(handle: &Handle) -> Result<String, NormalizeError> {
    let node: SerializableHandle = handle.clone().into();
    let mut out: Vec<u8> = Vec::new();
    serialize(
        &mut out,
        &node,
        SerializeOpts {
            traversal_scope: TraversalScope::IncludeNode,
            ..Default::default()
        },
    )?;
    Ok(String::from_utf8(out)?)
}

fn start_tag(local: &str, attrs: &[Attribute]) -> String {
    let mut open = format!("<{}", local);
    for attr in attrs {
        open.push(' ');
        if let Some(prefix) = &attr.name.prefix {
            open.push_str(prefix.as_ref());
            open.push(':');
        }
        open.push_str(attr.name.local.as_ref());
        open.push_str("=\"");
        open.push_str(&escape_attr(&attr.value));
        open.push('"');
    }
    open.push('>');
    open
}

/// The node whose children make up an element's content: the template
/// contents fragment for `<template>`, the element itself otherwise.
fn content_of(handle: &Handle) -> Handle {
    match &handle.data {
        NodeData::Element {
            template_contents, ..
        } => template_contents
            .borrow()
            .clone()
            .unwrap_or_else(|| handle.clone()),
        _ => handle.clone(),
    }
}

fn starts_with_newline(content: &Handle) -> bool {
    match content.children.borrow().first().map(|c| &c.data) {
        Some(NodeData::Text { contents }) => contents.borrow().starts_with('\n'),
        _ => false,
    }
}

/// Writes `handle` back out exactly as parsed.
///
/// `<template>` contents are included, and a `pre`, `textarea` or `listing`
/// whose text starts with a newline gets an extra one after its start tag,
/// so reparsing the output builds the same tree.
fn write_compact(handle: &Handle, out: &mut String) -> Result<(), NormalizeError> {
    match &handle.data {
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                write_compact(child, out)?;
            }
        }
        NodeData::Doctype { name, .. } => out.push_str(&format!("<!DOCTYPE {}>", name)),
        NodeData::Text { contents } => out.push_str(&escape_text(&contents.borrow())),
        NodeData::Comment { contents } => out.push_str(&format!("<!--{}-->", contents)),
        NodeData::ProcessingInstruction { target, contents } => {
            out.push_str(&format!("<?{} {}>", target, contents));
        }
        NodeData::Element { name, attrs, .. } => {
            let local = name.local.as_ref();
            if RAW_TEXT_ELEMENTS.contains(&local) {
                out.push_str(&serialize_node(handle)?);
                return Ok(());
            }

            out.push_str(&start_tag(local, &attrs.borrow()));
            if name.ns == ns!(html) && is_void_element(local) {
                return Ok(());
            }

            let content = content_of(handle);
            if LEADING_NEWLINE_ELEMENTS.contains(&local) && starts_with_newline(&content) {
                out.push('\n');
            }
            for child in content.children.borrow().iter() {
                write_compact(child, out)?;
            }
            out.push_str(&format!("</{}>", local));
        }
    }
    Ok(())
}

/// Indenting tree writer used for `OutputStyle::Pretty`.
struct PrettyPrinter {
    out: String,
    indent_width: usize,
}

impl PrettyPrinter {
    fn new(indent_width: usize) -> Self {
        Self {
            out: String::new(),
            indent_width,
        }
    }

    fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.out.push_str(&" ".repeat(depth * self.indent_width));
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn children(&mut self, handle: &Handle, depth: usize) -> Result<(), NormalizeError> {
        for child in handle.children.borrow().iter() {
            self.node(child, depth)?;
        }
        Ok(())
    }

    fn node(&mut self, handle: &Handle, depth: usize) -> Result<(), NormalizeError> {
        match &handle.data {
            NodeData::Document => self.children(handle, depth)?,
            NodeData::Doctype { name, .. } => {
                self.line(depth, &format!("<!DOCTYPE {}>", name));
            }
            NodeData::Text { contents } => {
                let text = contents.borrow();
                // U+00A0 is content, not layout whitespace
                let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
                if !trimmed.is_empty() {
                    self.line(depth, &escape_text(trimmed));
                }
            }
            NodeData::Comment { contents } => {
                self.line(depth, &format!("<!--{}-->", contents));
            }
            NodeData::ProcessingInstruction { .. } => {}
            NodeData::Element { name, attrs, .. } => {
                let local = name.local.as_ref();
                if RAW_TEXT_ELEMENTS.contains(&local) || LEADING_NEWLINE_ELEMENTS.contains(&local) {
                    let mut raw = String::new();
                    write_compact(handle, &mut raw)?;
                    self.line(depth, &raw);
                    return Ok(());
                }

                let open = start_tag(local, &attrs.borrow());
                if name.ns == ns!(html) && is_void_element(local) {
                    self.line(depth, &open);
                    return Ok(());
                }

                let content = content_of(handle);
                if content.children.borrow().is_empty() {
                    self.line(depth, &format!("{}</{}>", open, local));
                    return Ok(());
                }

                self.line(depth, &open);
                self.children(&content, depth + 1)?;
                self.line(depth, &format!("</{}>", local));
            }
        }
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(html: &str) -> String {
        Html5Normalizer::default().normalize(html).unwrap()
    }

    fn pretty(html: &str) -> String {
        Html5Normalizer::new(NormalizeOptions {
            style: OutputStyle::Pretty,
            indent_width: 2,
        })
        .normalize(html)
        .unwrap()
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(compact(""), "");
        assert_eq!(compact("  \n\t"), "");
    }

    #[test]
    fn test_closes_unclosed_fragment_tags() {
        assert_eq!(compact("<div><p>text"), "<div><p>text</p></div>");
    }

    #[test]
    fn test_fixes_misnested_inline_tags() {
        assert_eq!(compact("<b><i>x</b></i>"), "<b><i>x</i></b>");
    }

    #[test]
    fn test_drops_stray_end_tag() {
        assert_eq!(compact("<p>a</p></span>"), "<p>a</p>");
    }

    #[test]
    fn test_full_document_is_completed() {
        let out = compact("<html><body><h1>Hello, World!</body></html>");
        assert_eq!(out, "<html><head></head><body><h1>Hello, World!</h1></body></html>");
    }

    #[test]
    fn test_doctype_is_preserved() {
        let out = compact("<!DOCTYPE html><title>t</title><p>x");
        assert_eq!(
            out,
            "<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_fragment_keeps_head_content() {
        assert_eq!(compact("<title>t</title><p>a"), "<title>t</title><p>a</p>");
    }

    #[test]
    fn test_plain_text_fragment() {
        assert_eq!(compact("hello & goodbye"), "hello &amp; goodbye");
    }

    #[test]
    fn test_compact_is_idempotent() {
        for input in [
            "<div><p>text",
            "<ul><li>one<li>two</ul>",
            "<!DOCTYPE html><html><head><title>x</title></head><body><p>a<p>b</body></html>",
            "<table><tr><td>1<td>2</table>",
            "<b><i>x</b></i>",
            "plain",
            "<pre>\n\nx</pre>",
            "<textarea>\n\nhi</textarea>",
            "<listing>\n\ncode</listing>",
            "<template><p>x</p></template>",
            "<!-- note --><p>x",
        ] {
            let once = compact(input);
            assert_eq!(compact(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_looks_like_document() {
        assert!(looks_like_document("<!DOCTYPE html><p>x"));
        assert!(looks_like_document("  <!doctype html>"));
        assert!(looks_like_document("\u{feff}<html>"));
        assert!(looks_like_document("<p>x</p><body class=\"a\">"));
        assert!(!looks_like_document("<div><p>text"));
        assert!(!looks_like_document("<header>x</header>"));
        assert!(!looks_like_document("<bodyguard>"));
    }

    #[test]
    fn test_pretty_indents_nested_elements() {
        let out = pretty("<div><p>text</div>");
        assert_eq!(out, "<div>\n  <p>\n    text\n  </p>\n</div>");
    }

    #[test]
    fn test_pretty_void_and_empty_elements() {
        let out = pretty("<p>a<br>b</p><span></span>");
        assert_eq!(out, "<p>\n  a\n  <br>\n  b\n</p>\n<span></span>");
    }

    #[test]
    fn test_pretty_escapes_attributes_and_text() {
        let out = pretty("<a title='say \"hi\"' href=\"?a=1&b=2\">1 < 2</a>");
        assert_eq!(
            out,
            "<a title=\"say &quot;hi&quot;\" href=\"?a=1&amp;b=2\">\n  1 &lt; 2\n</a>"
        );
    }

    #[test]
    fn test_pretty_keeps_script_verbatim() {
        let out = pretty("<div><script>if (a < b) { go(); }</script></div>");
        assert_eq!(
            out,
            "<div>\n  <script>if (a < b) { go(); }</script>\n</div>"
        );
    }

    #[test]
    fn test_pretty_full_document() {
        let out = pretty("<!DOCTYPE html><title>T</title><p>x");
        assert_eq!(
            out,
            "<!DOCTYPE html>\n<html>\n  <head>\n    <title>\n      T\n    </title>\n  </head>\n  <body>\n    <p>\n      x\n    </p>\n  </body>\n</html>"
        );
    }

    #[test]
    fn test_void_element_lookup() {
        assert!(is_void_element("br"));
        assert!(is_void_element("img"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_leading_newline_in_pre_survives() {
        assert_eq!(compact("<pre>\n\nx</pre>"), "<pre>\n\nx</pre>");
        assert_eq!(compact("<textarea>\n\nhi</textarea>"), "<textarea>\n\nhi</textarea>");
        assert_eq!(compact("<pre>\nx</pre>"), "<pre>x</pre>");
    }

    #[test]
    fn test_template_contents_are_kept() {
        assert_eq!(compact("<template><p>x</p></template>"), "<template><p>x</p></template>");
        assert_eq!(compact("<template><td>x</template>"), "<template><td>x</td></template>");
        assert_eq!(
            pretty("<template><td>x</template>"),
            "<template>\n  <td>\n    x\n  </td>\n</template>"
        );
    }

    #[test]
    fn test_fragment_keeps_nodes_outside_body() {
        assert_eq!(compact("<!-- note --><p>x"), "<!-- note --><p>x</p>");
        assert_eq!(compact("<frameset><frame></frameset>"), "<frameset><frame></frameset>");
    }

    #[test]
    fn test_pretty_keeps_raw_text_elements_verbatim() {
        assert_eq!(pretty("<noscript><p>x</noscript>"), "<noscript><p>x</noscript>");
        assert_eq!(pretty("<div><iframe><b>x</b></iframe></div>"), "<div>\n  <iframe><b>x</b></iframe>\n</div>");
        assert_eq!(compact("<noframes><p>x</noframes>"), "<noframes><p>x</noframes>");
    }

    #[test]
    fn test_pretty_keeps_non_breaking_space() {
        assert_eq!(pretty("<p>&nbsp;</p>"), "<p>\n  &nbsp;\n</p>");
        assert_eq!(pretty("<p> &nbsp;a </p>"), "<p>\n  &nbsp;a\n</p>");
    }
}
