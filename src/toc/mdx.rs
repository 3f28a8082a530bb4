//! Structured MDX heading extraction.
//!
//! Parsing happens in two steps:
//!
//! 1. **Validation**: MDX is stricter than markdown. Expression braces must
//!    balance, and component elements (`<Callout>`, `<h2>`) must be closed.
//!    Documents that break those rules are rejected with a [`TocError`], which
//!    sends the caller to the regex fallback.
//! 2. **Walk**: the document is parsed with `pulldown-cmark`. Markdown heading
//!    events give level 2/3 entries; HTML/JSX blocks are scanned for `<h2>` and
//!    `<h3>` elements, whose explicit `id` attribute wins over the slug.
//!
//! MDX parses the children of a flow element (`<Callout>` on its own line) as
//! markdown even without blank lines around them, where CommonMark would
//! swallow the whole run as one HTML block. Standalone tag lines are padded
//! with blank lines before the walk so both agree.
//!
//! Text inside `{expressions}` never contributes to a label.

use super::backend::{HeadingLevel, TocBuilder, TocError, TocItem, TocParser, normalize_label};
use super::fallback::{fenced_ranges, scan_html_headings, strip_tags};
use crate::slug::github_slug;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::sync::LazyLock;

static JSX_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9.]*)\b[^<>]*?(/?)>").expect("valid JSX tag regex")
});

/// A line holding nothing but one opening, closing, or self-closing tag.
static FLOW_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}</?([A-Za-z][A-Za-z0-9.]*)\b[^<>]*>[ \t]*$").expect("valid flow tag regex")
});

/// MDX parser backed by `pulldown-cmark`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MdxParser;

impl TocParser for MdxParser {
    fn parse(&self, content: &str) -> Result<Vec<TocItem>, TocError> {
        validate_mdx(content)?;
        Ok(walk(&isolate_flow_tags(content)))
    }
}

/// Elements whose closing tag MDX requires: components and headings.
fn is_tracked_element(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        || matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Remove inline code spans so backticked braces and tags are not validated.
fn strip_code_spans(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_code = false;
    for c in line.chars() {
        if c == '`' {
            in_code = !in_code;
        } else if !in_code {
            out.push(c);
        }
    }
    out
}

/// Check the structural rules an MDX compiler enforces.
pub(crate) fn validate_mdx(content: &str) -> Result<(), TocError> {
    let fences = fenced_ranges(content);
    let mut depth = 0usize;
    let mut expression_start = 0usize;
    let mut open_elements: Vec<(String, usize)> = Vec::new();

    let mut offset = 0;
    for (index, line) in content.split_inclusive('\n').enumerate() {
        let line_no = index + 1;
        let in_fence = fences.iter().any(|&(s, e)| offset >= s && offset < e);
        offset += line.len();
        if in_fence {
            continue;
        }
        let line = strip_code_spans(line);

        for c in line.chars() {
            match c {
                '{' => {
                    if depth == 0 {
                        expression_start = line_no;
                    }
                    depth += 1;
                }
                '}' => {
                    if depth == 0 {
                        return Err(TocError::UnbalancedExpression { line: line_no });
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        if depth > 0 {
            continue;
        }

        for caps in JSX_TAG.captures_iter(&line) {
            let closing = !caps[1].is_empty();
            let self_closing = !caps[3].is_empty();
            let name = &caps[2];
            if !is_tracked_element(name) || self_closing {
                continue;
            }
            if !closing {
                open_elements.push((name.to_string(), line_no));
                continue;
            }
            match open_elements.last() {
                Some((open, _)) if open == name => {
                    open_elements.pop();
                }
                _ => {
                    return Err(TocError::UnexpectedClosingTag {
                        name: name.to_string(),
                        line: line_no,
                    });
                }
            }
        }
    }

    if depth > 0 {
        return Err(TocError::UnbalancedExpression {
            line: expression_start,
        });
    }
    if let Some((name, line)) = open_elements.pop() {
        return Err(TocError::UnclosedElement { name, line });
    }
    Ok(())
}

/// Drop `{...}` segments, including nested braces.
pub(crate) fn strip_expressions(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Surround standalone tag lines outside code fences with blank lines.
///
/// Heading elements and raw-text elements keep their multi-line form so the
/// HTML block scan still sees them whole.
pub(crate) fn isolate_flow_tags(content: &str) -> String {
    let fences = fenced_ranges(content);
    let mut out = String::with_capacity(content.len() + 32);
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let in_fence = fences.iter().any(|&(s, e)| offset >= s && offset < e);
        offset += line.len();
        let text = line.trim_end_matches(['\n', '\r']);
        let standalone = !in_fence
            && FLOW_TAG_LINE
                .captures(text)
                .is_some_and(|caps| !keeps_block_form(&caps[1]));
        if !standalone {
            out.push_str(line);
            continue;
        }
        if !out.is_empty() && !out.ends_with("\n\n") {
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str(text);
        out.push_str("\n\n");
    }
    out
}

fn keeps_block_form(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre" | "script" | "style" | "textarea"
    )
}

fn heading_depth(level: pulldown_cmark::HeadingLevel) -> u8 {
    level as u8
}

fn walk(content: &str) -> Vec<TocItem> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut builder = TocBuilder::new();

    let mut heading: Option<(HeadingLevel, String)> = None;
    let mut html_block: Option<String> = None;

    for event in Parser::new_ext(content, options) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = HeadingLevel::from_depth(heading_depth(level)).map(|l| (l, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = heading.take() {
                    let label = normalize_label(&strip_expressions(&text));
                    builder.push(label, level, github_slug);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = heading.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = heading.as_mut() {
                    buf.push(' ');
                }
            }
            Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
            Event::Html(html) => {
                if let Some(buf) = html_block.as_mut() {
                    buf.push_str(&html);
                }
            }
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(block) = html_block.take() {
                    for found in scan_html_headings(&block) {
                        let label = normalize_label(&strip_expressions(&strip_tags(&found.inner)));
                        let explicit = found.explicit_id;
                        builder.push(label, found.level, |label| {
                            explicit.unwrap_or_else(|| github_slug(label))
                        });
                    }
                }
            }
            _ => {}
        }
    }

    builder.finish()
}
