//! Regex heading scanner.
//!
//! Used when the structured MDX parser rejects a document. Recognizes:
//!
//! - ATX headings: `## Title`, `### Title ###`
//! - HTML headings anywhere in the text: `<h2>Title</h2>`, `<h3 id="x">Title</h3>`
//!
//! Labels have nested tags and emphasis characters stripped. Ids come from an
//! explicit `id="..."` attribute or [`simple_slug`]. Fenced code blocks are
//! skipped so shell comments (`## build`) in examples are not picked up.

use super::backend::{HeadingLevel, TocBuilder, TocError, TocItem, TocParser, normalize_label};
use crate::slug::simple_slug;
use regex::Regex;
use std::sync::LazyLock;

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").expect("valid ATX regex")
});

pub(crate) static HTML_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])((?:\s[^>]*)?)>(.*?)</h([1-6])\s*>").expect("valid heading regex")
});

static ID_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid id regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_`~]").expect("valid emphasis regex"));

/// Regex-based [`TocParser`]. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexParser;

impl TocParser for RegexParser {
    fn parse(&self, content: &str) -> Result<Vec<TocItem>, TocError> {
        Ok(fallback_toc(content))
    }
}

/// A heading found in the raw text, before dedup.
#[derive(Debug)]
pub(crate) struct HtmlHeading {
    pub offset: usize,
    pub level: HeadingLevel,
    pub explicit_id: Option<String>,
    pub inner: String,
}

/// Find `<h2>`/`<h3>` elements in `html`. Mismatched open/close levels and
/// other depths are ignored.
pub(crate) fn scan_html_headings(html: &str) -> Vec<HtmlHeading> {
    HTML_HEADING
        .captures_iter(html)
        .filter_map(|caps| {
            let open = caps.get(1)?.as_str();
            let close = caps.get(4)?.as_str();
            if open != close {
                return None;
            }
            let level = HeadingLevel::from_depth(open.parse().ok()?)?;
            let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            Some(HtmlHeading {
                offset: caps.get(0)?.start(),
                level,
                explicit_id: explicit_id(attrs),
                inner: caps.get(3)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Value of an `id="..."` or `id='...'` attribute, if present and non-empty.
pub(crate) fn explicit_id(attrs: &str) -> Option<String> {
    let caps = ID_ATTRIBUTE.captures(attrs)?;
    let value = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub(crate) fn strip_tags(value: &str) -> String {
    TAG.replace_all(value, "").into_owned()
}

fn clean_label(raw: &str) -> String {
    let without_tags = strip_tags(raw);
    normalize_label(&EMPHASIS.replace_all(&without_tags, ""))
}

/// Byte ranges of fenced code blocks (``` or ~~~), used to skip their content.
pub(crate) fn fenced_ranges(content: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, char, usize)> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start_matches(' ');
        let indent = line.len() - trimmed.len();
        if indent <= 3 {
            let fence_char = trimmed.chars().next();
            if let Some(c @ ('`' | '~')) = fence_char {
                let run = trimmed.chars().take_while(|&x| x == c).count();
                if run >= 3 {
                    match open {
                        None => open = Some((offset, c, run)),
                        Some((start, oc, orun))
                            if oc == c && run >= orun && trimmed[run..].trim().is_empty() =>
                        {
                            ranges.push((start, offset + line.len()));
                            open = None;
                        }
                        Some(_) => {}
                    }
                }
            }
        }
        offset += line.len();
    }
    if let Some((start, _, _)) = open {
        ranges.push((start, content.len()));
    }
    ranges
}

fn in_ranges(ranges: &[(usize, usize)], offset: usize) -> bool {
    ranges.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// Extract the TOC with regular expressions only.
pub fn fallback_toc(content: &str) -> Vec<TocItem> {
    let fences = fenced_ranges(content);

    // (offset, level, label, explicit id)
    let mut found: Vec<(usize, HeadingLevel, String, Option<String>)> = Vec::new();

    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        if !in_ranges(&fences, offset)
            && let Some(caps) = ATX_HEADING.captures(text)
            && let Some(level) = HeadingLevel::from_depth(caps[1].len() as u8)
        {
            found.push((offset, level, clean_label(&caps[2]), None));
        }
        offset += line.len();
    }

    for heading in scan_html_headings(content) {
        if in_ranges(&fences, heading.offset) {
            continue;
        }
        found.push((
            heading.offset,
            heading.level,
            clean_label(&heading.inner),
            heading.explicit_id,
        ));
    }

    found.sort_by_key(|(offset, ..)| *offset);

    let mut builder = TocBuilder::new();
    for (_, level, label, explicit) in found {
        builder.push(label, level, |label| {
            explicit.unwrap_or_else(|| simple_slug(label))
        });
    }
    builder.finish()
}
