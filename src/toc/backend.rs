//! TOC parser trait and shared types.
//!
//! The [`TocParser`] trait is the seam between the structured MDX parser and
//! the regex fallback. Both produce the same [`TocItem`] list; the only
//! difference is how headings are recognized and how ids are slugified.

use crate::slug::Slugger;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TocError {
    #[error("Unbalanced expression brace on line {line}")]
    UnbalancedExpression { line: usize },
    #[error("Unclosed element <{name}> opened on line {line}")]
    UnclosedElement { name: String, line: usize },
    #[error("Unexpected closing tag </{name}> on line {line}")]
    UnexpectedClosingTag { name: String, line: usize },
    #[error("Parser unavailable: {0}")]
    Unavailable(String),
}

/// Heading depth of a TOC entry. Only `h2` and `h3` are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a numeric depth to a TOC level. Depths other than 2 and 3 yield `None`.
    pub fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> u8 {
        level.depth()
    }
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    /// Anchor id (explicit `id` attribute, or a slug of the label).
    pub id: String,
    /// Heading text with markup removed and whitespace collapsed.
    pub label: String,
    pub level: HeadingLevel,
}

/// Trait for heading extraction strategies.
pub trait TocParser: Sync {
    /// Extract level 2/3 headings from `content` in document order.
    fn parse(&self, content: &str) -> Result<Vec<TocItem>, TocError>;
}

/// Collapse whitespace runs to single spaces and trim.
pub(crate) fn normalize_label(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accumulates entries while enforcing the invariants shared by every parser:
/// empty labels and repeated ids are dropped, first occurrence wins.
#[derive(Debug, Default)]
pub(crate) struct TocBuilder {
    slugger: Slugger,
    items: Vec<TocItem>,
}

impl TocBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a heading. `id` is computed lazily so explicit ids skip slugging.
    pub(crate) fn push(
        &mut self,
        label: String,
        level: HeadingLevel,
        id: impl FnOnce(&str) -> String,
    ) {
        if label.is_empty() {
            return;
        }
        let id = id(&label);
        if !self.slugger.claim(&id) {
            return;
        }
        self.items.push(TocItem { id, label, level });
    }

    pub(crate) fn finish(self) -> Vec<TocItem> {
        self.items
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Parser that always fails, standing in for an MDX parser that could not load.
    pub struct FailingParser;

    impl TocParser for FailingParser {
        fn parse(&self, _content: &str) -> Result<Vec<TocItem>, TocError> {
            Err(TocError::Unavailable("mdx parser failed to load".into()))
        }
    }

    #[test]
    fn heading_level_only_accepts_two_and_three() {
        assert_eq!(HeadingLevel::from_depth(1), None);
        assert_eq!(HeadingLevel::from_depth(2), Some(HeadingLevel::H2));
        assert_eq!(HeadingLevel::from_depth(3), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_depth(4), None);
    }

    #[test]
    fn heading_level_serializes_as_number() {
        let item = TocItem {
            id: "alpha".into(),
            label: "Alpha".into(),
            level: HeadingLevel::H3,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"alpha","label":"Alpha","level":3}"#);
    }

    #[test]
    fn normalize_label_collapses_whitespace() {
        assert_eq!(normalize_label("  Hello \n\t world  "), "Hello world");
    }

    #[test]
    fn builder_drops_empty_labels_and_duplicate_ids() {
        let mut builder = TocBuilder::new();
        builder.push("Alpha".into(), HeadingLevel::H2, |_| "alpha".into());
        builder.push(String::new(), HeadingLevel::H2, |_| "empty".into());
        builder.push("Alpha again".into(), HeadingLevel::H3, |_| "alpha".into());
        builder.push("Dots".into(), HeadingLevel::H3, |_| String::new());
        let items = builder.finish();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "Alpha");
    }
}
