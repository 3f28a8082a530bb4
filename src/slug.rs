//! Heading anchor slugs.
//!
//! Two transforms are used by the table-of-contents extractor:
//!
//! - [`github_slug`]: the GitHub anchor algorithm used by the MDX path.
//!   Unicode letters survive, punctuation is dropped, spaces become dashes:
//!   `"Why Prism? (2024)"` → `"why-prism-2024"`.
//! - [`simple_slug`]: the ASCII-only transform used by the regex fallback:
//!   `"Café & Bar"` → `"caf-bar"`.
//!
//! [`Slugger`] tracks ids already handed out. Unlike GitHub's slugger it never
//! appends `-1`, `-2` suffixes: a repeated id is reported so the caller drops
//! the heading.

use std::collections::HashSet;

/// GitHub-style anchor slug.
///
/// Lowercases, removes every character that is not alphanumeric, `-`, `_` or
/// a plain space, then turns each space into `-`. Runs of spaces are not
/// collapsed, matching GitHub's rendered anchors.
pub fn github_slug(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

/// ASCII lowercase-hyphenate slug.
///
/// Every run of characters outside `[a-z0-9]` becomes a single `-`, and
/// leading/trailing dashes are trimmed.
pub fn simple_slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Collision tracker for generated heading ids. First occurrence wins.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as used. Returns `false` if it was already taken or empty.
    pub fn claim(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.seen.insert(id.to_string())
    }
}
