//! Title and description normalization.
//!
//! Every page title on the site is `<stem><brand suffix>`, e.g.
//! `"Local SEO services | Prism"`. Authors often type the brand into the stem
//! themselves (`"pricing | prism"`, `"local listings - Design Prism"`), so the
//! stem is stripped of trailing brand variants before the suffix is appended
//! exactly once. Descriptions are sentence-cased and trimmed to a word
//! boundary under the configured maximum.
//!
//! Lengths are counted in characters.

use crate::config::PrismConfig;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static REPEATED_PIPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|{2,}").expect("valid regex"));

static TRAILING_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\||-|–|—|:)\s*$").expect("valid regex"));

/// Which field a length check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoField {
    Title,
    Description,
}

/// Length problems reported for titles and descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoIssue {
    Missing,
    TooShort,
    TooLong,
}

impl fmt::Display for SeoIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SeoIssue::Missing => "missing",
            SeoIssue::TooShort => "too_short",
            SeoIssue::TooLong => "too_long",
        };
        f.write_str(code)
    }
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalize the first character when the text is entirely lowercase.
/// Mixed-case text is left alone.
pub fn sentence_case_if_needed(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    if !collapsed.chars().any(|c| c.is_ascii_alphabetic()) {
        return collapsed;
    }
    if collapsed != collapsed.to_lowercase() {
        return collapsed;
    }
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => collapsed,
    }
}

/// Trim to at most `max_length` characters, preferring the last space when it
/// falls in the final 40% of the allowed length.
pub fn trim_to_word_boundary(value: &str, max_length: usize) -> String {
    if max_length == 0 {
        return String::new();
    }
    let collapsed = collapse_whitespace(value);
    if collapsed.chars().count() <= max_length {
        return collapsed;
    }

    let hard: String = collapsed.chars().take(max_length).collect();
    if let Some(byte_idx) = hard.rfind(' ') {
        let boundary = hard[..byte_idx].chars().count();
        if boundary >= max_length * 6 / 10 {
            return hard[..byte_idx].trim().to_string();
        }
    }
    hard.trim().to_string()
}

/// Brand-aware title and description rules built from config.
#[derive(Debug, Clone)]
pub struct SeoRules {
    pub brand_name: String,
    pub brand_suffix: String,
    pub title_min_length: usize,
    pub title_max_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
    terminal_brand: Regex,
    suffix_pattern: Regex,
}

impl SeoRules {
    pub fn from_config(config: &PrismConfig) -> Self {
        let brand = regex::escape(&config.site.brand_name);
        let terminal_brand = Regex::new(&format!(
            r"(?i)\s*(?:\||-|–|—|:)\s*(?:design\s+)?{brand}(?:\s+(?:agency|careers|podcast|services|openai\s+guide|case\s+study))?\s*$"
        ))
        .expect("escaped brand yields a valid regex");
        let suffix_pattern = Regex::new(&format!(r"(?i)\|\s*{brand}"))
            .expect("escaped brand yields a valid regex");

        Self {
            brand_name: config.site.brand_name.clone(),
            brand_suffix: config.site.brand_suffix.clone(),
            title_min_length: config.seo.title_min_length,
            title_max_length: config.seo.title_max_length,
            description_min_length: config.seo.description_min_length,
            description_max_length: config.seo.description_max_length,
            terminal_brand,
            suffix_pattern,
        }
    }

    /// Number of `| <brand>` occurrences, case-insensitive.
    pub fn count_brand_suffixes(&self, title: &str) -> usize {
        self.suffix_pattern.find_iter(title).count()
    }

    /// Remove every trailing brand variant (`| Prism`, `- Design Prism`,
    /// `: Prism Podcast`, ...) and any dangling separator.
    pub fn strip_terminal_brand(&self, input: &str) -> String {
        let mut output = REPEATED_PIPE
            .replace_all(&collapse_whitespace(input), "|")
            .into_owned();
        while self.terminal_brand.is_match(&output) {
            output = self
                .terminal_brand
                .replace(&output, "")
                .trim()
                .to_string();
        }
        TRAILING_SEPARATOR.replace(&output, "").trim().to_string()
    }

    /// Brand-free, sentence-cased stem. Falls back to the brand name.
    pub fn normalize_title_stem(&self, input: &str) -> String {
        let cased = sentence_case_if_needed(&self.strip_terminal_brand(input));
        if cased.is_empty() {
            self.brand_name.clone()
        } else {
            cased
        }
    }

    /// Final `<stem><suffix>` title, stem trimmed so the whole fits the max.
    pub fn build_absolute_title(&self, stem: &str) -> String {
        let normalized = self.normalize_title_stem(stem);
        let max_stem = self
            .title_max_length
            .saturating_sub(self.brand_suffix.chars().count());
        let trimmed = trim_to_word_boundary(&normalized, max_stem);
        let stem = if trimmed.is_empty() {
            self.brand_name.as_str()
        } else {
            trimmed.as_str()
        };
        format!("{stem}{}", self.brand_suffix)
    }

    pub fn normalize_description(&self, input: &str) -> String {
        trim_to_word_boundary(&sentence_case_if_needed(input), self.description_max_length)
    }

    /// Length issues for a title or description. `Missing` excludes the others.
    pub fn compute_issue_flags(&self, value: &str, field: SeoField) -> Vec<SeoIssue> {
        let length = value.trim().chars().count();
        if length == 0 {
            return vec![SeoIssue::Missing];
        }
        let (min, max) = match field {
            SeoField::Title => (self.title_min_length, self.title_max_length),
            SeoField::Description => (self.description_min_length, self.description_max_length),
        };
        let mut issues = Vec::new();
        if length < min {
            issues.push(SeoIssue::TooShort);
        }
        if length > max {
            issues.push(SeoIssue::TooLong);
        }
        issues
    }
}

impl Default for SeoRules {
    fn default() -> Self {
        Self::from_config(&PrismConfig::default())
    }
}
