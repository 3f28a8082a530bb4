//! Route exclusion rules read from the site's sitemap and robots sources.
//!
//! The sitemap module declares its exclusions as string literals:
//!
//! ```text
//! const NOINDEX_ROUTES = new Set(["/thank-you", "/checkout"])
//! const NOINDEX_PREFIXES = ["/api", "/internal"]
//! ```
//!
//! and the robots module lists `disallow: ["/api", "/admin"]` per user agent.
//! Only double-quoted literals are recognized.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));

static DISALLOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"disallow:\s*\[([\s\S]*?)\]").expect("valid regex"));

fn quoted_strings(source: &str) -> Vec<String> {
    QUOTED
        .captures_iter(source)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Strings of `const NAME = [...]` or `const NAME = new Set([...])`.
/// Returns an empty list when the declaration is absent.
pub fn extract_string_array(source: &str, name: &str) -> Vec<String> {
    let escaped = regex::escape(name);
    let patterns = [
        format!(r"const\s+{escaped}\s*=\s*\[([\s\S]*?)\]"),
        format!(r"const\s+{escaped}\s*=\s*new\s+Set\s*\(\s*\[([\s\S]*?)\]\s*\)"),
    ];
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .find_map(|re| re.captures(source).map(|caps| quoted_strings(&caps[1])))
        .unwrap_or_default()
}

/// Every `disallow: [...]` entry, deduplicated in first-seen order.
pub fn extract_disallow_rules(source: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    DISALLOW
        .captures_iter(source)
        .flat_map(|caps| quoted_strings(&caps[1]))
        .filter(|rule| seen.insert(rule.clone()))
        .collect()
}

/// `route` equals `prefix` or lives below it.
fn under_prefix(route: &str, prefix: &str) -> bool {
    route == prefix
        || route
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Sitemap noindex declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapExclusions {
    pub routes: HashSet<String>,
    pub prefixes: Vec<String>,
}

impl SitemapExclusions {
    /// Read `NOINDEX_ROUTES` and `NOINDEX_PREFIXES` from sitemap source text.
    pub fn from_source(source: &str) -> Self {
        Self {
            routes: extract_string_array(source, "NOINDEX_ROUTES")
                .into_iter()
                .collect(),
            prefixes: extract_string_array(source, "NOINDEX_PREFIXES"),
        }
    }

    pub fn excludes(&self, route: &str) -> bool {
        self.routes.contains(route) || self.prefixes.iter().any(|p| under_prefix(route, p))
    }
}

/// Whether any robots disallow rule covers `route`. `/` covers everything.
pub fn is_disallowed(route: &str, rules: &[String]) -> bool {
    rules
        .iter()
        .any(|rule| rule == "/" || under_prefix(route, rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"
import type { MetadataRoute } from "next"

const NOINDEX_ROUTES = new Set([
  "/aeo-thank-you",
  "/analysis-thank-you",
])

const NOINDEX_PREFIXES = ["/api", "/checkout"]
"#;

    const ROBOTS: &str = r#"
export default function robots() {
  return {
    rules: [
      { userAgent: "*", allow: "/", disallow: ["/api", "/checkout"] },
      { userAgent: "GPTBot", disallow: ["/api", "/private"] },
    ],
  }
}
"#;

    #[test]
    fn extracts_set_declaration() {
        assert_eq!(
            extract_string_array(SITEMAP, "NOINDEX_ROUTES"),
            vec!["/aeo-thank-you", "/analysis-thank-you"]
        );
    }

    #[test]
    fn extracts_array_declaration() {
        assert_eq!(
            extract_string_array(SITEMAP, "NOINDEX_PREFIXES"),
            vec!["/api", "/checkout"]
        );
    }

    #[test]
    fn missing_declaration_is_empty() {
        assert!(extract_string_array(SITEMAP, "NOPE").is_empty());
    }

    #[test]
    fn disallow_rules_are_deduplicated() {
        assert_eq!(
            extract_disallow_rules(ROBOTS),
            vec!["/api", "/checkout", "/private"]
        );
    }

    #[test]
    fn sitemap_exclusions_match_exact_and_prefix() {
        let exclusions = SitemapExclusions::from_source(SITEMAP);
        assert!(exclusions.excludes("/aeo-thank-you"));
        assert!(exclusions.excludes("/api"));
        assert!(exclusions.excludes("/api/forms"));
        assert!(!exclusions.excludes("/apiary"));
        assert!(!exclusions.excludes("/about"));
    }

    #[test]
    fn root_disallow_blocks_everything() {
        assert!(is_disallowed("/anything", &["/".to_string()]));
        assert!(is_disallowed("/checkout/success", &["/checkout".to_string()]));
        assert!(!is_disallowed("/checkouts", &["/checkout".to_string()]));
    }
}
