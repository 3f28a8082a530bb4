//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (post, heading) is its semantic identity: label and
//! positional index. Filesystem paths are secondary context on indented
//! `Source:` lines.
//!
//! # Output Format
//!
//! ## TOC
//!
//! ```text
//! 001 Why local SEO matters → #why-local-seo-matters
//!     001 Reviews → #reviews
//!     002 Citations → #citations
//! 002 Next steps → #next-steps
//! ```
//!
//! ## Blog TOC
//!
//! ```text
//! 001 local-seo-checklist (3 headings)
//!     Source: local-seo-checklist.mdx
//!     001 Why local SEO matters → #why-local-seo-matters
//!         001 Reviews → #reviews
//!
//! Collected 1 post, 3 headings
//! ```
//!
//! ## SEO inventory
//!
//! ```text
//! SEO inventory written to seo/inventory.csv (42 routes).
//! ```
//!
//! ## SEO lint
//!
//! ```text
//! SEO lint failed with 2 finding(s).
//! - [suffix_not_once] /ads (count=2)
//! - [noindex_missing_from_robots_disallow] /affiliate-thanks
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout (stderr for lint
//! failures). Format functions do no I/O.

use crate::content::PostToc;
use crate::seo::LintReport;
use crate::toc::{HeadingLevel, TocItem};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 heading` / `N headings`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// TOC entries starting at `depth`: h2 at `depth`, h3 one level deeper.
///
/// h3 positions restart under each h2. An h3 with no preceding h2 is shown
/// at h2 depth, numbered in the h3 sequence.
fn toc_lines(items: &[TocItem], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut h2_pos = 0;
    let mut h3_pos = 0;
    for item in items {
        let (pos, level_depth) = match item.level {
            HeadingLevel::H2 => {
                h2_pos += 1;
                h3_pos = 0;
                (h2_pos, depth)
            }
            HeadingLevel::H3 => {
                h3_pos += 1;
                (h3_pos, if h2_pos == 0 { depth } else { depth + 1 })
            }
        };
        lines.push(format!(
            "{}{} {} → #{}",
            indent(level_depth),
            format_index(pos),
            item.label,
            item.id
        ));
    }
    lines
}

// ============================================================================
// TOC
// ============================================================================

pub fn format_toc(items: &[TocItem]) -> Vec<String> {
    if items.is_empty() {
        return vec!["No headings".to_string()];
    }
    toc_lines(items, 0)
}

pub fn print_toc(items: &[TocItem]) {
    for line in format_toc(items) {
        println!("{}", line);
    }
}

// ============================================================================
// Blog TOC
// ============================================================================

pub fn format_blog_tocs(posts: &[PostToc]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, post) in posts.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            post.slug,
            plural(post.items.len(), "heading")
        ));
        lines.push(format!("{}Source: {}", indent(1), post.path.display()));
        lines.extend(toc_lines(&post.items, 1));
    }

    let headings: usize = posts.iter().map(|post| post.items.len()).sum();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Collected {}, {}",
        plural(posts.len(), "post"),
        plural(headings, "heading")
    ));
    lines
}

pub fn print_blog_tocs(posts: &[PostToc]) {
    for line in format_blog_tocs(posts) {
        println!("{}", line);
    }
}

// ============================================================================
// SEO inventory
// ============================================================================

pub fn format_inventory_written(path: &str, routes: usize) -> String {
    format!("SEO inventory written to {path} ({}).", plural(routes, "route"))
}

// ============================================================================
// SEO lint
// ============================================================================

pub fn format_lint_report(report: &LintReport) -> Vec<String> {
    if report.passed() {
        return vec![format!(
            "SEO lint passed ({} routes checked).",
            report.routes_checked
        )];
    }
    let mut lines = vec![format!(
        "SEO lint failed with {} finding(s).",
        report.findings.len()
    )];
    for finding in &report.findings {
        lines.push(format!("- [{}] {}", finding.code, finding.detail));
    }
    lines
}

/// Passing reports go to stdout, failing ones to stderr.
pub fn print_lint_report(report: &LintReport) {
    let lines = format_lint_report(report);
    if report.passed() {
        for line in lines {
            println!("{}", line);
        }
    } else {
        for line in lines {
            eprintln!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::Finding;
    use std::path::PathBuf;

    fn item(id: &str, label: &str, level: HeadingLevel) -> TocItem {
        TocItem {
            id: id.to_string(),
            label: label.to_string(),
            level,
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "post"), "1 post");
        assert_eq!(plural(0, "post"), "0 posts");
    }

    // =========================================================================
    // TOC formatting tests
    // =========================================================================

    #[test]
    fn format_toc_nests_h3_under_h2() {
        let items = vec![
            item("why", "Why", HeadingLevel::H2),
            item("reviews", "Reviews", HeadingLevel::H3),
            item("citations", "Citations", HeadingLevel::H3),
            item("next", "Next", HeadingLevel::H2),
            item("tools", "Tools", HeadingLevel::H3),
        ];
        assert_eq!(
            format_toc(&items),
            vec![
                "001 Why → #why",
                "    001 Reviews → #reviews",
                "    002 Citations → #citations",
                "002 Next → #next",
                "    001 Tools → #tools",
            ]
        );
    }

    #[test]
    fn format_toc_leading_h3_is_not_indented() {
        let items = vec![item("intro", "Intro", HeadingLevel::H3)];
        assert_eq!(format_toc(&items), vec!["001 Intro → #intro"]);
    }

    #[test]
    fn format_toc_empty() {
        assert_eq!(format_toc(&[]), vec!["No headings"]);
    }

    // =========================================================================
    // Blog TOC formatting tests
    // =========================================================================

    #[test]
    fn format_blog_tocs_lists_posts() {
        let posts = vec![
            PostToc {
                path: PathBuf::from("local-seo.mdx"),
                slug: "local-seo".to_string(),
                items: vec![
                    item("why", "Why", HeadingLevel::H2),
                    item("reviews", "Reviews", HeadingLevel::H3),
                ],
            },
            PostToc {
                path: PathBuf::from("news/launch.md"),
                slug: "launch".to_string(),
                items: vec![],
            },
        ];
        assert_eq!(
            format_blog_tocs(&posts),
            vec![
                "001 local-seo (2 headings)",
                "    Source: local-seo.mdx",
                "    001 Why → #why",
                "        001 Reviews → #reviews",
                "002 launch (0 headings)",
                "    Source: news/launch.md",
                "",
                "Collected 2 posts, 2 headings",
            ]
        );
    }

    #[test]
    fn format_blog_tocs_empty() {
        assert_eq!(format_blog_tocs(&[]), vec!["Collected 0 posts, 0 headings"]);
    }

    #[test]
    fn format_inventory_written_counts_routes() {
        assert_eq!(
            format_inventory_written("seo/inventory.csv", 1),
            "SEO inventory written to seo/inventory.csv (1 route)."
        );
        assert_eq!(
            format_inventory_written("reports/routes.csv", 42),
            "SEO inventory written to reports/routes.csv (42 routes)."
        );
    }

    // =========================================================================
    // Lint report formatting tests
    // =========================================================================

    #[test]
    fn format_lint_report_passed() {
        let report = LintReport {
            routes_checked: 12,
            findings: vec![],
        };
        assert_eq!(
            format_lint_report(&report),
            vec!["SEO lint passed (12 routes checked)."]
        );
    }

    #[test]
    fn format_lint_report_failed() {
        let report = LintReport {
            routes_checked: 3,
            findings: vec![
                Finding {
                    code: "suffix_not_once",
                    detail: "/ads (count=2)".to_string(),
                },
                Finding {
                    code: "missing_canonical",
                    detail: "/about".to_string(),
                },
            ],
        };
        assert_eq!(
            format_lint_report(&report),
            vec![
                "SEO lint failed with 2 finding(s).",
                "- [suffix_not_once] /ads (count=2)",
                "- [missing_canonical] /about",
            ]
        );
    }
}
