//! Route inventory linter.
//!
//! Checks `seo/inventory.csv` against the site's title conventions and its
//! sitemap/robots exclusions. Every problem becomes a [`Finding`] with a
//! stable code; the run fails if there is at least one.
//!
//! | Code | Rows | Condition |
//! |------|------|-----------|
//! | `inventory_empty` | - | inventory has no rows |
//! | `missing_final_title` | indexable | empty final title |
//! | `missing_description` | indexable | empty meta description |
//! | `missing_canonical` | indexable | empty canonical URL |
//! | `suffix_not_once` | indexable | brand suffix count ≠ 1 |
//! | `duplicate_final_title` | indexable | same final title on several routes |
//! | `duplicate_description` | indexable | same description on several routes |
//! | `noindex_missing_from_sitemap_exclusions` | utility_noindex | not excluded by the sitemap |
//! | `noindex_missing_from_robots_disallow` | utility_noindex | not disallowed (`robots_noindex = "disallow"`) |
//! | `noindex_blocked_by_robots_disallow` | utility_noindex | disallowed (`robots_noindex = "crawlable"`) |

use super::SeoError;
use super::inventory::{Indexability, InventoryRow, read_inventory};
use super::routes::{SitemapExclusions, extract_disallow_rules, is_disallowed};
use super::rules::SeoRules;
use crate::config::{PrismConfig, RobotsNoindexPolicy};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest description prefix quoted in a duplicate finding.
const DESCRIPTION_DETAIL_CHARS: usize = 120;

/// One lint problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub code: &'static str,
    pub detail: String,
}

impl Finding {
    fn new(code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }
}

/// Outcome of a lint run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub routes_checked: usize,
    pub findings: Vec<Finding>,
}

impl LintReport {
    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Files the linter reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintPaths {
    pub inventory: PathBuf,
    pub sitemap: PathBuf,
    pub robots: PathBuf,
}

impl LintPaths {
    /// Resolve the configured paths against a project root.
    pub fn from_config(root: &Path, config: &PrismConfig) -> Self {
        Self {
            inventory: root.join(&config.seo.inventory),
            sitemap: root.join(&config.seo.sitemap),
            robots: root.join(&config.seo.robots),
        }
    }
}

/// Group routes by a trimmed, non-empty key in first-seen order.
fn group_by<'a>(
    rows: &[&'a InventoryRow],
    key: impl Fn(&InventoryRow) -> &str,
) -> Vec<(String, Vec<&'a str>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&'a str>> = HashMap::new();
    for &row in rows {
        let value = key(row).trim();
        if value.is_empty() {
            continue;
        }
        let entry = groups.entry(value.to_string()).or_insert_with(|| {
            order.push(value.to_string());
            Vec::new()
        });
        entry.push(row.route());
    }
    order
        .into_iter()
        .filter_map(|value| groups.remove(&value).map(|routes| (value, routes)))
        .collect()
}

/// Lint already-loaded inventory rows against sitemap and robots sources.
pub fn lint_rows(
    rows: &[InventoryRow],
    sitemap_source: &str,
    robots_source: &str,
    config: &PrismConfig,
) -> LintReport {
    let rules = SeoRules::from_config(config);
    let mut findings = Vec::new();

    if rows.is_empty() {
        findings.push(Finding::new("inventory_empty", "Inventory has no rows."));
    }

    let indexable: Vec<&InventoryRow> = rows
        .iter()
        .filter(|row| row.indexability() == Indexability::Indexable)
        .collect();

    for row in &indexable {
        if row.final_title().trim().is_empty() {
            findings.push(Finding::new("missing_final_title", row.route()));
        }
        if row.meta_description().trim().is_empty() {
            findings.push(Finding::new("missing_description", row.route()));
        }
        if row.canonical().trim().is_empty() {
            findings.push(Finding::new("missing_canonical", row.route()));
        }
    }

    for row in &indexable {
        let count = rules.count_brand_suffixes(row.final_title());
        if count != 1 {
            findings.push(Finding::new(
                "suffix_not_once",
                format!("{} (count={count})", row.route()),
            ));
        }
    }

    for (title, routes) in group_by(&indexable, InventoryRow::final_title) {
        if routes.len() > 1 {
            findings.push(Finding::new(
                "duplicate_final_title",
                format!("{title} => {}", routes.join(", ")),
            ));
        }
    }

    for (description, routes) in group_by(&indexable, InventoryRow::meta_description) {
        if routes.len() > 1 {
            let quoted: String = description.chars().take(DESCRIPTION_DETAIL_CHARS).collect();
            findings.push(Finding::new(
                "duplicate_description",
                format!("{quoted} => {}", routes.join(", ")),
            ));
        }
    }

    let exclusions = SitemapExclusions::from_source(sitemap_source);
    let disallow_rules = extract_disallow_rules(robots_source);

    for row in rows
        .iter()
        .filter(|row| row.indexability() == Indexability::UtilityNoindex)
    {
        let route = row.route();
        if !exclusions.excludes(route) {
            findings.push(Finding::new("noindex_missing_from_sitemap_exclusions", route));
        }

        let blocked = is_disallowed(route, &disallow_rules);
        match config.seo.robots_noindex {
            RobotsNoindexPolicy::Disallow if !blocked => {
                findings.push(Finding::new("noindex_missing_from_robots_disallow", route));
            }
            RobotsNoindexPolicy::Crawlable if blocked => {
                findings.push(Finding::new("noindex_blocked_by_robots_disallow", route));
            }
            _ => {}
        }
    }

    tracing::debug!(
        routes = rows.len(),
        findings = findings.len(),
        "linted SEO inventory"
    );

    LintReport {
        routes_checked: rows.len(),
        findings,
    }
}

/// Read the inventory, sitemap, and robots files and lint them.
///
/// A missing inventory is an error; every other problem is a finding.
pub fn lint(paths: &LintPaths, config: &PrismConfig) -> Result<LintReport, SeoError> {
    let rows = read_inventory(&paths.inventory)?;
    let sitemap = fs::read_to_string(&paths.sitemap).map_err(|e| SeoError::Read {
        path: paths.sitemap.clone(),
        source: e,
    })?;
    let robots = fs::read_to_string(&paths.robots).map_err(|e| SeoError::Read {
        path: paths.robots.clone(),
        source: e,
    })?;
    Ok(lint_rows(&rows, &sitemap, &robots, config))
}
