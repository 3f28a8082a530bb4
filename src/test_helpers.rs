//! Shared test utilities for the prism-content test suite.
//!
//! Builds throwaway project roots with the files the SEO linter reads
//! (`seo/inventory.csv`, `app/sitemap.ts`, `app/robots.ts`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_project(&[
//!     inventory_row("/", "Home | Prism", "Home description", "indexable"),
//!     inventory_row("/aeo-thank-you", "", "", "utility_noindex"),
//! ]);
//! let config = PrismConfig::default();
//! let report = lint(&LintPaths::from_config(tmp.path(), &config), &config).unwrap();
//! assert!(report.passed());
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::seo::csv::write_csv;
use crate::seo::inventory::INVENTORY_COLUMNS;

// =========================================================================
// Site sources
// =========================================================================

/// `app/sitemap.ts` excluding the thank-you page and everything under `/checkout`.
pub const SITEMAP_SOURCE: &str = r#"import type { MetadataRoute } from "next"

const NOINDEX_ROUTES = new Set([
  "/aeo-thank-you",
  "/affiliate-thanks",
])

const NOINDEX_PREFIXES = ["/checkout"]
"#;

/// `app/robots.ts` disallowing the same routes the sitemap excludes.
pub const ROBOTS_SOURCE: &str = r#"export default function robots() {
  return {
    rules: [
      { userAgent: "*", allow: "/", disallow: ["/checkout", "/aeo-thank-you", "/affiliate-thanks"] },
    ],
  }
}
"#;

// =========================================================================
// Fixture setup
// =========================================================================

/// One inventory row in [`INVENTORY_COLUMNS`] order.
///
/// `title`, `h1`, and `robots` are derived from the other fields; the issue
/// and structured-data columns stay empty.
pub fn inventory_row(route: &str, final_title: &str, description: &str, class: &str) -> Vec<String> {
    let canonical = format!("https://www.design-prism.com{route}");
    let robots = if class == "indexable" {
        "index,follow"
    } else {
        "noindex,nofollow"
    };
    let stem = final_title.split(" | ").next().unwrap_or_default();
    vec![
        route.to_string(),
        stem.to_string(),
        final_title.to_string(),
        description.to_string(),
        canonical,
        stem.to_string(),
        robots.to_string(),
        class.to_string(),
        String::new(),
        String::new(),
        String::new(),
    ]
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Write `seo/inventory.csv` the way the inventory generator does.
pub fn write_inventory(root: &Path, rows: &[Vec<String>]) {
    write_file(root, "seo/inventory.csv", &write_csv(&INVENTORY_COLUMNS, rows));
}

/// A project root with the given inventory rows plus the stock sitemap and
/// robots sources.
pub fn setup_project(rows: &[Vec<String>]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_inventory(tmp.path(), rows);
    write_file(tmp.path(), "app/sitemap.ts", SITEMAP_SOURCE);
    write_file(tmp.path(), "app/robots.ts", ROBOTS_SOURCE);
    tmp
}
