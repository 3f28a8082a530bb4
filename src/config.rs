//! Project configuration module.
//!
//! Handles loading, validating, and merging `prism.toml`. Stock defaults
//! describe the Prism marketing site; a `prism.toml` in the project root
//! overrides any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! brand_name = "Prism"
//! brand_suffix = " | Prism"                  # Appended to every page title
//! canonical_host = "www.design-prism.com"
//! fallback_base_url = "https://www.design-prism.com"
//! fallback_title = "Prism page"              # Page markdown title of last resort
//! default_og_image = "/prism-opengraph.png"
//!
//! [seo]
//! inventory = "seo/inventory.csv"            # Relative to the project root
//! app_dir = "app"                            # Scanned by seo-inventory
//! blog_dir = "content/blog"
//! sitemap = "app/sitemap.ts"
//! robots = "app/robots.ts"
//! robots_noindex = "disallow"                # or "crawlable"
//! title_min_length = 25
//! title_max_length = 65
//! description_min_length = 70
//! description_max_length = 170
//!
//! [processing]
//! max_processes = 4                          # Omit for auto = CPU cores
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "prism.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `prism.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrismConfig {
    /// Brand and domain settings shared by every tool.
    pub site: SiteConfig,
    /// SEO inventory locations, lint policy, and length limits.
    pub seo: SeoConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl PrismConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.brand_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.brand_name must not be empty".into(),
            ));
        }
        if !self.site.brand_suffix.contains(&self.site.brand_name) {
            return Err(ConfigError::Validation(
                "site.brand_suffix must contain site.brand_name".into(),
            ));
        }
        if url::Url::parse(&self.site.fallback_base_url).is_err() {
            return Err(ConfigError::Validation(
                "site.fallback_base_url must be an absolute URL".into(),
            ));
        }
        if self.seo.title_min_length > self.seo.title_max_length {
            return Err(ConfigError::Validation(
                "seo.title_min_length must not exceed seo.title_max_length".into(),
            ));
        }
        if self.seo.title_max_length <= self.site.brand_suffix.chars().count() {
            return Err(ConfigError::Validation(
                "seo.title_max_length must leave room for site.brand_suffix".into(),
            ));
        }
        if self.seo.description_min_length > self.seo.description_max_length {
            return Err(ConfigError::Validation(
                "seo.description_min_length must not exceed seo.description_max_length".into(),
            ));
        }
        Ok(())
    }
}

/// Brand and domain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub brand_name: String,
    /// Suffix appended to page titles; the linter counts its occurrences.
    pub brand_suffix: String,
    /// Host every canonical URL is rewritten to.
    pub canonical_host: String,
    /// Base URL for page markdown when neither an override nor a page
    /// location is known.
    pub fallback_base_url: String,
    pub fallback_title: String,
    pub default_og_image: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand_name: "Prism".to_string(),
            brand_suffix: " | Prism".to_string(),
            canonical_host: "www.design-prism.com".to_string(),
            fallback_base_url: "https://www.design-prism.com".to_string(),
            fallback_title: "Prism page".to_string(),
            default_og_image: "/prism-opengraph.png".to_string(),
        }
    }
}

/// How `utility_noindex` routes must relate to `robots.txt` disallow rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotsNoindexPolicy {
    /// Every noindex route must be covered by a disallow rule.
    #[default]
    Disallow,
    /// No noindex route may be disallowed, so crawlers can read its noindex tag.
    Crawlable,
}

/// SEO inventory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeoConfig {
    /// Route inventory CSV, relative to the project root.
    pub inventory: String,
    /// App Router tree walked for `page.tsx` routes.
    pub app_dir: String,
    /// Blog posts; each `<slug>.mdx` becomes a `/blog/<slug>` route.
    pub blog_dir: String,
    /// Sitemap source declaring `NOINDEX_ROUTES` and `NOINDEX_PREFIXES`.
    pub sitemap: String,
    /// Robots source declaring `disallow: [...]` rules.
    pub robots: String,
    pub robots_noindex: RobotsNoindexPolicy,
    pub title_min_length: usize,
    pub title_max_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            inventory: "seo/inventory.csv".to_string(),
            app_dir: "app".to_string(),
            blog_dir: "content/blog".to_string(),
            sitemap: "app/sitemap.ts".to_string(),
            robots: "app/robots.ts".to_string(),
            robots_noindex: RobotsNoindexPolicy::default(),
            title_min_length: 25,
            title_max_length: 65,
            description_min_length: 70,
            description_max_length: 170,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for directory-wide TOC extraction.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PrismConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `prism.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PrismConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PrismConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `prism.toml` in the given project root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<PrismConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(root = %root.display(), "loaded project config");
    Ok(config)
}

/// Returns a fully-commented stock `prism.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Prism Content Tooling Configuration
# ===================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the project root as prism.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site / brand
# ---------------------------------------------------------------------------
[site]
brand_name = "Prism"

# Appended to every page title. Must contain brand_name.
brand_suffix = " | Prism"

# Canonical URLs are rewritten to https://<canonical_host>/<path>.
canonical_host = "www.design-prism.com"

# Base URL used by page-markdown when no --base-url or --location is given
# and the document has no <base href>.
fallback_base_url = "https://www.design-prism.com"

# Markdown title used when a page has neither an <h1> nor a <title>.
fallback_title = "Prism page"

# Open Graph image used when a route does not provide one.
default_og_image = "/prism-opengraph.png"

# ---------------------------------------------------------------------------
# SEO inventory generation and lint
# ---------------------------------------------------------------------------
[seo]
# Paths are relative to the project root.
inventory = "seo/inventory.csv"

# Sources scanned by seo-inventory.
app_dir = "app"
blog_dir = "content/blog"

sitemap = "app/sitemap.ts"
robots = "app/robots.ts"

# How utility_noindex routes must relate to robots disallow rules:
#   "disallow"  - every noindex route must be disallowed
#   "crawlable" - no noindex route may be disallowed
robots_noindex = "disallow"

# Length limits used for title and description issue flags.
title_min_length = 25
title_max_length = 65
description_min_length = 70
description_max_length = 170

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for blog-toc.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
