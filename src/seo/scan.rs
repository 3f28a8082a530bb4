//! Route inventory generation.
//!
//! Produces the `seo/inventory.csv` the linter checks, from the project sources:
//!
//! - Every `page.{tsx,ts,jsx,js}` under the App Router tree is a route. Route
//!   groups `(marketing)` and parallel slots `@modal` drop out of the path;
//!   `api`, `_private`, dot directories and `node_modules` are not walked.
//! - The `/blog/[slug]` placeholder is replaced by one `/blog/<slug>` route per
//!   `<slug>.mdx` post, described by its front matter.
//! - Page routes read `export const metadata` from the page module. The first
//!   `<h1>` and any structured-data component come from the files next to it.
//!
//! Titles and descriptions pass through the same [`SeoRules`] the site uses
//! at render time, so the inventory records what a crawler would see.

use super::SeoError;
use super::csv::write_csv;
use super::inventory::{INVENTORY_COLUMNS, Indexability};
use super::metadata::canonical_url;
use super::rules::{SeoField, SeoRules, collapse_whitespace};
use super::tsx::declared_metadata;
use crate::config::PrismConfig;
use crate::content::split_front_matter;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Dynamic blog route replaced by the concrete post routes.
pub const BLOG_PLACEHOLDER: &str = "/blog/[slug]";

/// Components that emit JSON-LD.
const STRUCTURED_DATA_MARKERS: [&str; 21] = [
    "CaseStudySchema",
    "MinimalCaseStudyPage",
    "ServiceSchema",
    "BlogPostSchema",
    "HowToSchema",
    "VideoObjectSchema",
    "VideoSchema",
    "FAQSchema",
    "FAQSection",
    "PersonSchema",
    "OrganizationSchema",
    "ContactPageSchema",
    "CollectionPageSchema",
    "ItemListSchema",
    "JobPostingSchema",
    "PodcastSeriesSchema",
    "PodcastEpisodeSchema",
    "ProductSchema",
    "WebPageSchema",
    "LocalBusinessSchema",
    "GlobalSchemaGraph",
];

/// Hero components that render the page `<h1>` themselves.
const H1_COMPONENTS: [&str; 3] = ["SeoHero", "PricingHero", "MinimalCaseStudyPage"];

static PAGE_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^page\.(?:tsx|ts|jsx|js)$").expect("valid page regex"));

static SOURCE_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?:tsx|ts|jsx|js|mdx)$").expect("valid source regex"));

static H1_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:[\w$]+\.)?h1[^>]*>(.*?)</(?:[\w$]+\.)?h1>").expect("valid h1 regex")
});

static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<[^>]+>|\{[^}]*\}|&[a-z]+;").expect("valid markup regex")
});

/// Where the generator reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPaths {
    pub app_dir: PathBuf,
    pub blog_dir: PathBuf,
    pub output: PathBuf,
}

impl InventoryPaths {
    pub fn from_config(root: &Path, config: &PrismConfig) -> Self {
        Self {
            app_dir: root.join(&config.seo.app_dir),
            blog_dir: root.join(&config.seo.blog_dir),
            output: root.join(&config.seo.inventory),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    /// App Router page module.
    Page(PathBuf),
    /// Blog post rendered by the `/blog/[slug]` route.
    BlogPost(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub route: String,
    pub source: RouteSource,
}

fn skip_dir(name: &str) -> bool {
    name == "api" || name == "node_modules" || name.starts_with('_') || name.starts_with('.')
}

/// URL path for the directory segments of a page, without groups and slots.
fn route_path(segments: &[String]) -> String {
    let kept: Vec<&str> = segments
        .iter()
        .map(String::as_str)
        .filter(|segment| !segment.starts_with('(') && !segment.starts_with('@'))
        .collect();
    format!("/{}", kept.join("/"))
}

/// Every page module under `app_dir`, in directory order.
pub fn discover_pages(app_dir: &Path) -> Result<Vec<RouteEntry>, SeoError> {
    if !app_dir.is_dir() {
        return Err(SeoError::MissingAppDir(app_dir.to_path_buf()));
    }

    let walker = WalkDir::new(app_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !skip_dir(&entry.file_name().to_string_lossy())
        });

    let mut pages = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !PAGE_FILE.is_match(&entry.file_name().to_string_lossy())
        {
            continue;
        }
        let segments: Vec<String> = entry
            .path()
            .parent()
            .and_then(|dir| dir.strip_prefix(app_dir).ok())
            .map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        pages.push(RouteEntry {
            route: route_path(&segments),
            source: RouteSource::Page(entry.into_path()),
        });
    }
    Ok(pages)
}

/// One route per `<slug>.mdx` in `blog_dir`. A missing directory has no posts.
pub fn discover_blog_posts(blog_dir: &Path) -> Result<Vec<RouteEntry>, SeoError> {
    if !blog_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut posts = Vec::new();
    for entry in fs::read_dir(blog_dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("mdx") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let route = format!("/blog/{slug}");
        posts.push(RouteEntry {
            route,
            source: RouteSource::BlogPost(path),
        });
    }
    Ok(posts)
}

/// Page routes with the blog placeholder swapped for post routes, sorted by
/// route.
pub fn discover_routes(paths: &InventoryPaths) -> Result<Vec<RouteEntry>, SeoError> {
    let mut routes = discover_pages(&paths.app_dir)?;
    routes.retain(|entry| entry.route != BLOG_PLACEHOLDER);
    routes.extend(discover_blog_posts(&paths.blog_dir)?);
    routes.sort_by(|a, b| a.route.cmp(&b.route));
    Ok(routes)
}

/// Column values for one route, before issue flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RouteFields {
    title: String,
    final_title: String,
    description: String,
    canonical: String,
    h1: String,
    noindex: bool,
    structured_data: bool,
}

fn read_source(path: &Path) -> Result<String, SeoError> {
    fs::read_to_string(path).map_err(|source| SeoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loading, error and layout files never hold the page heading.
fn is_chrome_file(name: &str) -> bool {
    name.starts_with("layout.")
        || name.starts_with("loading.")
        || name.starts_with("error.")
        || name.contains("not-found")
        || name.contains("global-error")
}

/// `(file name, contents)` of the source files in a page directory, by name.
fn sibling_sources(dir: &Path) -> Result<Vec<(String, String)>, SeoError> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| SOURCE_FILE.is_match(name))
        .collect();
    names.sort();
    names
        .into_iter()
        .map(|name| {
            let text = read_source(&dir.join(&name))?;
            Ok((name, text))
        })
        .collect()
}

/// Text of the first `<h1>` in the page files. `dynamic` when the heading is
/// all expressions, `component` when a hero component renders it.
fn first_h1(files: &[(String, String)]) -> Option<String> {
    let mut hero = false;
    for (name, text) in files {
        if is_chrome_file(name) {
            continue;
        }
        if let Some(caps) = H1_ELEMENT.captures(text) {
            let inner = &caps[1];
            let cleaned = collapse_whitespace(&MARKUP.replace_all(inner, " "));
            if !cleaned.is_empty() {
                return Some(cleaned);
            }
            if !inner.trim().is_empty() {
                return Some("dynamic".to_string());
            }
        }
        hero |= H1_COMPONENTS.iter().any(|marker| text.contains(marker));
    }
    hero.then(|| "component".to_string())
}

fn has_structured_data(files: &[(String, String)]) -> bool {
    files
        .iter()
        .any(|(_, text)| STRUCTURED_DATA_MARKERS.iter().any(|marker| text.contains(marker)))
}

fn page_fields(
    route: &str,
    page: &Path,
    rules: &SeoRules,
    config: &PrismConfig,
) -> Result<RouteFields, SeoError> {
    let source = read_source(page)?;
    let files = sibling_sources(page.parent().unwrap_or(Path::new(".")))?;
    let host = &config.site.canonical_host;

    let mut fields = RouteFields {
        canonical: canonical_url(route, host),
        h1: first_h1(&files).unwrap_or_default(),
        structured_data: has_structured_data(&files),
        ..RouteFields::default()
    };
    match declared_metadata(&source) {
        Some(declared) => {
            fields.final_title = rules.build_absolute_title(&declared.title_stem);
            fields.description = rules.normalize_description(&declared.description);
            fields.canonical = canonical_url(declared.canonical.as_deref().unwrap_or(route), host);
            fields.title = declared.title_stem;
            fields.noindex = declared.noindex;
        }
        None => tracing::debug!(page = %page.display(), "no literal metadata export"),
    }
    Ok(fields)
}

/// First non-empty string among `keys` in the front matter.
fn front_matter_str<'a>(front_matter: &'a serde_yaml::Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| front_matter.get(*key)?.as_str())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn blog_fields(
    route: &str,
    post: &Path,
    rules: &SeoRules,
    config: &PrismConfig,
) -> Result<RouteFields, SeoError> {
    let source = read_source(post)?;
    let front_matter = match split_front_matter(&source).0 {
        Some(yaml) => serde_yaml::from_str(yaml).map_err(|source| SeoError::FrontMatter {
            path: post.to_path_buf(),
            source,
        })?,
        None => serde_yaml::Value::Null,
    };

    let title = rules.normalize_title_stem(
        front_matter_str(&front_matter, &["seoTitle", "title"]).unwrap_or("Blog post"),
    );
    let description = front_matter_str(&front_matter, &["seoDescription", "description"])
        .unwrap_or_default();
    let canonical = front_matter_str(&front_matter, &["canonical"]).unwrap_or(route);

    Ok(RouteFields {
        final_title: rules.build_absolute_title(&title),
        description: rules.normalize_description(description),
        canonical: canonical_url(canonical, &config.site.canonical_host),
        h1: front_matter_str(&front_matter, &["h1Title", "title"])
            .unwrap_or_default()
            .to_string(),
        title,
        noindex: false,
        structured_data: true,
    })
}

/// `;`-joined issue codes for a final title. Noindex routes are not held to
/// the single brand suffix.
fn title_issues(rules: &SeoRules, final_title: &str, noindex: bool) -> String {
    let mut issues: Vec<String> = rules
        .compute_issue_flags(final_title, SeoField::Title)
        .iter()
        .map(ToString::to_string)
        .collect();
    if !noindex && rules.count_brand_suffixes(final_title) != 1 {
        issues.push("suffix_not_once".to_string());
    }
    issues.join(";")
}

fn description_issues(rules: &SeoRules, description: &str) -> String {
    rules
        .compute_issue_flags(description, SeoField::Description)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Row values in [`INVENTORY_COLUMNS`] order.
fn row_values(route: &str, fields: RouteFields, rules: &SeoRules) -> Vec<String> {
    let robots = if fields.noindex { "noindex" } else { "index" };
    let title_issues = title_issues(rules, &fields.final_title, fields.noindex);
    let description_issues = description_issues(rules, &fields.description);
    vec![
        route.to_string(),
        fields.title,
        fields.final_title,
        fields.description,
        fields.canonical,
        fields.h1,
        robots.to_string(),
        Indexability::from_robots(robots).as_str().to_string(),
        title_issues,
        description_issues,
        if fields.structured_data { "yes" } else { "no" }.to_string(),
    ]
}

/// Build every inventory row without writing anything.
pub fn build_inventory(
    paths: &InventoryPaths,
    config: &PrismConfig,
) -> Result<Vec<Vec<String>>, SeoError> {
    let rules = SeoRules::from_config(config);
    discover_routes(paths)?
        .iter()
        .map(|entry| {
            let fields = match &entry.source {
                RouteSource::Page(page) => page_fields(&entry.route, page, &rules, config)?,
                RouteSource::BlogPost(post) => blog_fields(&entry.route, post, &rules, config)?,
            };
            Ok(row_values(&entry.route, fields, &rules))
        })
        .collect()
}

/// Write the inventory CSV and return the number of routes.
pub fn generate_inventory(paths: &InventoryPaths, config: &PrismConfig) -> Result<usize, SeoError> {
    let rows = build_inventory(paths, config)?;
    if let Some(parent) = paths.output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&paths.output, write_csv(&INVENTORY_COLUMNS, &rows))?;
    tracing::debug!(
        output = %paths.output.display(),
        routes = rows.len(),
        "wrote SEO inventory"
    );
    Ok(rows.len())
}
