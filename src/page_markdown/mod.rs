//! Rendered page → markdown.
//!
//! Turns a full HTML document into a markdown snapshot of its readable
//! content, followed by catalogs of every page, image, and video/embed URL on
//! the page. The output backs the "copy page as markdown" control:
//!
//! ```text
//! # <first h1, else <title>, else fallback title>
//!
//! Source: [<url>](<url>)
//!
//! <body markdown>
//!
//! ## Page links
//! - [<url>](<url>)
//! ## Image links
//! ...
//! ```
//!
//! Content comes from the first `<main>`, else the first `<article>`, else
//! `<body>`. URL catalogs cover the whole `<body>`. Hidden elements, non-content
//! tags, and the copy control itself are skipped everywhere (see [`prune`]).

mod convert;
mod prune;
pub mod urls;

use crate::config::SiteConfig;
use convert::{MarkdownConverter, normalize_whitespace, visible_text};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;
use prune::is_skipped;
use urls::{UrlBuckets, resolve_source_url};

const NO_CONTENT: &str = "_No readable content found._";

static TRAILING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+\n").expect("valid regex"));
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

static MAIN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").expect("valid selector"));
static ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").expect("valid selector"));
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

/// Where relative URLs resolve from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMarkdownOptions {
    /// Explicit base URL. Wins over everything else.
    pub base_url: Option<String>,
    /// Address the page was loaded from.
    pub location: Option<String>,
}

/// Markdown snapshot of `html` using the stock site settings.
pub fn build_page_markdown_from_document(html: &str, options: &PageMarkdownOptions) -> String {
    build_page_markdown_with(html, options, &SiteConfig::default())
}

/// Markdown snapshot of `html`, taking the fallback domain and title from `site`.
///
/// Never fails: unparseable HTML still yields a document, and a page with no
/// readable text gets a placeholder body.
pub fn build_page_markdown_with(
    html: &str,
    options: &PageMarkdownOptions,
    site: &SiteConfig,
) -> String {
    let document = Html::parse_document(html);

    let source = resolve_source_url(
        options.base_url.as_deref(),
        options.location.as_deref(),
        &document,
        &site.fallback_base_url,
    );
    let (source_raw, base) = match source {
        Some(source) => (source.raw, source.url),
        None => {
            tracing::warn!(
                fallback = %site.fallback_base_url,
                "no usable base URL; links stay unresolved"
            );
            (site.fallback_base_url.clone(), unresolvable_base())
        }
    };

    let body = document.select(&BODY).next();
    let root = document
        .select(&MAIN)
        .next()
        .or_else(|| document.select(&ARTICLE).next())
        .or(body)
        .unwrap_or_else(|| document.root_element());

    let buckets = body
        .map(|body| UrlBuckets::collect(body, &base))
        .unwrap_or_default();

    let body_markdown = normalize_output(&MarkdownConverter::new(&base).convert(root));
    let main_body = if !body_markdown.is_empty() {
        body_markdown
    } else {
        let paragraphs = paragraph_markdown(&visible_text(root));
        if paragraphs.is_empty() {
            NO_CONTENT.to_string()
        } else {
            paragraphs
        }
    };

    let title = page_title(&document, root).unwrap_or_else(|| site.fallback_title.clone());

    let mut sections = vec![
        format!("# {title}"),
        format!("Source: [{source_raw}]({source_raw})"),
        main_body,
    ];
    push_link_section(&mut sections, "Page links", &buckets.page_links);
    push_link_section(&mut sections, "Image links", &buckets.image_links);
    push_link_section(&mut sections, "Video and embed links", &buckets.video_links);

    format!("{}\n", normalize_output(&sections.join("\n\n")))
}

/// A base that every relative reference fails to join against.
fn unresolvable_base() -> Url {
    Url::parse("data:,").expect("valid data url")
}

/// First visible `<h1>` in the root, else the document `<title>`.
fn page_title(document: &Html, root: ElementRef<'_>) -> Option<String> {
    let heading = root
        .select(&H1)
        .filter(|h1| !has_skipped_ancestor(*h1, root))
        .map(|h1| normalize_whitespace(&visible_text(h1)))
        .find(|text| !text.is_empty());
    heading.or_else(|| {
        document
            .select(&TITLE)
            .next()
            .map(|title| normalize_whitespace(&title.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    })
}

fn has_skipped_ancestor(element: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    if is_skipped(element.value()) {
        return true;
    }
    element
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_skipped(ancestor.value()))
}

/// Plain text split into one paragraph per non-blank line.
fn paragraph_markdown(text: &str) -> String {
    text.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn push_link_section(sections: &mut Vec<String>, heading: &str, urls: &BTreeSet<String>) {
    if urls.is_empty() {
        return;
    }
    let lines: Vec<String> = urls.iter().map(|url| format!("- [{url}]({url})")).collect();
    sections.push(format!("## {heading}\n{}", lines.join("\n")));
}

/// Strip trailing whitespace per line, drop up-to-three-space indents left
/// over from inline whitespace outside code fences, collapse blank-line runs,
/// and trim the whole string.
pub(crate) fn normalize_output(markdown: &str) -> String {
    let without_trailing = TRAILING_WHITESPACE.replace_all(markdown, "\n");

    let mut in_fence = false;
    let lines: Vec<&str> = without_trailing
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return line.trim_start();
            }
            if in_fence {
                return line;
            }
            let indent = line.len() - line.trim_start_matches(' ').len();
            if (1..=3).contains(&indent) {
                &line[indent..]
            } else {
                line
            }
        })
        .collect();

    BLANK_RUNS
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}
