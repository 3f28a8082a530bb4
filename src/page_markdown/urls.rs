//! URL resolution and link cataloging for page markdown.

use super::prune::is_skipped;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

static BASE_HREF: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").expect("valid selector"));

/// Resolve `raw` against `base`. Empty values, `javascript:` URLs and values
/// that do not resolve yield `None`.
pub fn to_absolute_url(raw: Option<&str>, base: &Url) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    if value
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
    {
        return None;
    }
    base.join(value).ok().map(|url| url.to_string())
}

/// `src`, falling back to `data-src` for lazily loaded media.
pub fn media_source(element: ElementRef<'_>, base: &Url) -> Option<String> {
    let el = element.value();
    to_absolute_url(el.attr("src"), base).or_else(|| to_absolute_url(el.attr("data-src"), base))
}

/// The base URL a page's relative links resolve against, plus its parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    /// As written by the caller or the document.
    pub raw: String,
    pub url: Url,
}

impl SourceUrl {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Url::parse(raw).ok().map(|url| Self {
            raw: raw.to_string(),
            url,
        })
    }
}

/// Pick the first usable candidate: explicit override, then the address the
/// page was loaded from, then the document's `<base href>`, then `fallback`.
pub fn resolve_source_url(
    base_url: Option<&str>,
    location: Option<&str>,
    document: &Html,
    fallback: &str,
) -> Option<SourceUrl> {
    let document_base = document
        .select(&BASE_HREF)
        .next()
        .and_then(|base| base.value().attr("href"));

    [base_url, location, document_base, Some(fallback)]
        .into_iter()
        .flatten()
        .find_map(SourceUrl::parse)
}

/// Absolute URLs referenced by a page, sorted and deduplicated per bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlBuckets {
    pub page_links: BTreeSet<String>,
    pub image_links: BTreeSet<String>,
    pub video_links: BTreeSet<String>,
}

impl UrlBuckets {
    /// Walk `root`, skipping pruned subtrees, and catalog every link and media URL.
    pub fn collect(root: ElementRef<'_>, base: &Url) -> Self {
        let mut buckets = Self::default();
        buckets.visit(root, base);
        buckets
    }

    fn visit(&mut self, element: ElementRef<'_>, base: &Url) {
        if is_skipped(element.value()) {
            return;
        }
        let el = element.value();
        match el.name() {
            "a" => {
                if let Some(href) = to_absolute_url(el.attr("href"), base) {
                    self.page_links.insert(href);
                }
            }
            "img" => {
                if let Some(src) = media_source(element, base) {
                    self.image_links.insert(src);
                }
            }
            "video" => {
                if let Some(src) = media_source(element, base) {
                    self.video_links.insert(src);
                }
                if let Some(poster) = to_absolute_url(el.attr("poster"), base) {
                    self.image_links.insert(poster);
                }
                for source in video_sources(element, base) {
                    self.video_links.insert(source);
                }
            }
            "iframe" if el.attr("src").is_some() => {
                if let Some(src) = media_source(element, base) {
                    self.video_links.insert(src);
                }
            }
            _ => {}
        }
        for child in element.children().filter_map(ElementRef::wrap) {
            self.visit(child, base);
        }
    }
}

/// Resolved URLs of `<source src>` descendants of a video, in document order.
pub fn video_sources(video: ElementRef<'_>, base: &Url) -> Vec<String> {
    video
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "source" && el.value().attr("src").is_some())
        .filter(|el| !is_skipped(el.value()))
        .filter_map(|el| media_source(el, base))
        .collect()
}
