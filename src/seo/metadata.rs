//! Per-route SEO metadata.
//!
//! [`build_route_metadata`] produces everything a page head needs (title,
//! description, canonical link, Open Graph and Twitter cards, robots
//! directives) from a title stem, a description, and a path. The result
//! serializes to the camelCase JSON shape the site's page modules consume.

use super::rules::SeoRules;
use crate::config::PrismConfig;
use serde::Serialize;
use url::Url;

/// Author-supplied SEO fields for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSeoInput {
    pub title_stem: String,
    pub description: String,
    pub path: String,
    /// `false` marks the route noindex/nofollow.
    pub index: bool,
    pub og_image: Option<String>,
}

impl RouteSeoInput {
    pub fn new(title_stem: impl Into<String>, description: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title_stem: title_stem.into(),
            description: description.into(),
            path: path.into(),
            index: true,
            og_image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Title {
    pub absolute: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternates {
    pub canonical: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub locale: String,
    pub images: Vec<OgImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

/// Complete head metadata for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadata {
    pub title: Title,
    pub description: String,
    pub alternates: Alternates,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub robots: Robots,
}

/// Absolute `https` URL on the canonical host for a path or URL.
pub fn canonical_url(path_or_url: &str, host: &str) -> String {
    let fallback = || {
        let path = path_or_url.trim_start_matches('/');
        format!("https://{host}/{path}")
    };
    let Ok(base) = Url::parse(&format!("https://{host}")) else {
        return fallback();
    };
    match base.join(path_or_url) {
        Ok(mut url) => {
            if url.set_scheme("https").is_err() || url.set_host(Some(host)).is_err() {
                return fallback();
            }
            url.to_string()
        }
        Err(_) => fallback(),
    }
}

pub fn build_route_metadata(input: &RouteSeoInput, config: &PrismConfig) -> RouteMetadata {
    let rules = SeoRules::from_config(config);
    let title = rules.build_absolute_title(&input.title_stem);
    let description = rules.normalize_description(&input.description);
    let canonical = canonical_url(&input.path, &config.site.canonical_host);
    let og_image = input
        .og_image
        .as_deref()
        .map(str::trim)
        .filter(|image| !image.is_empty())
        .unwrap_or(config.site.default_og_image.as_str())
        .to_string();

    RouteMetadata {
        title: Title {
            absolute: title.clone(),
        },
        description: description.clone(),
        alternates: Alternates {
            canonical: canonical.clone(),
        },
        open_graph: OpenGraph {
            title: title.clone(),
            description: description.clone(),
            url: canonical,
            site_name: config.site.brand_name.clone(),
            kind: "website".to_string(),
            locale: "en_US".to_string(),
            images: vec![OgImage {
                url: og_image.clone(),
                width: 1200,
                height: 630,
                alt: rules.normalize_title_stem(&input.title_stem),
            }],
        },
        twitter: TwitterCard {
            card: "summary_large_image".to_string(),
            title,
            description,
            images: vec![og_image],
        },
        robots: Robots {
            index: input.index,
            follow: input.index,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_route_metadata() {
        let mut input = RouteSeoInput::new(
            "pricing | prism",
            "simple pricing for local growth teams",
            "/pricing",
        );
        input.index = false;
        input.og_image = Some("/pricing-og.png".into());

        let meta = build_route_metadata(&input, &PrismConfig::default());
        assert_eq!(meta.title.absolute, "Pricing | Prism");
        assert_eq!(meta.description, "Simple pricing for local growth teams");
        assert_eq!(meta.alternates.canonical, "https://www.design-prism.com/pricing");
        assert_eq!(meta.open_graph.images[0].url, "/pricing-og.png");
        assert_eq!(meta.open_graph.images[0].alt, "Pricing");
        assert_eq!(meta.twitter.images, vec!["/pricing-og.png"]);
        assert_eq!(meta.robots, Robots { index: false, follow: false });
    }

    #[test]
    fn blank_og_image_uses_default() {
        let mut input = RouteSeoInput::new("About", "About us", "/about");
        input.og_image = Some("  ".into());
        let meta = build_route_metadata(&input, &PrismConfig::default());
        assert_eq!(meta.open_graph.images[0].url, "/prism-opengraph.png");
        assert_eq!(meta.robots, Robots { index: true, follow: true });
    }

    #[test]
    fn canonical_forces_https_and_host() {
        assert_eq!(
            canonical_url("http://design-prism.com/blog?x=1", "www.design-prism.com"),
            "https://www.design-prism.com/blog?x=1"
        );
        assert_eq!(
            canonical_url("seo/audit", "www.design-prism.com"),
            "https://www.design-prism.com/seo/audit"
        );
    }

    #[test]
    fn serializes_camel_case() {
        let meta = build_route_metadata(
            &RouteSeoInput::new("Pricing", "Plans", "/pricing"),
            &PrismConfig::default(),
        );
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["openGraph"]["siteName"], "Prism");
        assert_eq!(json["openGraph"]["type"], "website");
        assert_eq!(json["title"]["absolute"], "Pricing | Prism");
    }
}
