//! Elements excluded from page markdown.
//!
//! Non-content tags (`script`, `style`, `noscript`, `template`, `svg`),
//! hidden or screen-reader-only elements, and the copy-markdown control
//! itself. The parsed document is never modified; walkers check
//! [`is_skipped`] and do not descend into skipped subtrees.

use scraper::node::Element;

const SKIPPED_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "svg"];

pub fn is_skipped(element: &Element) -> bool {
    SKIPPED_TAGS.contains(&element.name())
        || element.attr("hidden").is_some()
        || element.attr("aria-hidden") == Some("true")
        || element.attr("data-copy-markdown-control").is_some()
        || element.classes().any(|class| class == "sr-only")
}
