//! Table-of-contents extraction for blog posts.
//!
//! | Path | Parser | Slug |
//! |---|---|---|
//! | **Primary** | [`MdxParser`]: validation + `pulldown-cmark` walk | [`github_slug`](crate::slug::github_slug) |
//! | **Fallback** | [`RegexParser`]: ATX + `<h2>`/`<h3>` regexes | [`simple_slug`](crate::slug::simple_slug) |
//!
//! Both paths keep only `h2`/`h3`, skip empty labels, and drop repeated ids
//! (first occurrence wins). [`get_mdx_toc`] never fails: a rejected document
//! degrades to the fallback scan.

pub mod backend;
pub mod fallback;
pub mod mdx;
mod nav;

pub use backend::{HeadingLevel, TocError, TocItem, TocParser};
pub use fallback::{RegexParser, fallback_toc};
pub use mdx::MdxParser;
pub use nav::render_toc_nav;

/// Extract the table of contents from MDX or markdown source.
pub fn get_mdx_toc(content: &str) -> Vec<TocItem> {
    get_mdx_toc_with(&MdxParser, content)
}

/// Extract with a specific primary parser, falling back to the regex scan
/// when it fails.
pub fn get_mdx_toc_with(parser: &dyn TocParser, content: &str) -> Vec<TocItem> {
    if content.trim().is_empty() {
        return Vec::new();
    }
    match parser.parse(content) {
        Ok(items) => items,
        Err(error) => {
            if !cfg!(test) {
                tracing::warn!(%error, "failed to parse MDX table of contents, using regex fallback");
            }
            fallback_toc(content)
        }
    }
}
