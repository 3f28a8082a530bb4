//! # Prism Content
//!
//! Content tooling behind the Prism marketing site: blog tables of contents,
//! markdown snapshots of rendered pages, and the route SEO inventory with its
//! generator and linter.
//! Everything works on plain files in the site repository (MDX posts, built
//! HTML, `seo/inventory.csv`, `app/sitemap.ts`, `app/robots.ts`), so the
//! tools run the same in CI, in a pre-commit hook, or by hand.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`toc`] | MDX heading extraction: `pulldown-cmark` walk with a regex fallback, plus nav rendering with Maud |
//! | [`slug`] | Heading anchor ids: GitHub-style and simple ASCII slugs, duplicate tracking |
//! | [`content`] | Parallel TOC extraction over a blog content directory |
//! | [`page_markdown`] | Rendered HTML page → markdown with page/image/video link catalogs |
//! | [`seo`] | Inventory generation from `app/` and blog posts, CSV loading, title/description rules, route metadata, the linter |
//! | [`config`] | `prism.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting for TOCs and lint reports |
//!
//! # Design Decisions
//!
//! ## TOC Extraction Never Fails
//!
//! Blog pages render their table of contents from the post source. A post
//! with a malformed JSX block or an unbalanced `{expression}` should still
//! render, so [`toc::get_mdx_toc`] degrades to a line-oriented regex scan
//! instead of returning an error. The two paths slug differently
//! (GitHub-style vs. simple ASCII), which mirrors how the rendered heading
//! ids are produced on each path.
//!
//! ## The Parsed Page Is Never Mutated
//!
//! [`page_markdown`] skips hidden elements, scripts, and the copy control
//! while walking the parsed document instead of removing them first. The
//! same document backs both the content conversion (rooted at `<main>`) and
//! the link catalogs (rooted at `<body>`).
//!
//! ## Lint Findings Are Data
//!
//! [`seo::lint_rows`] is a pure function from inventory rows and the sitemap
//! and robots sources to a list of coded findings. Reading files and deciding
//! the process exit code happen at the edges, in [`seo::lint`] and the CLI.

pub mod config;
pub mod content;
pub mod output;
pub mod page_markdown;
pub mod seo;
pub mod slug;
pub mod toc;

#[cfg(test)]
pub(crate) mod test_helpers;
