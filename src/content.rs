//! Directory-wide TOC extraction for blog content.
//!
//! Walks a content directory, picks up every `.md` / `.mdx` post, strips YAML
//! front matter, and extracts each post's table of contents in parallel.
//! Results are sorted by path relative to the content directory so output is
//! stable regardless of filesystem or thread ordering.

use crate::config::{PrismConfig, effective_threads};
use crate::toc::{TocItem, get_mdx_toc};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Content directory not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Table of contents for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostToc {
    /// Path relative to the content directory.
    pub path: PathBuf,
    /// File stem, e.g. `local-seo-checklist` for `local-seo-checklist.mdx`.
    pub slug: String,
    pub items: Vec<TocItem>,
}

fn is_post(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md") | Some("mdx")
    )
}

/// Split a leading `---` fenced YAML block from the body. Unterminated front
/// matter counts as body.
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, source)
}

/// Drop a leading `---` fenced YAML block. Unterminated front matter is kept.
pub fn strip_front_matter(source: &str) -> &str {
    split_front_matter(source).1
}

/// Extract the TOC of every post under `dir`.
pub fn collect_blog_tocs(dir: &Path, config: &PrismConfig) -> Result<Vec<PostToc>, ContentError> {
    if !dir.is_dir() {
        return Err(ContentError::NotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && is_post(entry.path()) {
            files.push(entry.into_path());
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_threads(&config.processing))
        .build()?;

    let mut posts = pool.install(|| {
        files
            .par_iter()
            .map(|path| read_post(dir, path))
            .collect::<Result<Vec<_>, _>>()
    })?;
    posts.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(dir = %dir.display(), posts = posts.len(), "collected blog TOCs");
    Ok(posts)
}

fn read_post(dir: &Path, path: &Path) -> Result<PostToc, ContentError> {
    let source = fs::read_to_string(path)?;
    let items = get_mdx_toc(strip_front_matter(&source));
    let relative = path.strip_prefix(dir).unwrap_or(path).to_path_buf();
    let slug = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(PostToc {
        path: relative,
        slug,
        items,
    })
}
