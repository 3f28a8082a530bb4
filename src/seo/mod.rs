//! SEO inventory tooling.
//!
//! - [`csv`]: quote-aware CSV reader/writer for the inventory file
//! - [`scan`]: inventory generation from `app/` pages and blog posts
//! - [`tsx`]: literal `export const metadata` evaluation for page modules
//! - [`inventory`]: typed access to inventory rows
//! - [`routes`]: noindex/disallow rules read from `app/sitemap.ts` and `app/robots.ts`
//! - [`rules`]: title and description normalization
//! - [`metadata`]: per-route head metadata
//! - [`lint`]: the inventory linter

pub mod csv;
pub mod inventory;
pub mod lint;
pub mod metadata;
pub mod routes;
pub mod rules;
pub mod scan;
pub mod tsx;

use std::path::PathBuf;
use thiserror::Error;

pub use inventory::{Indexability, InventoryRow, read_inventory};
pub use lint::{Finding, LintPaths, LintReport, lint, lint_rows};
pub use metadata::{RouteMetadata, RouteSeoInput, build_route_metadata};
pub use rules::{SeoField, SeoIssue, SeoRules};
pub use scan::{InventoryPaths, build_inventory, generate_inventory};

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing inventory file: {}. Run `prism seo-inventory` first.", .0.display())]
    MissingInventory(PathBuf),
    #[error("App directory not found: {}", .0.display())]
    MissingAppDir(PathBuf),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid front matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
