//! `prism seo-inventory` feeding `prism seo-lint` on a throwaway site checkout.

use prism_content::seo::read_inventory;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SITEMAP: &str = r#"const NOINDEX_ROUTES = new Set(["/aeo-thank-you"])
const NOINDEX_PREFIXES = ["/checkout"]
"#;

const ROBOTS: &str = r#"rules: [{ userAgent: "*", disallow: ["/checkout", "/aeo-thank-you"] }]"#;

const HOME: &str = r#"export const metadata = buildRouteMetadata({
  titleStem: "Growth systems for local businesses",
  description: "Websites, ads, and local SEO that turn searches into booked appointments.",
  path: "/",
})
"#;

const THANKS: &str = r#"export const metadata = buildRouteMetadata({
  titleStem: "Thanks for reaching out",
  description: "We received your request.",
  path: "/aeo-thank-you",
  index: false,
})
"#;

const POST: &str = r#"---
title: The local SEO checklist
description: Every step we take to move a dental practice into the map pack.
---

## Why it matters
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app/page.tsx", HOME);
    write(tmp.path(), "app/aeo-thank-you/page.tsx", THANKS);
    write(tmp.path(), "app/blog/[slug]/page.tsx", "export default function Post() {}");
    write(tmp.path(), "app/sitemap.ts", SITEMAP);
    write(tmp.path(), "app/robots.ts", ROBOTS);
    write(tmp.path(), "content/blog/local-seo-checklist.mdx", POST);
    tmp
}

fn prism(root: &Path, command: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_prism"))
        .args(["--root", root.to_str().unwrap(), command])
        .output()
        .unwrap()
}

#[test]
fn generated_inventory_passes_lint() {
    let tmp = site();

    let generated = prism(tmp.path(), "seo-inventory");
    assert!(generated.status.success());
    assert_eq!(
        String::from_utf8_lossy(&generated.stdout).trim(),
        "SEO inventory written to seo/inventory.csv (3 routes)."
    );

    let rows = read_inventory(&tmp.path().join("seo/inventory.csv")).unwrap();
    let routes: Vec<&str> = rows.iter().map(|row| row.route()).collect();
    assert_eq!(routes, vec!["/", "/aeo-thank-you", "/blog/local-seo-checklist"]);
    assert_eq!(rows[2].final_title(), "The local SEO checklist | Prism");

    let linted = prism(tmp.path(), "seo-lint");
    assert!(
        linted.status.success(),
        "{}",
        String::from_utf8_lossy(&linted.stderr)
    );
}

#[test]
fn duplicate_titles_surface_in_lint() {
    let tmp = site();
    let copy = HOME.replace("path: \"/\"", "path: \"/home-copy\"");
    write(tmp.path(), "app/home-copy/page.tsx", &copy);

    assert!(prism(tmp.path(), "seo-inventory").status.success());
    let linted = prism(tmp.path(), "seo-lint");
    assert_eq!(linted.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&linted.stderr).contains("[duplicate_final_title]"));
}

#[test]
fn missing_app_dir_fails() {
    let tmp = TempDir::new().unwrap();
    let output = prism(tmp.path(), "seo-inventory");
    assert!(!output.status.success());
    assert!(!tmp.path().join("seo/inventory.csv").exists());
}
