//! End-to-end checks for the SEO inventory linter.
//!
//! Builds a throwaway site checkout (inventory, sitemap, robots) and runs both
//! the library entry point and the `prism seo-lint` binary against it.

use prism_content::config::{PrismConfig, load_config};
use prism_content::seo::csv::write_csv;
use prism_content::seo::inventory::INVENTORY_COLUMNS;
use prism_content::seo::{LintPaths, lint};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const SITEMAP: &str = r#"const NOINDEX_ROUTES = new Set(["/aeo-thank-you"])
const NOINDEX_PREFIXES = ["/checkout"]
"#;

const ROBOTS: &str = r#"rules: [{ userAgent: "*", disallow: ["/checkout", "/aeo-thank-you"] }]"#;

fn row(route: &str, final_title: &str, description: &str, class: &str) -> Vec<String> {
    let mut fields = vec![String::new(); INVENTORY_COLUMNS.len()];
    fields[0] = route.to_string();
    fields[2] = final_title.to_string();
    fields[3] = description.to_string();
    fields[4] = format!("https://www.design-prism.com{route}");
    fields[7] = class.to_string();
    fields
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project(rows: &[Vec<String>]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "seo/inventory.csv", &write_csv(&INVENTORY_COLUMNS, rows));
    write(tmp.path(), "app/sitemap.ts", SITEMAP);
    write(tmp.path(), "app/robots.ts", ROBOTS);
    tmp
}

fn run_lint(root: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_prism"))
        .args(["--root", root.to_str().unwrap(), "seo-lint"])
        .output()
        .unwrap()
}

#[test]
fn clean_project_passes() {
    let tmp = project(&[
        row("/", "Growth systems for local businesses | Prism", "Home", "indexable"),
        row("/pricing", "Pricing | Prism", "Plans, \"quoted\", and more", "indexable"),
        row("/aeo-thank-you", "", "", "utility_noindex"),
    ]);
    let config = load_config(tmp.path()).unwrap();
    let report = lint(&LintPaths::from_config(tmp.path(), &config), &config).unwrap();
    assert!(report.passed(), "{:?}", report.findings);
    assert_eq!(report.routes_checked, 3);

    let out = run_lint(tmp.path());
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "SEO lint passed (3 routes checked).\n"
    );
}

#[test]
fn double_suffix_fails_with_one_finding() {
    let tmp = project(&[row(
        "/google-ads",
        "Google Ads | Prism | Prism",
        "Ads management",
        "indexable",
    )]);
    let config = PrismConfig::default();
    let report = lint(&LintPaths::from_config(tmp.path(), &config), &config).unwrap();
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].code, "suffix_not_once");
    assert!(report.findings[0].detail.contains("/google-ads"));

    let out = run_lint(tmp.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("SEO lint failed with 1 finding(s)."));
    assert!(stderr.contains("- [suffix_not_once] /google-ads (count=2)"));
}

#[test]
fn missing_inventory_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "app/sitemap.ts", SITEMAP);
    write(tmp.path(), "app/robots.ts", ROBOTS);
    let out = run_lint(tmp.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Missing inventory file"));
}

#[test]
fn crawlable_policy_from_config_file() {
    let tmp = project(&[row("/checkout/success", "", "", "utility_noindex")]);
    write(tmp.path(), "prism.toml", "[seo]\nrobots_noindex = \"crawlable\"\n");
    let config = load_config(tmp.path()).unwrap();
    let report = lint(&LintPaths::from_config(tmp.path(), &config), &config).unwrap();
    let codes: Vec<_> = report.findings.iter().map(|f| f.code).collect();
    assert_eq!(codes, vec!["noindex_blocked_by_robots_disallow"]);
}
