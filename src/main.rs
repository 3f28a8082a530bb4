use clap::{Parser, Subcommand};
use prism_content::page_markdown::{PageMarkdownOptions, build_page_markdown_with};
use prism_content::seo::{
    InventoryPaths, LintPaths, RouteSeoInput, SeoError, SeoField, SeoRules, build_route_metadata,
    generate_inventory, lint,
};
use prism_content::{config, content, output, toc};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Shared flags for commands that can emit JSON.
#[derive(clap::Args, Clone)]
struct FormatArgs {
    /// Print JSON instead of the human-readable listing
    #[arg(long)]
    json: bool,
}

/// The package version on a clean release tag, otherwise `dev@<hash>` with a `+dirty`
/// marker for uncommitted changes.
fn describe_version(version: &str, hash: &str, dirty: bool, release: bool) -> String {
    if release && !dirty {
        return version.to_string();
    }
    if hash.is_empty() {
        return "dev@unknown".to_string();
    }
    let suffix = if dirty { "+dirty" } else { "" };
    format!("dev@{hash}{suffix}")
}

fn version_string() -> &'static str {
    let version = describe_version(
        env!("CARGO_PKG_VERSION"),
        env!("PRISM_GIT_HASH"),
        env!("PRISM_GIT_DIRTY") == "true",
        env!("PRISM_RELEASE_TAG") == "true",
    );
    // Leaked once at startup
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "prism")]
#[command(about = "Content tooling for the Prism marketing site")]
#[command(long_about = "\
Content tooling for the Prism marketing site

Extracts blog tables of contents, snapshots rendered pages as markdown, and
lints the route SEO inventory.

Project layout (paths are relative to --root and configurable):

  prism.toml               # Optional config (run 'prism gen-config')
  content/blog/*.mdx       # Blog posts
  app/**/page.tsx          # Routes scanned by seo-inventory
  seo/inventory.csv        # Written by seo-inventory, checked by seo-lint
  app/sitemap.ts           # NOINDEX_ROUTES / NOINDEX_PREFIXES
  app/robots.ts            # disallow: [...] rules

Set RUST_LOG=debug for diagnostic logging.")]
#[command(version = version_string())]
struct Cli {
    /// Project root containing prism.toml, seo/, and app/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the table of contents of one MDX or markdown file
    Toc {
        file: PathBuf,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Print the table of contents of every post under a directory
    BlogToc {
        dir: PathBuf,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Convert a rendered HTML page to markdown
    PageMarkdown {
        html_file: PathBuf,
        /// URL relative links resolve against (wins over everything else)
        #[arg(long)]
        base_url: Option<String>,
        /// Address the page was loaded from
        #[arg(long)]
        location: Option<String>,
    },
    /// Scan app/ pages and blog posts into the SEO inventory CSV
    SeoInventory,
    /// Check the SEO inventory against title rules and sitemap/robots exclusions
    SeoLint,
    /// Print the metadata a route would get for a title stem and description
    SeoTitle {
        stem: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "/")]
        path: String,
        /// Mark the route noindex/nofollow
        #[arg(long)]
        noindex: bool,
    },
    /// Print a stock prism.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Toc { file, format } => {
            let source = std::fs::read_to_string(&file)?;
            let items = toc::get_mdx_toc(content::strip_front_matter(&source));
            if format.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                output::print_toc(&items);
            }
        }
        Command::BlogToc { dir, format } => {
            let config = config::load_config(&cli.root)?;
            let posts = content::collect_blog_tocs(&dir, &config)?;
            if format.json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
            } else {
                output::print_blog_tocs(&posts);
            }
        }
        Command::PageMarkdown {
            html_file,
            base_url,
            location,
        } => {
            let config = config::load_config(&cli.root)?;
            let html = std::fs::read_to_string(&html_file)?;
            let options = PageMarkdownOptions { base_url, location };
            print!("{}", build_page_markdown_with(&html, &options, &config.site));
        }
        Command::SeoInventory => {
            let config = config::load_config(&cli.root)?;
            let paths = InventoryPaths::from_config(&cli.root, &config);
            let routes = generate_inventory(&paths, &config)?;
            println!(
                "{}",
                output::format_inventory_written(&config.seo.inventory, routes)
            );
        }
        Command::SeoLint => {
            let config = config::load_config(&cli.root)?;
            let paths = LintPaths::from_config(&cli.root, &config);
            let report = match lint(&paths, &config) {
                Ok(report) => report,
                Err(err @ SeoError::MissingInventory(_)) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            };
            output::print_lint_report(&report);
            if !report.passed() {
                std::process::exit(1);
            }
        }
        Command::SeoTitle {
            stem,
            description,
            path,
            noindex,
        } => {
            let config = config::load_config(&cli.root)?;
            let mut input = RouteSeoInput::new(stem, description, path);
            input.index = !noindex;
            let metadata = build_route_metadata(&input, &config);
            println!("{}", serde_json::to_string_pretty(&metadata)?);

            let rules = SeoRules::from_config(&config);
            let checks = [
                ("title", &metadata.title.absolute, SeoField::Title),
                ("description", &metadata.description, SeoField::Description),
            ];
            for (name, value, field) in checks {
                for issue in rules.compute_issue_flags(value, field) {
                    eprintln!("warning: {name} {issue}");
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
