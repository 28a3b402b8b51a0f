//! News crawler CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use news_crawler::{
    config::load_settings,
    error::{AppError, Result},
    pipeline::{self, CrawlOrchestrator, OutletRegistry},
    storage::LocalStorage,
};

/// Korean news keyword crawler
#[derive(Parser, Debug)]
#[command(
    name = "news-crawler",
    version,
    about = "Searches Korean news outlets for keywords and saves the articles"
)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, env = "CRAWLER_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl outlets for the given keywords
    Crawl {
        /// Search keywords
        #[arg(short, long, num_args = 1.., required = true)]
        keywords: Vec<String>,

        /// Outlets to crawl (default: all)
        #[arg(short = 'c', long = "outlets", num_args = 1.., value_parser = parse_outlet)]
        outlets: Vec<String>,

        /// Search pages per keyword
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_pages: Option<u32>,

        /// Directory for the report file
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// List registered outlets
    Outlets,

    /// Validate settings
    Validate,
}

fn parse_outlet(value: &str) -> std::result::Result<String, String> {
    let registry = OutletRegistry::standard();
    if registry.contains(value) {
        Ok(value.to_string())
    } else {
        Err(format!(
            "unknown outlet (possible values: {})",
            registry.list_outlets().join(", ")
        ))
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            keywords,
            outlets,
            max_pages,
            output_dir,
        } => {
            if let Some(max_pages) = max_pages {
                settings.crawler.max_pages = max_pages;
            }
            if let Some(output_dir) = output_dir {
                settings.output.output_dir = output_dir.to_string_lossy().into_owned();
            }
            settings.validate()?;

            let storage = LocalStorage::new(&settings.output.output_dir);
            let orchestrator = CrawlOrchestrator::new(settings);
            let outlets = (!outlets.is_empty()).then_some(outlets.as_slice());

            let summary = pipeline::run_crawler(&orchestrator, &storage, &keywords, outlets).await?;

            println!(
                "Crawl complete: {} articles, {} errors",
                summary.total_articles, summary.total_errors
            );
            println!("Report: {}", summary.report_path.display());
        }

        Command::Outlets => {
            let registry = OutletRegistry::standard();
            for id in registry.list_outlets() {
                let kind = registry
                    .get(id)
                    .map(|d| d.kind())
                    .ok_or_else(|| AppError::configuration(format!("unknown outlet '{id}'")))?;
                println!("{id:<12} {kind}");
            }
        }

        Command::Validate => {
            log::info!("Validating settings...");
            settings.validate()?;
            log::info!("✓ Settings OK");
            log::info!(
                "max_pages={}, request_delay={}s, timeout={}s, headless={}, output_dir={}",
                settings.crawler.max_pages,
                settings.crawler.request_delay_secs,
                settings.crawler.request_timeout_secs,
                settings.browser.headless,
                settings.output.output_dir
            );
        }
    }

    Ok(())
}
