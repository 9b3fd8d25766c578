//! Catalog-Ripple main entry point
//!
//! This is the command-line interface for the Catalog-Ripple catalog harvester.

use anyhow::Context;
use catalog_ripple::config::{load_config_with_hash, parse_summary_path, validate, Config};
use catalog_ripple::crawler::{collect_products, harvest_menu, HttpFetcher};
use catalog_ripple::output::{load_categories, save_menu_workbook, ProductOutput};
use catalog_ripple::RippleError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Which stages of the pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Fetch the navigation menu and write the menu workbook
    Menu,
    /// Collect products for the categories in an existing menu workbook
    Products,
    /// Menu, then products
    All,
}

/// Catalog-Ripple: a retailer catalog harvester
///
/// Catalog-Ripple walks the retailer's category menu into a leveled workbook,
/// then pages through the product catalog for one level of that menu and
/// writes the products, per-category and per-brand summaries, and a
/// markdown digest.
#[derive(Parser, Debug)]
#[command(name = "catalog-ripple")]
#[command(version = "1.0.0")]
#[command(about = "Menu extraction and product scraping for a retailer catalog", long_about = None)]
struct Cli {
    /// Pipeline stages to run
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Optional TOML configuration file; flags override its values
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Menu workbook (.xlsx, or .csv for a single flat table)
    #[arg(long)]
    menu_file: Option<PathBuf>,

    /// Product output (.xlsx or .csv)
    #[arg(long)]
    products_file: Option<PathBuf>,

    /// Markdown digest path; "none" disables it
    #[arg(long)]
    summary_markdown: Option<String>,

    /// Menu level whose categories are collected
    #[arg(long)]
    level: Option<u32>,

    /// Maximum categories to collect (0 = unlimited)
    #[arg(long)]
    max_categories: Option<usize>,

    /// Maximum products across the run (0 = unlimited)
    #[arg(long)]
    max_products: Option<usize>,

    /// Maximum catalog pages per category (0 = unlimited)
    #[arg(long)]
    max_pages_per_category: Option<u32>,

    /// Products requested per catalog page
    #[arg(long)]
    page_size: Option<u32>,

    /// Pause between catalog page requests, in seconds
    #[arg(long)]
    delay_seconds: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Retries for transient HTTP failures
    #[arg(long)]
    retries: Option<u32>,

    /// Exponential backoff base, in seconds
    #[arg(long)]
    backoff_factor: Option<f64>,

    /// Write a progress file every N products (0 disables)
    #[arg(long)]
    save_interval: Option<usize>,

    /// Log level for this crate (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.log_level, cli.quiet);

    let (config, config_hash) = resolve_config(&cli)?;

    let fetcher = HttpFetcher::new(&config.http).context("Failed to build HTTP client")?;

    if matches!(cli.mode, Mode::Menu | Mode::All) {
        handle_menu(&fetcher, &config).await?;
    }
    if matches!(cli.mode, Mode::Products | Mode::All) {
        handle_products(&fetcher, &config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber from the requested level
fn setup_logging(level: &str, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        EnvFilter::new(format!("catalog_ripple={},warn", level.to_lowercase()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and layers command-line flags on top
fn resolve_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(path) = &cli.menu_file {
        config.output.menu_file = path.clone();
    }
    if let Some(path) = &cli.products_file {
        config.output.products_file = path.clone();
    }
    if let Some(raw) = &cli.summary_markdown {
        config.output.summary_markdown = parse_summary_path(raw);
    }

    let collection = &mut config.collection;
    if let Some(level) = cli.level {
        collection.level = level;
    }
    if cli.max_categories.is_some() {
        collection.max_categories = cli.max_categories;
    }
    if cli.max_products.is_some() {
        collection.max_products = cli.max_products;
    }
    if cli.max_pages_per_category.is_some() {
        collection.max_pages_per_category = cli.max_pages_per_category;
    }
    if let Some(page_size) = cli.page_size {
        collection.page_size = page_size;
    }
    if let Some(delay) = cli.delay_seconds {
        collection.delay_seconds = delay;
    }
    if let Some(interval) = cli.save_interval {
        collection.save_interval = interval;
    }
    collection.normalize_limits();

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(retries) = cli.retries {
        config.http.retries = retries;
    }
    if let Some(factor) = cli.backoff_factor {
        config.http.backoff_factor = factor;
    }

    validate(&config).context("Invalid settings")?;
    Ok((config, config_hash))
}

/// Handles menu mode: fetch, flatten and save the menu workbook
async fn handle_menu(fetcher: &HttpFetcher, config: &Config) -> anyhow::Result<()> {
    let rows = harvest_menu(fetcher, &config.endpoints).await?;
    save_menu_workbook(&rows, &config.output.menu_file)
        .with_context(|| format!("Failed to write {}", config.output.menu_file.display()))?;
    Ok(())
}

/// Handles products mode: load categories, collect, write output
async fn handle_products(
    fetcher: &HttpFetcher,
    config: &Config,
    config_hash: Option<String>,
) -> anyhow::Result<()> {
    let collection = &config.collection;
    let categories = load_categories(
        &config.output.menu_file,
        collection.level,
        collection.max_categories,
    )?;
    if categories.is_empty() {
        return Err(RippleError::NoCategories.into());
    }
    tracing::info!(
        "Loaded {} level-{} categories from {}",
        categories.len(),
        collection.level,
        config.output.menu_file.display()
    );

    let output = ProductOutput::new(
        &config.output.products_file,
        config.output.summary_markdown.clone(),
    )
    .with_config_hash(config_hash);

    let report = collect_products(fetcher, config, &categories, &output).await?;

    if !report.failed_categories.is_empty() {
        tracing::warn!("Failed categories: {}", report.failed_categories.join(", "));
    }
    Ok(())
}
