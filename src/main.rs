//! Letterboxd Catalog main entry point
//!
//! This is the command-line interface for resolving Letterboxd catalogs.

use clap::Parser;
use letterboxd_catalog::config::{load_config_with_hash, Config};
use letterboxd_catalog::{CatalogResolver, CatalogType, FilmSlug, RecordStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Letterboxd Catalog: resolves a Letterboxd list into film metadata
///
/// Scrapes the configured list, resolves poster, name, IMDb id and genres of
/// every film, and prints the records as JSON. Resolved films are cached on disk
/// so repeated runs only scrape films that are new to the list.
#[derive(Parser, Debug)]
#[command(name = "letterboxd-catalog")]
#[command(version)]
#[command(about = "Resolves Letterboxd lists into film metadata", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Catalog to resolve: top, popular or new
    #[arg(short, long, default_value = "top")]
    catalog: CatalogType,

    /// Resolve a single film by slug instead of a whole catalog
    #[arg(long, value_name = "SLUG", conflicts_with = "catalog")]
    film: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be resolved without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "clear_cache"])]
    dry_run: bool,

    /// Show record cache statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "clear_cache"])]
    stats: bool,

    /// Remove every cached film record and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    clear_cache: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.catalog);
        return Ok(());
    }

    let resolver = CatalogResolver::open(config)?;

    let result = if cli.stats {
        handle_stats(&resolver)
    } else if cli.clear_cache {
        handle_clear_cache(&resolver)
    } else if let Some(slug) = cli.film {
        handle_film(&resolver, FilmSlug::from(slug)).await
    } else {
        handle_catalog(&resolver, cli.catalog).await
    };

    resolver.shutdown()?;
    result
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the JSON output.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("letterboxd_catalog=info,warn"),
            1 => EnvFilter::new("letterboxd_catalog=debug,info"),
            2 => EnvFilter::new("letterboxd_catalog=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the first list page
fn handle_dry_run(config: &Config, catalog: CatalogType) {
    eprintln!("=== Letterboxd Catalog Dry Run ===\n");

    eprintln!("Site:");
    eprintln!("  Base URL: {}", config.site.base_url);
    eprintln!("  List path: {}", config.site.list_path);
    eprintln!(
        "  First page ({}): {}{}{}page/1/",
        catalog,
        config.site.base_url.trim_end_matches('/'),
        config.site.list_path,
        catalog.filter_path()
    );

    eprintln!("\nHTTP:");
    eprintln!("  Timeout: {}s", config.http.timeout_secs);
    eprintln!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    eprintln!("  Max redirects: {}", config.http.max_redirects);

    eprintln!("\nCatalog:");
    eprintln!("  Max pages: {}", config.catalog.max_pages);
    eprintln!(
        "  Max concurrent films: {}",
        config.catalog.max_concurrent_films
    );
    eprintln!("  Slug list TTL: {}s", config.catalog.slug_ttl_secs);
    eprintln!("  Failure policy: {:?}", config.catalog.failure_policy);

    eprintln!("\nRecord cache:");
    eprintln!("  Database: {}", config.cache.database_path);
    match config.cache.record_max_age_hours {
        Some(hours) => eprintln!("  Max record age: {}h", hours),
        None => eprintln!("  Max record age: unlimited"),
    }

    eprintln!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows record cache statistics
fn handle_stats(resolver: &CatalogResolver) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolver.config();
    println!("Database: {}", config.cache.database_path);
    println!("Cached films: {}", resolver.records().len()?);
    Ok(())
}

/// Handles the --clear-cache mode: drops every cached record
fn handle_clear_cache(resolver: &CatalogResolver) -> Result<(), Box<dyn std::error::Error>> {
    let removed = resolver.records().clear()?;
    tracing::info!("Removed {} cached films", removed);
    println!("✓ Removed {} cached films", removed);
    Ok(())
}

/// Resolves a single film and prints it as JSON
async fn handle_film(
    resolver: &CatalogResolver,
    slug: FilmSlug,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = resolver.resolve_film(&slug).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Resolves a catalog and prints its records as a JSON array
async fn handle_catalog(
    resolver: &CatalogResolver,
    catalog: CatalogType,
) -> Result<(), Box<dyn std::error::Error>> {
    match resolver.resolve_catalog(catalog).await {
        Ok(records) => {
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Resolving {} catalog failed: {}", catalog, e);
            Err(e.into())
        }
    }
}
