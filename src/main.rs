//! Kansou-Harvest main entry point
//!
//! This is the command-line interface for the Kansou-Harvest review
//! harvester.

use clap::{Parser, Subcommand};
use kansou_harvest::config::load_config;
use kansou_harvest::harvest::{run_products, run_reviews, HarvestReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kansou-Harvest: an incremental e-commerce review harvester
///
/// Kansou-Harvest walks a paginated product catalog and its review
/// threads, extracting normalized CSV rows batch by batch with bounded
/// concurrency and bounded retry.
#[derive(Parser, Debug)]
#[command(name = "kansou-harvest")]
#[command(version = "1.0.0")]
#[command(about = "An incremental e-commerce review harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    pipeline: Pipeline,
}

#[derive(Subcommand, Debug)]
enum Pipeline {
    /// Harvest catalog listing pages into the product and seed tables
    Products,

    /// Harvest seeded review threads into the review table
    Reviews,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.pipeline);
        return Ok(());
    }

    let report = match cli.pipeline {
        Pipeline::Products => handle_run("products", run_products(&config).await)?,
        Pipeline::Reviews => handle_run("reviews", run_reviews(&config).await)?,
    };

    print_report(&report);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kansou_harvest=info,warn"),
            1 => EnvFilter::new("kansou_harvest=debug,info"),
            2 => EnvFilter::new("kansou_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &kansou_harvest::config::Config, pipeline: &Pipeline) {
    println!("=== Kansou-Harvest Dry Run ===\n");

    println!("Catalog:");
    println!("  Root URL: {}", config.catalog.root_url);
    println!("  Review page size: {}", config.catalog.page_size);

    println!("\nHarvester:");
    println!("  Batch size: {}", config.harvester.batch_size);
    println!("  Workers: {}", config.harvester.workers);
    println!("  Retry limit: {}", config.harvester.retry_limit);
    println!("  Retry delay: {}s", config.harvester.retry_delay_secs);

    println!("\nOutput:");
    println!("  Products: {}", config.output.products_path);
    println!("  Seeds: {}", config.output.seeds_path);
    println!("  Reviews: {}", config.output.reviews_path);
    println!("  Dump dir: {}", config.output.dump_dir);

    println!("\n✓ Configuration is valid");
    match pipeline {
        Pipeline::Products => println!(
            "✓ Would enumerate listing pages under {} and append to {}",
            config.catalog.root_url, config.output.products_path
        ),
        Pipeline::Reviews => println!(
            "✓ Would harvest threads seeded by {} and append to {}",
            config.output.seeds_path, config.output.reviews_path
        ),
    }
}

fn handle_run(
    pipeline: &str,
    result: kansou_harvest::Result<HarvestReport>,
) -> Result<HarvestReport, Box<dyn std::error::Error>> {
    match result {
        Ok(report) => {
            tracing::info!("{} run completed successfully", pipeline);
            Ok(report)
        }
        Err(e) => {
            tracing::error!("{} run failed: {}", pipeline, e);
            Err(e.into())
        }
    }
}

fn print_report(report: &HarvestReport) {
    println!("\n=== Harvest Report ===");
    println!("Started: {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Duration: {:.1?}", report.duration);
    println!("Units: {}", report.stats.units_total);
    println!("  Succeeded: {}", report.stats.units_succeeded);
    println!("  Degraded: {}", report.stats.units_degraded);
    println!("Records appended: {}", report.stats.records_appended);
    println!("Batches flushed: {}", report.stats.batches_flushed);
}
