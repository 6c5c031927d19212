//! # sitemeta CLI
//!
//! Crawls the tool homepages listed in the site list, prints what was found
//! and writes the results file. With `--save` the results are also upserted
//! into the catalog database.
//!
//! Enrichment runs when `GEMINI_API_KEY` is set (a `.env` file is honored)
//! and `--no-ai` is not given.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sitemeta::catalog::Database;
use sitemeta::crawler::storage::{DEFAULT_RESULTS_FILE, Storage, StorageConfig};
use sitemeta::crawler::{CrawlerConfig, Fetcher};
use sitemeta::enrich::{Enricher, EnricherConfig};
use sitemeta::model::{self, DEFAULT_COMPLETION_MODEL};
use sitemeta::pipeline::{crawl_all, enrich_all, format_summary};
use sitemeta::sites::{DEFAULT_SITES_FILE, load_sites};
use sitemeta::telemetry;
use sitemeta::upsert::upsert_all;
use tracing::{error, info, instrument};

#[derive(Parser, Debug)]
#[command(author, version, about = "Collect homepage metadata for the tool catalog", long_about = None)]
struct Cli {
    /// Write the results into the catalog database
    #[arg(long)]
    save: bool,

    /// Skip AI summaries
    #[arg(long)]
    no_ai: bool,

    /// Site list to crawl
    #[arg(long, default_value = DEFAULT_SITES_FILE)]
    sites: PathBuf,

    /// Results file written after every run
    #[arg(short, long, default_value = DEFAULT_RESULTS_FILE)]
    output: PathBuf,

    /// Catalog database used with --save
    #[arg(long, default_value = "catalog.db")]
    database: String,

    /// Completion model for summaries
    #[arg(short, long, default_value = DEFAULT_COMPLETION_MODEL)]
    model: String,

    /// Also write logs to a file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_dir.as_deref(), "sitemeta.log")?;

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

#[instrument(skip(cli))]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let sites = load_sites(&cli.sites)
        .await
        .with_context(|| format!("Failed to load site list {}", cli.sites.display()))?;
    println!("Crawling {} sites...\n", sites.len());

    let crawler_config = CrawlerConfig::default();
    let fetcher = Fetcher::new(&crawler_config)?;
    let mut records = crawl_all(&fetcher, &sites, crawler_config.rate_limit()).await;

    let completion_model = if cli.no_ai {
        None
    } else {
        model::gemini_from_env(&cli.model)
    };
    if completion_model.is_none() && !cli.no_ai {
        println!("\n{} not set, skipping AI summaries", model::GEMINI_API_KEY_VAR);
    }
    let enricher = Enricher::new(completion_model, EnricherConfig::default());
    if enricher.is_enabled() {
        println!("\nGenerating summaries with {}...", cli.model);
        enrich_all(&enricher, &mut records).await;
    }

    println!();
    for record in &records {
        println!("{}\n", format_summary(record));
    }

    let succeeded = records.iter().filter(|r| r.info.is_success()).count();
    println!("Fetched {}/{} sites", succeeded, records.len());

    let storage = Storage::with_config(StorageConfig { path: cli.output });
    storage
        .write(&records)
        .await
        .with_context(|| format!("Failed to write {}", storage.path().display()))?;
    println!("Results written to {}", storage.path().display());

    if !cli.save {
        println!("\nPreview only. Run with --save to write to the catalog.");
        return Ok(());
    }

    info!("Opening catalog at {}", cli.database);
    let db = Database::new_from_path(&cli.database).await?;
    println!("\nSaving to catalog {}...", cli.database);
    let report = upsert_all(&db, &records).await?;
    println!(
        "\nDone: {} created, {} updated, {} failed",
        report.created(),
        report.updated(),
        report.failed()
    );

    Ok(())
}
