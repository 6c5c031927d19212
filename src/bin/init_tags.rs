//! Seeds the catalog with the default tag set
//!
//! Tags that already exist are skipped, so this is safe to run repeatedly.
//! Run it once against a fresh catalog before `sitemeta --save`; tag keys in
//! the site list only resolve against persisted tags.

use anyhow::Context;
use clap::Parser;
use sitemeta::catalog::Database;
use sitemeta::catalog::tags::{default_tags, seed_tags};
use sitemeta::telemetry;

#[derive(Parser, Debug)]
#[command(author, version, about = "Seed the catalog with the default tags", long_about = None)]
struct Cli {
    /// Catalog database to seed
    #[arg(long, default_value = "catalog.db")]
    database: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    telemetry::init_tracing(None, "init-tags.log")?;

    let db = Database::new_from_path(&cli.database)
        .await
        .with_context(|| format!("Failed to open catalog {}", cli.database))?;

    println!("Seeding tags into {}...\n", cli.database);
    let report = seed_tags(&db, &default_tags()).await?;
    println!(
        "\nDone: {} created, {} skipped\n",
        report.created.len(),
        report.skipped.len()
    );

    println!("{:<4} {:<20} {:<12} {:<8}", "#", "KEY", "NAME", "COLOR");
    for tag in db.list_tags().await? {
        println!(
            "{:<4} {:<20} {:<12} {:<8}{}",
            tag.sort_order,
            tag.key,
            tag.name,
            tag.color.as_deref().unwrap_or("-"),
            if tag.is_active { "" } else { " (inactive)" }
        );
    }

    Ok(())
}
