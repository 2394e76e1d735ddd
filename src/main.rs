mod config;
mod db;
mod entities;
mod error;
mod import;
mod models;
mod report;
mod transform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "moviedb", about = "Loads the IMDB csv dumps into SQLite and reports on them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure the schema exists and import all six csv datasets
    Import {
        /// Directory containing the IMDB-*.csv files (default: DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Run the report queries against a populated store
    Report {
        /// Directory to write the report files into (default: REPORT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,moviedb=debug,sqlx=warn".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Schema failures are the one fatal error class; everything past this
    // point degrades per dataset or per row instead of aborting.
    let db = db::connect_and_migrate(&config.database_url).await?;

    match cli.command {
        Commands::Import { data_dir } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let outcomes = import::run(&db, &data_dir).await;

            let imported = outcomes.iter().filter(|o| o.result.is_ok()).count();
            let inserted: u64 = outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().ok())
                .map(|stats| stats.inserted)
                .sum();
            info!(
                datasets = outcomes.len(),
                imported = imported,
                rows_inserted = inserted,
                "import run complete"
            );

            for (relation, total) in import::relation_totals(&db).await? {
                info!(relation = relation, rows = total, "store total");
            }
        },
        Commands::Report { out_dir } => {
            let out_dir = out_dir.unwrap_or(config.report_dir);
            report::write_all(&db, &out_dir).await?;
            info!(out_dir = %out_dir.display(), "reports complete");
        },
    }

    Ok(())
}
