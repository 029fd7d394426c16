use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esports_rollup::config::AppConfig;
use esports_rollup::ingest::{load_metadata, load_records};
use esports_rollup::models::RollupOutput;
use esports_rollup::parse_date;
use esports_rollup::run_pipeline;
use esports_rollup::storage::{write_jsonl, JsonlWriter, ParquetExporter};

#[derive(Parser)]
#[command(name = "esports-rollup")]
#[command(about = "Yearly per-genre esports earnings rollups")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./rollup.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the ranked genre rollup
    Run {
        /// Tournament records (JSONL)
        #[arg(long)]
        records: PathBuf,

        /// Game metadata (JSONL)
        #[arg(long)]
        metadata: PathBuf,

        /// Write rows as JSONL to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write rows to a Parquet file
        #[arg(long)]
        parquet: Option<PathBuf>,

        /// Highest rank kept per year
        #[arg(long)]
        top_n: Option<u32>,

        /// Drop records dated before this day (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Aggregate genre-year partitions in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Load and validate inputs without running the rollup
    Check {
        /// Tournament records (JSONL)
        #[arg(long)]
        records: PathBuf,

        /// Game metadata (JSONL)
        #[arg(long)]
        metadata: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {:?}", cli.config))?;

    // Initialize tracing
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }

    tracing::info!("Starting esports-rollup v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run {
            records,
            metadata,
            output,
            parquet,
            top_n,
            since,
            parallel,
        } => {
            if let Some(n) = top_n {
                config.pipeline.top_n = n;
            }
            if let Some(s) = since {
                config.pipeline.min_date = parse_date(&s)
                    .with_context(|| format!("Invalid --since date (expected YYYY-MM-DD): {}", s))?;
            }
            if parallel {
                config.pipeline.parallel = true;
            }
            config.validate()?;

            let loaded = load_records(&records)?;
            let games = load_metadata(&metadata)?;

            let result = run_pipeline(&loaded.records, &games, &config.pipeline);

            match &output {
                Some(path) => {
                    JsonlWriter::new(path).write_all(&result.rows)?;
                }
                None => {
                    write_jsonl(io::stdout().lock(), &result.rows)?;
                }
            }

            if let Some(path) = &parquet {
                ParquetExporter::new(path).write_rows(&result.rows)?;
            }

            print_summary(&result, loaded.incomplete);
        }
        Commands::Check { records, metadata } => {
            let loaded = load_records(&records)?;
            let games = load_metadata(&metadata)?;
            let with_genre = games.iter().filter(|g| g.genre.is_some()).count();

            eprintln!("\n=== Input Check ===");
            eprintln!("Records:          {}", loaded.records.len());
            eprintln!("Incomplete rows:  {}", loaded.incomplete);
            eprintln!("Metadata rows:    {}", games.len());
            eprintln!("With genre:       {}", with_genre);
        }
    }

    Ok(())
}

/// Summary goes to stderr so stdout stays valid JSONL.
fn print_summary(result: &RollupOutput, incomplete: usize) {
    let stats = &result.stats;

    eprintln!("\n=== Rollup Results ===");
    eprintln!("Incomplete rows:  {}", incomplete);
    eprintln!("Records in:       {}", stats.records_in);
    eprintln!("Filtered out:     {}", stats.filtered_out);
    eprintln!("Without genre:    {}", stats.unmatched);
    eprintln!("Duplicate titles: {}", stats.duplicate_metadata);
    eprintln!("Game-years:       {}", stats.game_years);
    eprintln!("Genre-years:      {}", stats.genre_years);
    eprintln!("Rows written:     {}", stats.rows_out);

    for year in result.years() {
        let leaders: Vec<String> = result
            .for_year(year)
            .iter()
            .map(|r| format!("#{} {}", r.rank_in_year, r.genre))
            .collect();
        eprintln!("  {}: {}", year, leaders.join(", "));
    }
}
