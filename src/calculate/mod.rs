//! Rollup calculation engine.
//!
//! Runs the stages in order, each over the previous stage's output:
//! - Record filtering (date, earnings, players)
//! - Metadata join on game title
//! - Game-year then genre-year aggregation
//! - Per-tournament ratio metrics
//! - Competition ranking within each year
//! - Rounding, ordering and rank cutoff

pub mod aggregate;
pub mod derive;
pub mod filter;
pub mod format;
pub mod join;
pub mod rank;

pub use aggregate::{aggregate_game_years, aggregate_genre_years};
pub use derive::{derive_metrics, safe_ratio};
pub use filter::{filter_records, qualifies};
pub use format::{format_rows, round_to};
pub use join::{join_metadata, MetadataIndex};
pub use rank::{competition_ranks, rank_within_years};

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::models::{GameMetadata, PipelineStats, RollupOutput, SourceRecord};

/// Run the full rollup over tournament records and title metadata.
pub fn run_pipeline(
    records: &[SourceRecord],
    metadata: &[GameMetadata],
    config: &PipelineConfig,
) -> RollupOutput {
    let mut stats = PipelineStats {
        records_in: records.len(),
        ..Default::default()
    };

    let filtered = filter_records(records, config.min_date);
    stats.filtered_out = records.len() - filtered.len();
    debug!(
        "Filter kept {} of {} records (min date {})",
        filtered.len(),
        records.len(),
        config.min_date
    );

    let index = MetadataIndex::build(metadata);
    stats.duplicate_metadata = index.duplicates();

    let enriched = join_metadata(&filtered, &index);
    stats.enriched = enriched.len();
    stats.unmatched = filtered.len() - enriched.len();
    debug!(
        "Join enriched {} records ({} without genre, {} metadata titles)",
        enriched.len(),
        stats.unmatched,
        index.len()
    );

    let (game_years, genre_years) = if config.parallel {
        aggregate::aggregate_partitioned(&enriched)
    } else {
        aggregate::aggregate_sequential(&enriched)
    };
    stats.game_years = game_years.len();
    stats.genre_years = genre_years.len();
    debug!(
        "Aggregated {} game-years into {} genre-years (parallel: {})",
        game_years.len(),
        genre_years.len(),
        config.parallel
    );

    let derived = derive::derive_all(genre_years);
    let ranked = rank_within_years(derived);
    let rows = format_rows(
        ranked,
        config.top_n,
        config.decimal_places,
        config.rounding,
    );
    stats.rows_out = rows.len();

    info!(
        "Rollup produced {} rows from {} records ({} genre-years)",
        stats.rows_out, stats.records_in, stats.genre_years
    );

    RollupOutput { rows, stats }
}
