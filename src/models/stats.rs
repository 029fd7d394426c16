//! Output rollup rows and per-run statistics.

use serde::{Deserialize, Serialize};

/// One ranked genre for one year, shaped for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenreRollupRow {
    pub year: i32,
    pub genre: String,

    /// Competition rank within the year (1 = highest earnings)
    pub rank_in_year: u32,

    /// Highest-earning game of the genre in that year
    pub top_game: String,
    pub top_game_earnings: f64,

    pub total_yearly_earnings: f64,
    pub total_players: u64,
    pub total_tournaments: u64,

    /// Distinct games contributing to the genre
    pub game_count: u32,

    pub avg_earnings_per_player: f64,
    pub avg_tournament_size: f64,
    pub earnings_per_tournament: f64,

    /// `null` when no contributing title carried an offline percentage
    pub avg_offline_percentage: Option<f64>,
}

/// Row counts observed at each stage of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Source records handed to the pipeline
    pub records_in: usize,

    /// Records failing the date/earnings/players predicates
    pub filtered_out: usize,

    /// Records with no metadata row or no genre
    pub unmatched: usize,

    /// Records surviving the join
    pub enriched: usize,

    /// Metadata rows ignored because an earlier row had the same game
    pub duplicate_metadata: usize,

    /// Distinct (genre, year, game) groups
    pub game_years: usize,

    /// Distinct (genre, year) groups
    pub genre_years: usize,

    /// Rows emitted after the rank cutoff
    pub rows_out: usize,
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollupOutput {
    pub rows: Vec<GenreRollupRow>,
    pub stats: PipelineStats,
}

impl RollupOutput {
    /// Rows for a single year, in rank order.
    pub fn for_year(&self, year: i32) -> Vec<&GenreRollupRow> {
        self.rows.iter().filter(|r| r.year == year).collect()
    }

    /// Distinct years present, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.dedup();
        years
    }

    /// Look up a genre in a year (case insensitive).
    pub fn get_genre(&self, year: i32, genre: &str) -> Option<&GenreRollupRow> {
        self.rows
            .iter()
            .find(|r| r.year == year && r.genre.eq_ignore_ascii_case(genre))
    }
}
