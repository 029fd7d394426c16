//! Intermediate rollup rows produced between pipeline stages.

use serde::{Deserialize, Serialize};

use super::{GameYearKey, GenreYearKey};

/// Running arithmetic mean that skips absent values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: u64,
}

impl Mean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn push_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.push(v);
        }
    }

    /// Mean of the pushed values; `None` when nothing was pushed.
    pub fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Per (genre, year, game) totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameYearAggregate {
    pub key: GameYearKey,

    /// Sum of record earnings
    pub total_earnings: f64,

    /// Sum of record players
    pub total_players: u64,

    /// Sum of record tournaments
    pub total_tournaments: u64,

    /// Mean of per-record earnings per player (not total earnings / total players)
    pub avg_earnings_per_player: f64,

    /// Mean of per-record offline percentage
    pub avg_offline_percentage: Option<f64>,
}

/// Per (genre, year) totals with the highest-earning game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreYearAggregate {
    pub key: GenreYearKey,
    pub total_yearly_earnings: f64,
    pub total_players: u64,
    pub total_tournaments: u64,

    /// Distinct games in the group
    pub game_count: u32,

    /// Mean of the member games' means, unweighted by record count
    pub avg_earnings_per_player: f64,

    /// Mean of the member games' offline means
    pub avg_offline_percentage: Option<f64>,

    pub top_game: String,
    pub top_game_earnings: f64,
}

/// A genre-year with its ratio metrics, not yet ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub aggregate: GenreYearAggregate,

    /// Players per tournament (0 when there were no tournaments)
    pub avg_tournament_size: f64,

    /// Earnings per tournament (0 when there were no tournaments)
    pub earnings_per_tournament: f64,
}

impl DerivedRow {
    pub fn year(&self) -> i32 {
        self.aggregate.key.year
    }

    pub fn genre(&self) -> &str {
        &self.aggregate.key.genre
    }

    pub fn total_yearly_earnings(&self) -> f64 {
        self.aggregate.total_yearly_earnings
    }
}

/// A derived row with its competition rank inside its year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub row: DerivedRow,
    pub rank_in_year: u32,
}
