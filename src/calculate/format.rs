//! Final projection: rounding, ordering and the per-year rank cutoff.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RoundingMode;
use crate::models::{GenreRollupRow, RankedRow};

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

/// Round to `places` decimals in decimal arithmetic.
///
/// The result is parsed back from the decimal string, so it is the closest
/// f64 to the rounded value. Values outside the decimal range (and
/// NaN/infinity) are returned as is.
pub fn round_to(value: f64, places: u32, mode: RoundingMode) -> f64 {
    if !value.is_finite() {
        return value;
    }

    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(places, mode.strategy()))
        .and_then(|d| d.to_string().parse::<f64>().ok())
        .unwrap_or(value)
}

/// Project a ranked row to its export shape.
pub fn project(ranked: RankedRow, places: u32, mode: RoundingMode) -> GenreRollupRow {
    let round = |v: f64| round_to(v, places, mode);
    let RankedRow { row, rank_in_year } = ranked;
    let agg = row.aggregate;

    GenreRollupRow {
        year: agg.key.year,
        genre: agg.key.genre,
        rank_in_year,
        top_game: agg.top_game,
        top_game_earnings: round(agg.top_game_earnings),
        total_yearly_earnings: round(agg.total_yearly_earnings),
        total_players: agg.total_players,
        total_tournaments: agg.total_tournaments,
        game_count: agg.game_count,
        avg_earnings_per_player: round(agg.avg_earnings_per_player),
        avg_tournament_size: round(row.avg_tournament_size),
        earnings_per_tournament: round(row.earnings_per_tournament),
        avg_offline_percentage: agg.avg_offline_percentage.map(round),
    }
}

/// Keep ranks up to `top_n`, round, and order by year desc then rank asc.
pub fn format_rows(
    ranked: Vec<RankedRow>,
    top_n: u32,
    places: u32,
    mode: RoundingMode,
) -> Vec<GenreRollupRow> {
    let mut rows: Vec<GenreRollupRow> = ranked
        .into_iter()
        .filter(|r| r.rank_in_year <= top_n)
        .map(|r| project(r, places, mode))
        .collect();

    rows.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| a.rank_in_year.cmp(&b.rank_in_year))
            .then_with(|| a.genre.cmp(&b.genre))
    });

    rows
}
