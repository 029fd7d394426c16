//! Per-tournament ratio metrics.

use crate::models::{DerivedRow, GenreYearAggregate};

/// `numerator / denominator`, or 0 when there is nothing to divide by.
pub fn safe_ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

pub fn derive_metrics(aggregate: GenreYearAggregate) -> DerivedRow {
    let avg_tournament_size = safe_ratio(
        aggregate.total_players as f64,
        aggregate.total_tournaments,
    );
    let earnings_per_tournament =
        safe_ratio(aggregate.total_yearly_earnings, aggregate.total_tournaments);

    DerivedRow {
        aggregate,
        avg_tournament_size,
        earnings_per_tournament,
    }
}

pub fn derive_all(aggregates: Vec<GenreYearAggregate>) -> Vec<DerivedRow> {
    aggregates.into_iter().map(derive_metrics).collect()
}
