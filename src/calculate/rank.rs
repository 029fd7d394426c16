//! Competition ranking of genres within each year.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{DerivedRow, RankedRow};

/// Standard competition ranks for values already sorted best-first.
///
/// Equal values share a rank and the next distinct value skips ahead:
/// `[500, 500, 300, 100]` ranks as `[1, 1, 3, 4]`.
pub fn competition_ranks(sorted_values: &[f64]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_values.len());
    let mut current = 0u32;

    for (i, value) in sorted_values.iter().enumerate() {
        let tied = i > 0 && value.total_cmp(&sorted_values[i - 1]) == Ordering::Equal;
        if !tied {
            current = i as u32 + 1;
        }
        ranks.push(current);
    }

    ranks
}

/// Highest earnings first, genre name ascending among equals.
fn compare_in_year(a: &DerivedRow, b: &DerivedRow) -> Ordering {
    b.total_yearly_earnings()
        .total_cmp(&a.total_yearly_earnings())
        .then_with(|| a.genre().cmp(b.genre()))
}

/// Rank every row against the other rows of its year.
///
/// Each year is fully materialized before any of its ranks are assigned.
/// Output is grouped by year, most recent first, in rank order.
pub fn rank_within_years(rows: Vec<DerivedRow>) -> Vec<RankedRow> {
    let mut partitions: BTreeMap<i32, Vec<DerivedRow>> = BTreeMap::new();
    for row in rows {
        partitions.entry(row.year()).or_default().push(row);
    }

    let mut ranked = Vec::new();
    for (_, mut partition) in partitions.into_iter().rev() {
        partition.sort_by(compare_in_year);

        let earnings: Vec<f64> = partition.iter().map(|r| r.total_yearly_earnings()).collect();
        let ranks = competition_ranks(&earnings);

        ranked.extend(
            partition
                .into_iter()
                .zip(ranks)
                .map(|(row, rank_in_year)| RankedRow { row, rank_in_year }),
        );
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenreYearAggregate, GenreYearKey};

    fn row(genre: &str, year: i32, earnings: f64) -> DerivedRow {
        DerivedRow {
            aggregate: GenreYearAggregate {
                key: GenreYearKey::new(genre, year),
                total_yearly_earnings: earnings,
                total_players: 1,
                total_tournaments: 1,
                game_count: 1,
                avg_earnings_per_player: earnings,
                avg_offline_percentage: None,
                top_game: "Alpha".to_string(),
                top_game_earnings: earnings,
            },
            avg_tournament_size: 1.0,
            earnings_per_tournament: earnings,
        }
    }

    fn summary(ranked: &[RankedRow]) -> Vec<(i32, String, u32)> {
        ranked
            .iter()
            .map(|r| (r.row.year(), r.row.genre().to_string(), r.rank_in_year))
            .collect()
    }

    #[test]
    fn test_competition_ranks() {
        assert_eq!(competition_ranks(&[500.0, 500.0, 300.0, 100.0]), vec![1, 1, 3, 4]);
        assert_eq!(competition_ranks(&[3.0, 2.0, 2.0, 2.0, 1.0]), vec![1, 2, 2, 2, 5]);
        assert_eq!(competition_ranks(&[7.0]), vec![1]);
        assert!(competition_ranks(&[]).is_empty());
    }

    #[test]
    fn test_ties_share_rank_and_next_skips() {
        let ranked = rank_within_years(vec![
            row("Strategy", 2020, 100.0),
            row("MOBA", 2020, 500.0),
            row("FPS", 2020, 500.0),
        ]);

        assert_eq!(
            summary(&ranked),
            vec![
                (2020, "FPS".to_string(), 1),
                (2020, "MOBA".to_string(), 1),
                (2020, "Strategy".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_partitions_rank_independently() {
        let ranked = rank_within_years(vec![
            row("MOBA", 2019, 10.0),
            row("MOBA", 2020, 1.0),
            row("FPS", 2020, 2.0),
            row("FPS", 2019, 20.0),
        ]);

        assert_eq!(
            summary(&ranked),
            vec![
                (2020, "FPS".to_string(), 1),
                (2020, "MOBA".to_string(), 2),
                (2019, "FPS".to_string(), 1),
                (2019, "MOBA".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_within_years(Vec::new()).is_empty());
    }
}
