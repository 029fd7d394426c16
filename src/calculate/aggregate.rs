//! Two-level rollup: records -> (genre, year, game) -> (genre, year).
//!
//! Groups are emitted in first-seen order so that a run never depends on
//! hash map iteration order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use rayon::prelude::*;

use crate::models::{EnrichedRecord, GameYearAggregate, GenreYearAggregate, GenreYearKey, Mean};

/// Bucket items by key, keeping keys in first-seen order.
fn group_in_order<K, T, I, F>(items: I, key_of: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let key = key_of(&item);
        let slot = *slots.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(item);
    }

    groups
}

/// Roll enriched records up to one row per (genre, year, game).
pub fn aggregate_game_years<'a, I>(records: I) -> Vec<GameYearAggregate>
where
    I: IntoIterator<Item = &'a EnrichedRecord>,
{
    group_in_order(records, |r| r.key())
        .into_iter()
        .map(|(key, members)| {
            let mut total_earnings = 0.0;
            let mut total_players = 0u64;
            let mut total_tournaments = 0u64;
            let mut per_player = Mean::default();
            let mut offline = Mean::default();

            for r in members {
                total_earnings += r.record.earnings;
                total_players = total_players.saturating_add(r.record.players);
                total_tournaments = total_tournaments.saturating_add(r.record.tournaments);
                per_player.push(r.earnings_per_player);
                offline.push_opt(r.percent_offline);
            }

            GameYearAggregate {
                key,
                total_earnings,
                total_players,
                total_tournaments,
                avg_earnings_per_player: per_player.value().unwrap_or(0.0),
                avg_offline_percentage: offline.value(),
            }
        })
        .collect()
}

/// Highest total earnings first; equal earnings fall back to game name.
pub fn compare_by_earnings(a: &GameYearAggregate, b: &GameYearAggregate) -> Ordering {
    b.total_earnings
        .total_cmp(&a.total_earnings)
        .then_with(|| a.key.game.cmp(&b.key.game))
        .then_with(|| a.key.cmp(&b.key))
}

/// Roll game-years up to one row per (genre, year), picking the top game.
pub fn aggregate_genre_years(game_years: &[GameYearAggregate]) -> Vec<GenreYearAggregate> {
    let mut sorted: Vec<&GameYearAggregate> = game_years.iter().collect();
    sorted.sort_by(|a, b| compare_by_earnings(a, b));

    group_in_order(sorted, |g| g.key.genre_year())
        .into_iter()
        .filter_map(|(key, members)| {
            let top = *members.first()?;

            let mut total_yearly_earnings = 0.0;
            let mut total_players = 0u64;
            let mut total_tournaments = 0u64;
            let mut per_player = Mean::default();
            let mut offline = Mean::default();

            for g in &members {
                total_yearly_earnings += g.total_earnings;
                total_players = total_players.saturating_add(g.total_players);
                total_tournaments = total_tournaments.saturating_add(g.total_tournaments);
                per_player.push(g.avg_earnings_per_player);
                offline.push_opt(g.avg_offline_percentage);
            }

            Some(GenreYearAggregate {
                key,
                total_yearly_earnings,
                total_players,
                total_tournaments,
                game_count: members.len() as u32,
                avg_earnings_per_player: per_player.value().unwrap_or(0.0),
                avg_offline_percentage: offline.value(),
                top_game: top.key.game.clone(),
                top_game_earnings: top.total_earnings,
            })
        })
        .collect()
}

/// Both rollup levels, computed sequentially.
pub fn aggregate_sequential(
    records: &[EnrichedRecord],
) -> (Vec<GameYearAggregate>, Vec<GenreYearAggregate>) {
    let game_years = aggregate_game_years(records);
    let genre_years = aggregate_genre_years(&game_years);
    (game_years, genre_years)
}

/// Both rollup levels, one (genre, year) partition per rayon task.
///
/// Partitions keep input order, so per-group sums match the sequential path
/// exactly.
pub fn aggregate_partitioned(
    records: &[EnrichedRecord],
) -> (Vec<GameYearAggregate>, Vec<GenreYearAggregate>) {
    let partitions: Vec<(GenreYearKey, Vec<&EnrichedRecord>)> =
        group_in_order(records, |r| GenreYearKey::new(r.genre.clone(), r.year));

    let results: Vec<(Vec<GameYearAggregate>, Vec<GenreYearAggregate>)> = partitions
        .par_iter()
        .map(|(_, members)| {
            let game_years = aggregate_game_years(members.iter().copied());
            let genre_years = aggregate_genre_years(&game_years);
            (game_years, genre_years)
        })
        .collect();

    let mut game_years = Vec::new();
    let mut genre_years = Vec::new();
    for (games, genres) in results {
        game_years.extend(games);
        genre_years.extend(genres);
    }

    (game_years, genre_years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameYearKey, SourceRecord};
    use chrono::NaiveDate;

    fn enriched(
        genre: &str,
        year: i32,
        game: &str,
        earnings: f64,
        players: u64,
        tournaments: u64,
        offline: Option<f64>,
    ) -> EnrichedRecord {
        let record = SourceRecord::new(
            NaiveDate::from_ymd_opt(year, 3, 1).unwrap(),
            game,
            earnings,
            players,
            tournaments,
        );
        EnrichedRecord::new(record, genre.to_string(), offline)
    }

    fn game_year(genre: &str, year: i32, game: &str, earnings: f64) -> GameYearAggregate {
        GameYearAggregate {
            key: GameYearKey::new(genre, year, game),
            total_earnings: earnings,
            total_players: 10,
            total_tournaments: 1,
            avg_earnings_per_player: earnings / 10.0,
            avg_offline_percentage: None,
        }
    }

    #[test]
    fn test_count_sums_saturate() {
        let records = vec![
            enriched("MOBA", 2020, "Alpha", 10.0, u64::MAX, u64::MAX, None),
            enriched("MOBA", 2020, "Alpha", 10.0, 2, 3, None),
            enriched("MOBA", 2020, "Beta", 10.0, 5, 5, None),
        ];

        let (game_years, genre_years) = aggregate_sequential(&records);
        assert_eq!(game_years[0].total_players, u64::MAX);
        assert_eq!(game_years[0].total_tournaments, u64::MAX);
        assert_eq!(genre_years[0].total_players, u64::MAX);
        assert_eq!(genre_years[0].total_tournaments, u64::MAX);
    }

    #[test]
    fn test_game_year_sums_and_means() {
        let records = vec![
            enriched("MOBA", 2020, "Alpha", 1000.0, 10, 2, Some(20.0)),
            enriched("MOBA", 2020, "Alpha", 300.0, 1, 1, Some(20.0)),
        ];

        let aggs = aggregate_game_years(&records);
        assert_eq!(aggs.len(), 1);

        let a = &aggs[0];
        assert_eq!(a.key, GameYearKey::new("MOBA", 2020, "Alpha"));
        assert_eq!(a.total_earnings, 1300.0);
        assert_eq!(a.total_players, 11);
        assert_eq!(a.total_tournaments, 3);
        // Mean of 100 and 300, not 1300 / 11
        assert_eq!(a.avg_earnings_per_player, 200.0);
        assert_eq!(a.avg_offline_percentage, Some(20.0));
    }

    #[test]
    fn test_game_years_split_by_year_and_genre() {
        let records = vec![
            enriched("MOBA", 2020, "Alpha", 10.0, 1, 1, None),
            enriched("MOBA", 2021, "Alpha", 10.0, 1, 1, None),
            enriched("FPS", 2020, "Alpha", 10.0, 1, 1, None),
            enriched("MOBA", 2020, "Alpha", 10.0, 1, 1, None),
        ];

        let aggs = aggregate_game_years(&records);
        let keys: Vec<String> = aggs.iter().map(|a| a.key.to_string()).collect();
        assert_eq!(keys, vec!["MOBA/2020/Alpha", "MOBA/2021/Alpha", "FPS/2020/Alpha"]);
        assert_eq!(aggs[0].total_earnings, 20.0);
        assert!(aggs[0].avg_offline_percentage.is_none());
    }

    #[test]
    fn test_genre_year_mean_of_means_and_top_game() {
        let game_years = vec![
            game_year("MOBA", 2020, "Beta", 200.0),
            game_year("MOBA", 2020, "Alpha", 1000.0),
            game_year("MOBA", 2020, "Gamma", 300.0),
        ];

        let genres = aggregate_genre_years(&game_years);
        assert_eq!(genres.len(), 1);

        let g = &genres[0];
        assert_eq!(g.key, GenreYearKey::new("MOBA", 2020));
        assert_eq!(g.total_yearly_earnings, 1500.0);
        assert_eq!(g.total_players, 30);
        assert_eq!(g.total_tournaments, 3);
        assert_eq!(g.game_count, 3);
        assert_eq!(g.avg_earnings_per_player, 50.0);
        assert_eq!(g.top_game, "Alpha");
        assert_eq!(g.top_game_earnings, 1000.0);
    }

    #[test]
    fn test_mean_of_means_ignores_record_weights() {
        // Alpha has three records at 10/player, Beta one at 100/player.
        let records = vec![
            enriched("MOBA", 2020, "Alpha", 10.0, 1, 1, None),
            enriched("MOBA", 2020, "Alpha", 10.0, 1, 1, None),
            enriched("MOBA", 2020, "Alpha", 10.0, 1, 1, None),
            enriched("MOBA", 2020, "Beta", 100.0, 1, 1, None),
        ];

        let (_, genres) = aggregate_sequential(&records);
        assert_eq!(genres[0].avg_earnings_per_player, 55.0);
    }

    #[test]
    fn test_top_game_tie_breaks_on_name() {
        let game_years = vec![
            game_year("MOBA", 2020, "Zeta", 500.0),
            game_year("MOBA", 2020, "Alpha", 500.0),
        ];
        let reversed: Vec<_> = game_years.iter().rev().cloned().collect();

        assert_eq!(aggregate_genre_years(&game_years)[0].top_game, "Alpha");
        assert_eq!(aggregate_genre_years(&reversed)[0].top_game, "Alpha");
    }

    #[test]
    fn test_offline_mean_skips_absent_games() {
        let mut with_offline = game_year("MOBA", 2020, "Alpha", 10.0);
        with_offline.avg_offline_percentage = Some(30.0);
        let game_years = vec![with_offline, game_year("MOBA", 2020, "Beta", 5.0)];

        let genres = aggregate_genre_years(&game_years);
        assert_eq!(genres[0].avg_offline_percentage, Some(30.0));
    }

    #[test]
    fn test_sum_invariant() {
        let records = vec![
            enriched("MOBA", 2020, "Alpha", 1000.0, 10, 2, None),
            enriched("MOBA", 2020, "Beta", 250.0, 5, 1, None),
            enriched("FPS", 2020, "Gamma", 75.0, 3, 0, None),
            enriched("MOBA", 2020, "Beta", 125.0, 5, 1, None),
        ];

        let (games, genres) = aggregate_sequential(&records);
        for genre in &genres {
            let member_sum: f64 = games
                .iter()
                .filter(|g| g.key.genre_year() == genre.key)
                .map(|g| g.total_earnings)
                .sum();
            assert_eq!(member_sum, genre.total_yearly_earnings);
        }
    }

    #[test]
    fn test_partitioned_matches_sequential() {
        let records = vec![
            enriched("MOBA", 2020, "Alpha", 1000.0, 10, 2, Some(5.0)),
            enriched("FPS", 2020, "Gamma", 75.5, 3, 0, None),
            enriched("MOBA", 2021, "Alpha", 0.1, 7, 1, Some(7.0)),
            enriched("MOBA", 2020, "Beta", 250.25, 5, 1, Some(9.0)),
            enriched("MOBA", 2021, "Alpha", 0.2, 3, 1, Some(7.0)),
            enriched("FPS", 2020, "Delta", 75.5, 1, 4, None),
        ];

        let (mut seq_games, mut seq_genres) = aggregate_sequential(&records);
        let (mut par_games, mut par_genres) = aggregate_partitioned(&records);

        seq_games.sort_by(|a, b| a.key.cmp(&b.key));
        par_games.sort_by(|a, b| a.key.cmp(&b.key));
        seq_genres.sort_by(|a, b| a.key.cmp(&b.key));
        par_genres.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(seq_games, par_games);
        assert_eq!(seq_genres, par_genres);
    }

    #[test]
    fn test_empty_input() {
        let (games, genres) = aggregate_sequential(&[]);
        assert!(games.is_empty());
        assert!(genres.is_empty());

        let (games, genres) = aggregate_partitioned(&[]);
        assert!(games.is_empty());
        assert!(genres.is_empty());
    }
}
