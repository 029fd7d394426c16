//! Source records, title metadata and the enriched join result.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::GameYearKey;

/// One observed tournament-year entry for a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceRecord {
    /// Date of the observation
    pub date: NaiveDate,

    /// Game title (join key)
    pub game: String,

    /// Prize money awarded
    pub earnings: f64,

    /// Number of players paid out
    pub players: u64,

    /// Number of tournaments held
    pub tournaments: u64,
}

impl SourceRecord {
    pub fn new(
        date: NaiveDate,
        game: impl Into<String>,
        earnings: f64,
        players: u64,
        tournaments: u64,
    ) -> Self {
        Self {
            date,
            game: game.into(),
            earnings,
            players,
            tournaments,
        }
    }

    /// Calendar year of the observation.
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Static per-title reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameMetadata {
    /// Game title (join key)
    pub game: String,

    /// Genre; records for a title without one are dropped at the join
    #[serde(default)]
    pub genre: Option<String>,

    /// Share of earnings from offline events, 0 to 100
    #[serde(default)]
    pub percent_offline: Option<f64>,
}

impl GameMetadata {
    pub fn new(game: impl Into<String>, genre: impl Into<String>, percent_offline: f64) -> Self {
        Self {
            game: game.into(),
            genre: Some(genre.into()),
            percent_offline: Some(percent_offline),
        }
    }
}

/// A source record that matched a metadata row with a genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub record: SourceRecord,
    pub year: i32,
    pub earnings_per_player: f64,
    pub genre: String,
    pub percent_offline: Option<f64>,
}

impl EnrichedRecord {
    /// Enrich a record with its title's genre and offline share.
    ///
    /// Callers guarantee `record.players > 0`.
    pub fn new(record: SourceRecord, genre: String, percent_offline: Option<f64>) -> Self {
        let year = record.year();
        let earnings_per_player = record.earnings / record.players as f64;
        Self {
            record,
            year,
            earnings_per_player,
            genre,
            percent_offline,
        }
    }

    /// Grouping key for the game-level rollup.
    pub fn key(&self) -> GameYearKey {
        GameYearKey::new(self.genre.clone(), self.year, self.record.game.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_enriched_record_derives_year_and_ratio() {
        let record = SourceRecord::new(date(2020, 6, 1), "Alpha", 1000.0, 10, 2);
        let enriched = EnrichedRecord::new(record, "MOBA".to_string(), Some(0.0));

        assert_eq!(enriched.year, 2020);
        assert_eq!(enriched.earnings_per_player, 100.0);
        assert_eq!(enriched.key(), GameYearKey::new("MOBA", 2020, "Alpha"));
    }

    #[test]
    fn test_source_record_serialization_uses_source_field_names() {
        let record = SourceRecord::new(date(2019, 1, 31), "Beta", 12.5, 3, 1);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["Date"], "2019-01-31");
        assert_eq!(json["Game"], "Beta");
        assert_eq!(json["Players"], 3);
    }

    #[test]
    fn test_metadata_missing_fields_are_absent() {
        let meta: GameMetadata = serde_json::from_str(r#"{"Game": "Gamma"}"#).unwrap();

        assert_eq!(meta.game, "Gamma");
        assert!(meta.genre.is_none());
        assert!(meta.percent_offline.is_none());
    }
}
