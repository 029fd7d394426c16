//! Input loading and validation.
//!
//! Raw rows are checked up front so that the pipeline itself never fails:
//! rows with missing or wrongly typed fields are skipped as non-qualifying,
//! while an unparsable `Date` or a line that is not JSON aborts the load
//! before any processing starts.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{GameMetadata, SourceRecord};
use crate::parse_date;
use crate::storage::{JsonlReader, StorageError};

/// Fatal input validation errors.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Line {line}: unparsable Date {value}")]
    InvalidDate { line: usize, value: String },
}

/// A tournament record as it appears in the input file.
///
/// Fields stay untyped JSON so that a wrongly typed value disqualifies one
/// row instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSourceRecord {
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub game: Option<Value>,
    #[serde(default)]
    pub earnings: Option<Value>,
    #[serde(default)]
    pub players: Option<Value>,
    #[serde(default)]
    pub tournaments: Option<Value>,
}

/// A non-negative whole number, accepting integral floats such as `10.0`.
fn whole_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }

    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

impl RawSourceRecord {
    /// Convert to a typed record.
    ///
    /// Returns `Ok(None)` when a required field is missing or not usable
    /// (non-numeric, fractional or negative counts, non-string `Game`); such
    /// rows can never pass the record filter. A missing `Tournaments` counts
    /// as zero.
    pub fn validate(self, line: usize) -> Result<Option<SourceRecord>, InputError> {
        let date = match self.date {
            Some(Value::String(raw)) => match parse_date(&raw) {
                Some(d) => d,
                None => {
                    return Err(InputError::InvalidDate {
                        line,
                        value: format!("{:?}", raw),
                    })
                }
            },
            Some(other) => {
                return Err(InputError::InvalidDate {
                    line,
                    value: other.to_string(),
                })
            }
            None => return Ok(None),
        };

        let tournaments = match &self.tournaments {
            None => 0,
            Some(value) => match whole_count(value) {
                Some(t) => t,
                None => return Ok(None),
            },
        };

        let game = match self.game {
            Some(Value::String(game)) => game,
            _ => return Ok(None),
        };

        let Some(earnings) = self.earnings.as_ref().and_then(Value::as_f64) else {
            return Ok(None);
        };

        let Some(players) = self.players.as_ref().and_then(whole_count) else {
            return Ok(None);
        };

        Ok(Some(SourceRecord::new(
            date,
            game,
            earnings,
            players,
            tournaments,
        )))
    }
}

/// Validated tournament records.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<SourceRecord>,

    /// Rows skipped for missing or unusable fields
    pub incomplete: usize,
}

/// Validate numbered raw rows, failing on the first unparsable date.
pub fn validate_records(
    raw: impl IntoIterator<Item = (usize, RawSourceRecord)>,
) -> Result<LoadedRecords, InputError> {
    let mut loaded = LoadedRecords::default();

    for (line, row) in raw {
        match row.validate(line)? {
            Some(record) => loaded.records.push(record),
            None => loaded.incomplete += 1,
        }
    }

    Ok(loaded)
}

/// Load and validate tournament records from a JSONL file.
pub fn load_records(path: &Path) -> Result<LoadedRecords, InputError> {
    let raw = JsonlReader::<RawSourceRecord>::new(path).read_numbered()?;
    let loaded = validate_records(raw)?;

    info!(
        "Loaded {} records from {:?} ({} incomplete)",
        loaded.records.len(),
        path,
        loaded.incomplete
    );
    Ok(loaded)
}

/// Load title metadata from a JSONL file.
pub fn load_metadata(path: &Path) -> Result<Vec<GameMetadata>, InputError> {
    let rows: Vec<GameMetadata> = JsonlReader::<GameMetadata>::new(path)
        .read_numbered()?
        .into_iter()
        .map(|(_, row)| row)
        .collect();

    debug!("Loaded {} metadata rows from {:?}", rows.len(), path);
    Ok(rows)
}
