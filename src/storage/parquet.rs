//! Parquet export of the ranked rollup.
//!
//! Column names match the JSON export so downstream tools can read either.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::{debug, info};

use super::StorageError;
use crate::models::GenreRollupRow;

/// Schema for the rollup table.
pub fn rollup_schema() -> Schema {
    Schema::new(vec![
        Field::new("Year", DataType::Int32, false),
        Field::new("Genre", DataType::Utf8, false),
        Field::new("RankInYear", DataType::UInt32, false),
        Field::new("TopGame", DataType::Utf8, false),
        Field::new("TopGameEarnings", DataType::Float64, false),
        Field::new("TotalYearlyEarnings", DataType::Float64, false),
        Field::new("TotalPlayers", DataType::UInt64, false),
        Field::new("TotalTournaments", DataType::UInt64, false),
        Field::new("GameCount", DataType::UInt32, false),
        Field::new("AvgEarningsPerPlayer", DataType::Float64, false),
        Field::new("AvgTournamentSize", DataType::Float64, false),
        Field::new("EarningsPerTournament", DataType::Float64, false),
        Field::new("AvgOfflinePercentage", DataType::Float64, true),
    ])
}

/// Build an Arrow batch from rollup rows.
pub fn rollup_batch(rows: &[GenreRollupRow]) -> Result<RecordBatch, StorageError> {
    let schema = Arc::new(rollup_schema());

    let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
    let genres: Vec<&str> = rows.iter().map(|r| r.genre.as_str()).collect();
    let ranks: Vec<u32> = rows.iter().map(|r| r.rank_in_year).collect();
    let top_games: Vec<&str> = rows.iter().map(|r| r.top_game.as_str()).collect();
    let top_game_earnings: Vec<f64> = rows.iter().map(|r| r.top_game_earnings).collect();
    let total_earnings: Vec<f64> = rows.iter().map(|r| r.total_yearly_earnings).collect();
    let total_players: Vec<u64> = rows.iter().map(|r| r.total_players).collect();
    let total_tournaments: Vec<u64> = rows.iter().map(|r| r.total_tournaments).collect();
    let game_counts: Vec<u32> = rows.iter().map(|r| r.game_count).collect();
    let per_player: Vec<f64> = rows.iter().map(|r| r.avg_earnings_per_player).collect();
    let tournament_sizes: Vec<f64> = rows.iter().map(|r| r.avg_tournament_size).collect();
    let per_tournament: Vec<f64> = rows.iter().map(|r| r.earnings_per_tournament).collect();
    let offline: Vec<Option<f64>> = rows.iter().map(|r| r.avg_offline_percentage).collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(years)) as ArrayRef,
            Arc::new(StringArray::from(genres)) as ArrayRef,
            Arc::new(UInt32Array::from(ranks)) as ArrayRef,
            Arc::new(StringArray::from(top_games)) as ArrayRef,
            Arc::new(Float64Array::from(top_game_earnings)) as ArrayRef,
            Arc::new(Float64Array::from(total_earnings)) as ArrayRef,
            Arc::new(UInt64Array::from(total_players)) as ArrayRef,
            Arc::new(UInt64Array::from(total_tournaments)) as ArrayRef,
            Arc::new(UInt32Array::from(game_counts)) as ArrayRef,
            Arc::new(Float64Array::from(per_player)) as ArrayRef,
            Arc::new(Float64Array::from(tournament_sizes)) as ArrayRef,
            Arc::new(Float64Array::from(per_tournament)) as ArrayRef,
            Arc::new(Float64Array::from(offline)) as ArrayRef,
        ],
    )?;

    Ok(batch)
}

/// Parquet file writer for rollup rows.
pub struct ParquetExporter {
    path: PathBuf,
}

impl ParquetExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write all rows as a single Snappy-compressed batch, replacing the file.
    pub fn write_rows(&self, rows: &[GenreRollupRow]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let batch = rollup_batch(rows)?;
        let file = File::create(&self.path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        info!("Wrote {} rollup rows to {:?}", rows.len(), self.path);
        Ok(())
    }
}

/// Read all record batches from a Parquet file.
pub fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    debug!("Read {} batches from {:?}", batches.len(), path);
    Ok(batches)
}
