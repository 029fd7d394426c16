//! # Esports Rollup
//!
//! Yearly per-genre earnings rollups over esports tournament records, with
//! genres ranked inside each year.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (records, metadata, aggregates, output rows)
//! - **calculate**: The rollup pipeline stages and `run_pipeline`
//! - **ingest**: Input loading and up-front validation
//! - **storage**: JSONL and Parquet file adapters
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use calculate::run_pipeline;
pub use models::*;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an ISO-8601 date or date-time into a calendar date.
///
/// Date-times with an offset are converted to UTC first, so
/// `2020-12-31T23:00:00-02:00` falls in 2021.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}
