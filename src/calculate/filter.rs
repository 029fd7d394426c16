//! Record qualification.

use chrono::NaiveDate;

use crate::models::SourceRecord;

/// Whether a record is recent enough and carries a payout.
pub fn qualifies(record: &SourceRecord, min_date: NaiveDate) -> bool {
    record.date >= min_date && record.earnings > 0.0 && record.players > 0
}

/// Keep qualifying records, preserving input order.
pub fn filter_records(records: &[SourceRecord], min_date: NaiveDate) -> Vec<&SourceRecord> {
    records.iter().filter(|r| qualifies(r, min_date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
    }

    fn record(y: i32, m: u32, d: u32, earnings: f64, players: u64) -> SourceRecord {
        SourceRecord::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            "Alpha",
            earnings,
            players,
            1,
        )
    }

    #[test]
    fn test_date_boundary() {
        assert!(!qualifies(&record(2014, 12, 31, 1e6, 100), min_date()));
        assert!(qualifies(&record(2015, 1, 1, 1.0, 1), min_date()));
    }

    #[test]
    fn test_requires_positive_earnings_and_players() {
        assert!(!qualifies(&record(2020, 1, 1, 0.0, 10), min_date()));
        assert!(!qualifies(&record(2020, 1, 1, -5.0, 10), min_date()));
        assert!(!qualifies(&record(2020, 1, 1, f64::NAN, 10), min_date()));
        assert!(!qualifies(&record(2020, 1, 1, 100.0, 0), min_date()));
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![
            record(2016, 1, 1, 3.0, 1),
            record(2014, 1, 1, 2.0, 1),
            record(2017, 1, 1, 1.0, 1),
        ];

        let kept = filter_records(&records, min_date());
        let earnings: Vec<f64> = kept.iter().map(|r| r.earnings).collect();
        assert_eq!(earnings, vec![3.0, 1.0]);
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter_records(&[], min_date()).is_empty());
    }
}
