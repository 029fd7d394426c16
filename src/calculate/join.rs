//! Metadata enrichment (inner equality join on game title).

use std::collections::HashMap;

use crate::models::{EnrichedRecord, GameMetadata, SourceRecord};

/// Game title -> metadata lookup. The first row for a title wins.
#[derive(Debug, Default)]
pub struct MetadataIndex<'a> {
    by_game: HashMap<&'a str, &'a GameMetadata>,
    duplicates: usize,
}

impl<'a> MetadataIndex<'a> {
    pub fn build(metadata: &'a [GameMetadata]) -> Self {
        let mut index = Self {
            by_game: HashMap::with_capacity(metadata.len()),
            duplicates: 0,
        };

        for meta in metadata {
            if index.by_game.contains_key(meta.game.as_str()) {
                index.duplicates += 1;
            } else {
                index.by_game.insert(meta.game.as_str(), meta);
            }
        }

        index
    }

    pub fn get(&self, game: &str) -> Option<&'a GameMetadata> {
        self.by_game.get(game).copied()
    }

    /// Rows ignored because an earlier row had the same title.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn len(&self) -> usize {
        self.by_game.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_game.is_empty()
    }
}

/// Enrich a single record; `None` when the title is unknown or has no genre.
pub fn enrich(record: &SourceRecord, index: &MetadataIndex<'_>) -> Option<EnrichedRecord> {
    let meta = index.get(&record.game)?;
    let genre = meta.genre.as_ref()?;
    Some(EnrichedRecord::new(
        record.clone(),
        genre.clone(),
        meta.percent_offline,
    ))
}

/// Enrich every record, dropping the ones without a genre.
pub fn join_metadata(records: &[&SourceRecord], index: &MetadataIndex<'_>) -> Vec<EnrichedRecord> {
    records.iter().filter_map(|r| enrich(r, index)).collect()
}
