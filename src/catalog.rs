//! Catalog Store: loads the two tab-separated catalog tables into memory.
//!
//! Row order is preserved — it defines the matching engine's candidate
//! iteration order. A missing table file is non-fatal: the loader logs a
//! warning and yields an empty container, which downstream gates then
//! filter everything against.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{CatalogEntry, RatingRecord};

/// Absent-value sentinel used by the catalog dumps
const ABSENT: &str = "\\N";

/// Raw title-basics row; extra columns in the table are ignored
#[derive(Debug, Deserialize)]
struct BasicsRow {
    tconst: String,
    #[serde(rename = "originalTitle")]
    original_title: String,
    #[serde(rename = "startYear")]
    start_year: String,
    genres: String,
}

/// Raw title-ratings row
#[derive(Debug, Deserialize)]
struct RatingsRow {
    tconst: String,
    #[serde(rename = "averageRating")]
    average_rating: String,
    #[serde(rename = "numVotes")]
    num_votes: String,
}

fn tsv_reader(file: File) -> csv::Reader<File> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .from_reader(file)
}

fn open_table(path: &Path) -> Option<File> {
    match File::open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Catalog table not available");
            None
        }
    }
}

/// Loads the title-basics table, preserving row order
pub fn load_catalog(path: &Path) -> AppResult<Vec<CatalogEntry>> {
    let Some(file) = open_table(path) else {
        return Ok(Vec::new());
    };

    let mut entries = Vec::new();
    for row in tsv_reader(file).deserialize::<BasicsRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed catalog row");
                continue;
            }
        };

        let start_year = match row.start_year.as_str() {
            ABSENT => None,
            year => year.trim().parse::<i32>().ok(),
        };
        let genres = match row.genres.as_str() {
            ABSENT | "" => Vec::new(),
            genres => genres
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        };

        entries.push(CatalogEntry {
            id: row.tconst,
            title: row.original_title,
            start_year,
            genres,
        });
    }

    tracing::info!(path = %path.display(), entries = entries.len(), "Catalog loaded");
    Ok(entries)
}

/// Loads the title-ratings table
///
/// Unparsable numeric fields load as `None`; the rating gate rejects such
/// candidates instead of the loader failing.
pub fn load_ratings(path: &Path) -> AppResult<Vec<RatingRecord>> {
    let Some(file) = open_table(path) else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for row in tsv_reader(file).deserialize::<RatingsRow>() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed ratings row");
                continue;
            }
        };

        records.push(RatingRecord {
            id: row.tconst,
            average_rating: row.average_rating.trim().parse::<f64>().ok(),
            num_votes: row.num_votes.trim().parse::<u64>().ok(),
        });
    }

    tracing::info!(path = %path.display(), records = records.len(), "Ratings loaded");
    Ok(records)
}

/// Builds the id → rating join map, once per matching-engine invocation
pub fn rating_lookup(records: &[RatingRecord]) -> HashMap<&str, &RatingRecord> {
    records
        .iter()
        .map(|record| (record.id.as_str(), record))
        .collect()
}
