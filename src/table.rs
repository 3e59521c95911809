//! Delivery table input.
//!
//! Reads a whitespace- or comma-delimited table with a
//! `GiftId Latitude Longitude Weight` header into [`Gift`] rows. Malformed
//! input is this module's failure domain: it is reported as a
//! [`TableError`] before the planner ever runs.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::traits::Delivery;

/// One delivery row from the input table.
#[derive(Debug, Clone, Deserialize)]
pub struct Gift {
    #[serde(rename = "GiftId")]
    pub id: u64,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Weight")]
    pub weight: f64,
}

impl Delivery for Gift {
    type Id = u64;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read delivery table: {0}")]
    Io(#[from] io::Error),
    #[error("malformed delivery row: {0}")]
    Row(#[from] csv::Error),
    #[error("duplicate GiftId {0}")]
    DuplicateId(u64),
}

/// Read gifts from a delimited table.
///
/// Rows keep their input order. Each line may be comma-delimited or split
/// on runs of whitespace; both forms feed the same csv reader.
pub fn read_gifts<R: Read>(mut input: R) -> Result<Vec<Gift>, TableError> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;

    let normalized = normalize_delimiters(&raw);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(normalized.as_bytes());

    let mut gifts: Vec<Gift> = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    for row in reader.deserialize() {
        let gift: Gift = row?;
        if !seen.insert(gift.id) {
            return Err(TableError::DuplicateId(gift.id));
        }
        gifts.push(gift);
    }

    Ok(gifts)
}

pub fn read_gifts_from_path(path: impl AsRef<Path>) -> Result<Vec<Gift>, TableError> {
    read_gifts(File::open(path)?)
}

/// Rewrite whitespace-delimited lines as comma-delimited ones.
///
/// Lines that already contain a comma pass through untouched; blank lines
/// are dropped.
fn normalize_delimiters(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            if line.contains(',') {
                line.trim().to_string()
            } else {
                line.split_whitespace().collect::<Vec<_>>().join(",")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITESPACE_TABLE: &str = "GiftId Latitude Longitude Weight\n\
                                    1 60.8 46.3 25.0\n\
                                    2  61.2   47.1  40.5\n";

    const COMMA_TABLE: &str = "GiftId,Latitude,Longitude,Weight\n\
                               1,60.8,46.3,25.0\n\
                               2,61.2,47.1,40.5\n";

    #[test]
    fn test_reads_whitespace_table() {
        let gifts = read_gifts(WHITESPACE_TABLE.as_bytes()).unwrap();
        assert_eq!(gifts.len(), 2);
        assert_eq!(gifts[0].id, 1);
        assert_eq!(gifts[1].weight, 40.5);
        assert_eq!(gifts[1].location(), (61.2, 47.1));
    }

    #[test]
    fn test_comma_and_whitespace_tables_agree() {
        let a = read_gifts(WHITESPACE_TABLE.as_bytes()).unwrap();
        let b = read_gifts(COMMA_TABLE.as_bytes()).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.location(), y.location());
            assert_eq!(x.weight, y.weight);
        }
    }

    #[test]
    fn test_preserves_row_order() {
        let table = "GiftId Latitude Longitude Weight\n\
                     7 60.0 46.0 1.0\n\
                     3 61.0 47.0 1.0\n\
                     9 62.0 48.0 1.0\n";
        let gifts = read_gifts(table.as_bytes()).unwrap();
        let ids: Vec<u64> = gifts.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let table = "GiftId Latitude Longitude Weight\n\
                     1 60.0 46.0 1.0\n\
                     1 61.0 47.0 2.0\n";
        let err = read_gifts(table.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::DuplicateId(1)));
    }

    #[test]
    fn test_malformed_row_is_rejected() {
        let table = "GiftId Latitude Longitude Weight\n\
                     1 sixty 46.0 1.0\n";
        let err = read_gifts(table.as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::Row(_)));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = "GiftId Latitude Longitude Weight\n\n1 60.0 46.0 1.0\n\n";
        let gifts = read_gifts(table.as_bytes()).unwrap();
        assert_eq!(gifts.len(), 1);
    }
}
