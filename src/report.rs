//! Route report output.
//!
//! Serializes plan records as CSV rows with `RouteId`, `GiftIds` and
//! `Distance` columns. `GiftIds` holds the route's ids in visiting order,
//! joined with commas; whether the csv writer quotes that field is its own
//! business, not part of the format contract.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::solver::PlanRecord;

#[derive(Debug, Serialize)]
struct RouteRow {
    #[serde(rename = "RouteId")]
    route_id: usize,
    #[serde(rename = "GiftIds")]
    gift_ids: String,
    #[serde(rename = "Distance")]
    distance: f64,
}

/// Write plan records as CSV, one row per route, in record order.
pub fn write_routes<W, I>(writer: W, records: &[PlanRecord<I>]) -> Result<(), csv::Error>
where
    W: Write,
    I: fmt::Display,
{
    // Header goes out unconditionally, even for an empty plan, so automatic
    // header handling is turned off.
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(["RouteId", "GiftIds", "Distance"])?;
    for record in records {
        out.serialize(RouteRow {
            route_id: record.route_id,
            gift_ids: join_ids(&record.route),
            distance: record.total_distance_km,
        })?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_routes_to_path<I: fmt::Display>(
    path: impl AsRef<Path>,
    records: &[PlanRecord<I>],
) -> Result<(), csv::Error> {
    write_routes(File::create(path)?, records)
}

fn join_ids<I: fmt::Display>(ids: &[I]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(route_id: usize, route: Vec<u64>, total_distance_km: f64) -> PlanRecord<u64> {
        PlanRecord {
            route_id,
            route,
            total_distance_km,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let records = vec![record(1, vec![3, 1, 2], 12.5), record(2, vec![4], 0.0)];

        let mut buffer = Vec::new();
        write_routes(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("RouteId,GiftIds,Distance"));
        assert_eq!(lines.next(), Some("1,\"3,1,2\",12.5"));
        assert_eq!(lines.next(), Some("2,4,0.0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_plan_writes_header_only() {
        let records: Vec<PlanRecord<u64>> = Vec::new();
        let mut buffer = Vec::new();
        write_routes(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.trim_end(), "RouteId,GiftIds,Distance");
    }

    #[test]
    fn test_ids_keep_visiting_order() {
        let records = vec![record(1, vec![9, 2, 7], 1.0)];
        let mut buffer = Vec::new();
        write_routes(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"9,2,7\""));
    }
}
