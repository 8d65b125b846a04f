//! Output formatting and persistence for tracked positions.
//!
//! Supports JSON logging and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::simulator::PositionSample;
use crate::wire::Child;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row: a bus position sampled on behalf of a child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub child_id: String,
    pub child_name: String,
    pub bus_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub eta_minutes: u32,
    pub status: String,
}

impl TrackRecord {
    pub fn new(child: &Child, sample: PositionSample) -> Self {
        TrackRecord {
            child_id: child.id.clone(),
            child_name: child.name.clone(),
            bus_id: sample.vehicle_id,
            latitude: sample.latitude,
            longitude: sample.longitude,
            timestamp: sample.timestamp,
            eta_minutes: sample.eta_minutes,
            status: sample.status,
        }
    }
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`TrackRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &TrackRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn record() -> TrackRecord {
        TrackRecord {
            child_id: "child_001".to_string(),
            child_name: "Emma Johnson".to_string(),
            bus_id: "bus_001".to_string(),
            latitude: 37.7749,
            longitude: -122.4194,
            timestamp: Utc.with_ymd_and_hms(2025, 3, 4, 15, 0, 0).unwrap(),
            eta_minutes: 25,
            status: "On Route".to_string(),
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&record()).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("bus_tracker_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &record()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("child_id,child_name,bus_id,"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("bus_tracker_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &record()).unwrap();
        append_record(&path, &record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 2 data rows
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.contains("eta_minutes")).count(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_reads_back() {
        let path = temp_path("bus_tracker_test_readback.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &record()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<TrackRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows, vec![record()]);

        fs::remove_file(&path).unwrap();
    }
}
