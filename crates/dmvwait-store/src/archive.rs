//! The wait-time archive: append-with-dedup persistence across runs.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use dmvwait_scraper::WaitSample;

use crate::StoreError;

/// Column order of the samples CSV; the JSON rendition carries the same
/// fields through [`WaitSample`]'s declaration order.
pub const SAMPLE_COLUMNS: [&str; 6] = [
    "location",
    "type",
    "appt_wait",
    "no_appt_wait",
    "captured",
    "day",
];

/// Merges a run's fresh samples into the existing archive.
///
/// Identity is `(captured, location)`: at most one sample per facility per
/// captured hour survives. Fresh samples come first in the scan, so a
/// re-run within the same hour replaces that hour's archived readings with
/// the newest ones. Relative order within each source is preserved.
#[must_use]
pub fn merge_samples(fresh: Vec<WaitSample>, archive: Vec<WaitSample>) -> Vec<WaitSample> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut merged = Vec::with_capacity(fresh.len() + archive.len());

    for sample in fresh.into_iter().chain(archive) {
        if seen.insert((sample.captured.clone(), sample.location.clone())) {
            merged.push(sample);
        }
    }

    merged
}

/// Reads the archived samples, treating a missing file as an empty archive.
///
/// The first run has nothing to merge into; anything else wrong with the
/// file (unreadable, corrupt JSON) is an error rather than silent data
/// loss.
///
/// # Errors
///
/// Returns [`StoreError`] on any failure other than the file not existing.
pub fn read_archive_json(path: &Path) -> Result<Vec<WaitSample>, StoreError> {
    let body = match std::fs::read_to_string(path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no existing archive; starting fresh");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    serde_json::from_str(&body).map_err(|e| StoreError::json(path, e))
}

/// Writes samples as CSV. Unavailable wait readings become empty cells.
///
/// # Errors
///
/// Returns [`StoreError`] on any I/O or CSV encoding failure.
pub fn write_samples_csv(path: &Path, samples: &[WaitSample]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::csv(path, e))?;

    writer
        .write_record(SAMPLE_COLUMNS)
        .map_err(|e| StoreError::csv(path, e))?;

    for sample in samples {
        writer
            .write_record([
                sample.location.as_str(),
                sample.office_type.as_str(),
                &minutes_cell(sample.appt_wait),
                &minutes_cell(sample.no_appt_wait),
                sample.captured.as_str(),
                &sample.day.to_string(),
            ])
            .map_err(|e| StoreError::csv(path, e))?;
    }

    writer.flush().map_err(|e| StoreError::io(path, e))
}

/// Writes samples as a JSON record array.
///
/// # Errors
///
/// Returns [`StoreError`] on any I/O or serialization failure.
pub fn write_samples_json(path: &Path, samples: &[WaitSample]) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), samples)
        .map_err(|e| StoreError::json(path, e))
}

fn minutes_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dmvwait-archive-{}-{name}", std::process::id()))
    }

    fn sample(location: &str, captured: &str, appt: Option<f64>) -> WaitSample {
        WaitSample {
            location: location.to_string(),
            office_type: "field-office".to_string(),
            appt_wait: appt,
            no_appt_wait: Some(30.0),
            captured: captured.to_string(),
            day: 2,
        }
    }

    #[test]
    fn distinct_hours_accumulate() {
        let fresh = vec![sample("alpha", "2025-01-07 10:00:00", Some(15.0))];
        let archive = vec![sample("alpha", "2025-01-07 09:00:00", Some(40.0))];

        let merged = merge_samples(fresh, archive);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn a_same_hour_rerun_keeps_the_fresh_reading() {
        let fresh = vec![sample("alpha", "2025-01-07 10:00:00", Some(5.0))];
        let archive = vec![sample("alpha", "2025-01-07 10:00:00", Some(90.0))];

        let merged = merge_samples(fresh, archive);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].appt_wait, Some(5.0));
    }

    #[test]
    fn merging_is_idempotent() {
        let archive = vec![
            sample("alpha", "2025-01-07 10:00:00", Some(15.0)),
            sample("beta", "2025-01-07 10:00:00", None),
        ];

        let merged = merge_samples(archive.clone(), archive.clone());
        assert_eq!(merged, archive);
    }

    #[test]
    fn different_locations_in_the_same_hour_both_survive() {
        let fresh = vec![
            sample("alpha", "2025-01-07 10:00:00", Some(15.0)),
            sample("beta", "2025-01-07 10:00:00", Some(25.0)),
        ];

        let merged = merge_samples(fresh, Vec::new());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn a_missing_archive_reads_as_empty() {
        let path = temp_path("missing.json");
        let archive = read_archive_json(&path).unwrap();
        assert!(archive.is_empty());
    }

    #[test]
    fn a_corrupt_archive_is_an_error() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(read_archive_json(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn samples_round_trip_through_json() {
        let path = temp_path("roundtrip.json");
        let samples = vec![
            sample("alpha", "2025-01-07 10:00:00", Some(15.0)),
            sample("beta", "2025-01-07 10:00:00", None),
        ];
        write_samples_json(&path, &samples).unwrap();

        let read = read_archive_json(&path).unwrap();
        assert_eq!(read, samples);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn csv_header_and_empty_wait_cells() {
        let path = temp_path("samples.csv");
        write_samples_csv(&path, &[sample("alpha", "2025-01-07 10:00:00", None)]).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let mut lines = body.lines();
        assert_eq!(
            lines.next().unwrap(),
            "location,type,appt_wait,no_appt_wait,captured,day"
        );
        assert_eq!(
            lines.next().unwrap(),
            "alpha,field-office,,30,2025-01-07 10:00:00,2"
        );
        std::fs::remove_file(&path).ok();
    }
}
