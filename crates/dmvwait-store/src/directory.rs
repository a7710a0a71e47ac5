//! Directory persistence: CSV and JSON snapshots plus the GeoJSON layer.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geojson::{Feature, FeatureCollection};

use dmvwait_geo::EnrichedFacility;
use dmvwait_scraper::FacilityRow;

use crate::StoreError;

/// Column order of the directory CSV. The JSON rendition carries the same
/// fields through [`FacilityRow`]'s declaration order.
pub const DIRECTORY_COLUMNS: [&str; 10] = [
    "place",
    "latitude",
    "longitude",
    "url",
    "address",
    "hours",
    "services",
    "city",
    "state",
    "zip",
];

/// Writes the directory snapshot as CSV.
///
/// `services` is a list in the JSON rendition; the CSV flattens it with
/// `"; "` separators. Absent optional fields become empty cells.
///
/// # Errors
///
/// Returns [`StoreError`] on any I/O or CSV encoding failure.
pub fn write_directory_csv(path: &Path, rows: &[FacilityRow]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::csv(path, e))?;

    writer
        .write_record(DIRECTORY_COLUMNS)
        .map_err(|e| StoreError::csv(path, e))?;

    for row in rows {
        writer
            .write_record([
                row.place.as_deref().unwrap_or(""),
                &optional_number(row.latitude),
                &optional_number(row.longitude),
                &row.url,
                row.address.as_deref().unwrap_or(""),
                &row.hours,
                &row.services.join("; "),
                row.city.as_deref().unwrap_or(""),
                row.state.as_deref().unwrap_or(""),
                row.zip.as_deref().unwrap_or(""),
            ])
            .map_err(|e| StoreError::csv(path, e))?;
    }

    writer.flush().map_err(|e| StoreError::io(path, e))
}

/// Writes the directory snapshot as a JSON record array.
///
/// # Errors
///
/// Returns [`StoreError`] on any I/O or serialization failure.
pub fn write_directory_json(path: &Path, rows: &[FacilityRow]) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows).map_err(|e| StoreError::json(path, e))
}

/// Reads a previously written directory snapshot. This is the sampler's
/// input: its `url` column is the full set of facilities to visit.
///
/// # Errors
///
/// Returns [`StoreError`] if the file is missing or not a valid record
/// array — the directory is required upstream data for a sampling run.
pub fn read_directory_json(path: &Path) -> Result<Vec<FacilityRow>, StoreError> {
    let body = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&body).map_err(|e| StoreError::json(path, e))
}

/// Writes the enriched directory as a GeoJSON `FeatureCollection` of Point
/// features (WGS84 longitude/latitude order), carrying the full row schema
/// plus the joined `county` as properties.
///
/// # Errors
///
/// Returns [`StoreError`] on any I/O or serialization failure.
pub fn write_locations_geojson(
    path: &Path,
    enriched: &[EnrichedFacility],
) -> Result<(), StoreError> {
    let features: Vec<Feature> = enriched
        .iter()
        .filter_map(|facility| {
            // Enriched rows always carry coordinates; stay defensive anyway.
            let latitude = facility.row.latitude?;
            let longitude = facility.row.longitude?;

            let mut properties = match serde_json::to_value(&facility.row) {
                Ok(serde_json::Value::Object(map)) => map,
                _ => serde_json::Map::new(),
            };
            properties.insert(
                "county".to_string(),
                serde_json::Value::String(facility.county.clone()),
            );

            Some(Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                    longitude, latitude,
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &collection)
        .map_err(|e| StoreError::json(path, e))
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
