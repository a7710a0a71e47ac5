//! Loading the county boundary reference layer.

use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;

use crate::GeoError;

/// One named administrative region polygon.
#[derive(Debug, Clone)]
pub struct CountyShape {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
}

/// Parses a GeoJSON `FeatureCollection` of county polygons, keeping only
/// features whose `state_name` property equals `state_filter`.
///
/// Features without a `name`, without a geometry, or with a non-areal
/// geometry are skipped with a warning rather than failing the whole layer.
///
/// # Errors
///
/// Returns [`GeoError`] if `raw` is not valid GeoJSON or is not a
/// `FeatureCollection` — the county reference is required upstream data,
/// so a malformed layer is fatal to the run.
pub fn parse_counties(raw: &str, state_filter: &str) -> Result<Vec<CountyShape>, GeoError> {
    let geojson: GeoJson = raw.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeoError::NotAFeatureCollection);
    };

    let mut counties = Vec::new();

    for feature in collection.features {
        let state = feature.property("state_name").and_then(|v| v.as_str());
        if state != Some(state_filter) {
            continue;
        }

        let Some(name) = feature
            .property("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
        else {
            tracing::warn!("county feature without a name property; skipping");
            continue;
        };

        let Some(boundary) = feature.geometry.as_ref().and_then(areal_boundary) else {
            tracing::warn!(county = %name, "county feature without an areal geometry; skipping");
            continue;
        };

        counties.push(CountyShape { name, boundary });
    }

    Ok(counties)
}

/// Converts a GeoJSON geometry into a `MultiPolygon`, accepting both
/// `Polygon` and `MultiPolygon` features.
fn areal_boundary(geometry: &geojson::Geometry) -> Option<MultiPolygon<f64>> {
    match Geometry::<f64>::try_from(geometry.value.clone()).ok()? {
        Geometry::Polygon(polygon) => Some(MultiPolygon(vec![polygon])),
        Geometry::MultiPolygon(multi) => Some(multi),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
