//! Point-in-polygon join of directory rows to county polygons.

use geo::{Contains, Point};

use dmvwait_scraper::FacilityRow;

use crate::counties::CountyShape;

/// A directory row joined to the county whose boundary contains it.
#[derive(Debug, Clone)]
pub struct EnrichedFacility {
    pub row: FacilityRow,
    pub county: String,
}

/// Annotates each located facility with the containing county.
///
/// The join is spatial containment, not nearest-neighbor: facilities with
/// missing coordinates or whose point falls in no polygon are excluded from
/// the enriched set (they remain in the plain directory). When polygons
/// overlap, the first containing polygon in layer order wins; a point
/// exactly on a boundary is contained by no polygon. Both edge behaviors
/// are accepted ambiguities of the layer, not rules of this join.
#[must_use]
pub fn enrich_with_counties(
    rows: &[FacilityRow],
    counties: &[CountyShape],
) -> Vec<EnrichedFacility> {
    let mut enriched = Vec::new();

    for row in rows {
        let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
            tracing::debug!(url = %row.url, "no coordinates; excluded from enriched set");
            continue;
        };

        let point = Point::new(longitude, latitude);
        let Some(county) = counties.iter().find(|c| c.boundary.contains(&point)) else {
            tracing::debug!(url = %row.url, "point falls in no county polygon; excluded");
            continue;
        };

        enriched.push(EnrichedFacility {
            row: row.clone(),
            county: county.name.clone(),
        });
    }

    enriched
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
