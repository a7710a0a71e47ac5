//! County boundary reference and point-in-polygon enrichment.

mod counties;
mod enrich;

pub use counties::{parse_counties, CountyShape};
pub use enrich::{enrich_with_counties, EnrichedFacility};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("county reference is not valid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("county reference is not a FeatureCollection")]
    NotAFeatureCollection,
}
