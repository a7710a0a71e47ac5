//! Domain types for the directory crawl and wait-time sampling pipelines.

use serde::{Deserialize, Serialize};

/// One facility card as extracted from a search results page.
///
/// Every field is independently optional: a card missing any sub-element
/// still yields a record, with `None` (or the hours sentinel) standing in
/// for the absent field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityCard {
    pub name: Option<String>,
    /// Category label, with nested service callouts stripped out.
    pub location_type: Option<String>,
    /// Service tags nested inside the type label. Empty when none.
    pub services: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Per-facility detail page URL. The sole identity key downstream.
    pub detail_url: Option<String>,
    /// Composite `"street, city, STATE ZIP"` string, decomposed during
    /// normalization.
    pub address: Option<String>,
    /// Free-form schedule string; [`crate::parse::HOURS_UNAVAILABLE`] when
    /// the card carries no opening-hours metadata.
    pub hours: String,
}

/// One normalized directory row.
///
/// Field order here is the wire contract: the CSV and JSON directory files
/// carry exactly these columns in exactly this order, and the `url` column
/// is the facility set the wait sampler visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRow {
    pub place: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: String,
    /// Street portion of the decomposed address.
    pub address: Option<String>,
    pub hours: String,
    pub services: Vec<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// One observation of a facility's posted wait times.
///
/// The pair (`captured`, `location`) is the archive's dedup key; `captured`
/// is constant across one sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitSample {
    /// Location slug taken from the detail URL path.
    pub location: String,
    /// Facility category taken from the detail URL path.
    #[serde(rename = "type")]
    pub office_type: String,
    /// Appointment wait in minutes; `None` when closed or unavailable.
    pub appt_wait: Option<f64>,
    /// Walk-in wait in minutes; `None` when closed or unavailable.
    pub no_appt_wait: Option<f64>,
    /// Run timestamp truncated to the hour, `YYYY-MM-DD HH:00:00` in the
    /// configured timezone.
    pub captured: String,
    /// Weekday of `captured`, 0 = Sunday.
    pub day: u8,
}
