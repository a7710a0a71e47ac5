//! Wait-time sampler.
//!
//! Re-visits every known facility's detail page and extracts the posted
//! appointment and walk-in waits. The capture timestamp is taken once per
//! run in a configured timezone and injected here, so a run is fully
//! deterministic given one clock value, and every sample in a run shares
//! the same hour stamp.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};

use crate::client::PortalClient;
use crate::parse;
use crate::types::WaitSample;

/// The run-wide capture stamp: the run's wall-clock hour in the configured
/// timezone, plus the derived weekday.
#[derive(Debug, Clone)]
pub struct RunStamp {
    /// `YYYY-MM-DD HH:00:00` — truncated to the hour.
    pub captured: String,
    /// 0 = Sunday, matching strftime `%w`.
    pub day: u8,
}

impl RunStamp {
    #[must_use]
    pub fn new(now_utc: DateTime<Utc>, timezone: Tz) -> Self {
        let local = now_utc.with_timezone(&timezone);
        let captured = local.format("%Y-%m-%d %H:00:00").to_string();
        let day = u8::try_from(local.weekday().num_days_from_sunday()).unwrap_or(0);
        Self { captured, day }
    }
}

/// Derives the (office type, location slug) identity from a detail URL.
///
/// Detail URLs have the fixed shape
/// `https://host/portal/<type>/<location>/…`, so the type and location are
/// segments 4 and 5 of a plain `/` split. This is a structural contract on
/// the portal's URL layout, not a heuristic; a URL with too few segments
/// has no usable identity and yields `None`.
#[must_use]
pub fn sample_identity(url: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = url.trim().split('/').collect();
    let office_type = parts.get(4).copied().filter(|s| !s.is_empty())?;
    let location = parts.get(5).copied().filter(|s| !s.is_empty())?;
    Some((office_type.to_string(), location.to_string()))
}

/// Samples every facility once, with bounded fetch concurrency.
///
/// Facilities are independent: a fetch failure or a malformed URL skips
/// that facility with a warning and never affects the rest of the run.
pub async fn sample_facilities(
    client: &PortalClient,
    urls: &[String],
    stamp: &RunStamp,
    max_concurrent: usize,
) -> Vec<WaitSample> {
    stream::iter(urls)
        .map(|url| async move { sample_one(client, url, stamp).await })
        .buffered(max_concurrent.max(1))
        .filter_map(|sample| async move { sample })
        .collect()
        .await
}

async fn sample_one(client: &PortalClient, url: &str, stamp: &RunStamp) -> Option<WaitSample> {
    let Some((office_type, location)) = sample_identity(url) else {
        tracing::warn!(url, "detail URL has too few path segments; skipping facility");
        return None;
    };

    let html = match client.fetch_html(url).await {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(url, error = %err, "detail page fetch failed; skipping facility");
            return None;
        }
    };

    let (appt_wait, no_appt_wait) = parse::extract_wait_times(&html);

    Some(WaitSample {
        location,
        office_type,
        appt_wait,
        no_appt_wait,
        captured: stamp.captured.clone(),
        day: stamp.day,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn identity_comes_from_fixed_path_positions() {
        let identity =
            sample_identity("https://www.dmv.ca.gov/portal/field-office/santa-monica/").unwrap();
        assert_eq!(identity.0, "field-office");
        assert_eq!(identity.1, "santa-monica");
    }

    #[test]
    fn identity_tolerates_surrounding_whitespace() {
        let identity =
            sample_identity("  https://www.dmv.ca.gov/portal/field-office/tracy/ ").unwrap();
        assert_eq!(identity.1, "tracy");
    }

    #[test]
    fn short_urls_have_no_identity() {
        assert_eq!(sample_identity("https://www.dmv.ca.gov/portal/"), None);
        assert_eq!(sample_identity("https://www.dmv.ca.gov/portal/field-office"), None);
        assert_eq!(sample_identity(""), None);
    }

    #[test]
    fn stamp_truncates_to_the_hour_in_the_run_timezone() {
        // 2025-01-05 12:47 UTC is 04:47 in Los Angeles, a Sunday.
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 12, 47, 33).unwrap();
        let stamp = RunStamp::new(now, chrono_tz::America::Los_Angeles);
        assert_eq!(stamp.captured, "2025-01-05 04:00:00");
        assert_eq!(stamp.day, 0);
    }

    #[test]
    fn the_timezone_decides_both_hour_and_weekday() {
        // 04:30 UTC on Monday is still Sunday evening in Los Angeles.
        let now = Utc.with_ymd_and_hms(2025, 1, 6, 4, 30, 0).unwrap();

        let pacific = RunStamp::new(now, chrono_tz::America::Los_Angeles);
        assert_eq!(pacific.captured, "2025-01-05 20:00:00");
        assert_eq!(pacific.day, 0);

        let utc = RunStamp::new(now, chrono_tz::UTC);
        assert_eq!(utc.captured, "2025-01-06 04:00:00");
        assert_eq!(utc.day, 1);
    }
}
