use std::path::PathBuf;

use chrono_tz::Tz;

/// Application configuration for both pipelines (directory crawl and wait
/// sampling), loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Default log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Origin of the DMV portal, without a trailing slash
    /// (e.g. `https://www.dmv.ca.gov`).
    pub portal_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// `User-Agent` header sent on every request.
    pub user_agent: String,
    /// Safety cap on pages fetched per seed. The portal signals the end of
    /// a result set by returning an empty page; this cap bounds a server
    /// that never does.
    pub max_pages_per_seed: usize,
    /// Maximum in-flight fetches during crawling and sampling. `1` gives
    /// strictly sequential requests.
    pub max_concurrent_fetches: usize,
    /// Timezone the capture timestamp is taken in. One value for the whole
    /// run; samples are stamped with the run's hour in this zone.
    pub timezone: Tz,
    /// Directory all output files are written under.
    pub data_dir: PathBuf,
    /// Path or URL of the county boundary GeoJSON reference.
    pub counties_source: String,
    /// `state_name` property value the county reference is filtered to.
    pub county_state_filter: String,
}
