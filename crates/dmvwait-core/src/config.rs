use crate::app_config::AppConfig;
use crate::ConfigError;

/// Browser-like default; the portal serves the same markup to it as to a
/// real browser, and some edge configurations reject obviously synthetic
/// user agents.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

const DEFAULT_COUNTIES_SOURCE: &str =
    "https://stilesdata.com/gis/usa_counties_esri_simple_mainland.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any set variable has an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any set variable has an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("DMVWAIT_LOG_LEVEL", "info");
    let portal_base_url = or_default("DMVWAIT_PORTAL_BASE_URL", "https://www.dmv.ca.gov")
        .trim_end_matches('/')
        .to_string();
    let request_timeout_secs = parse_u64("DMVWAIT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DMVWAIT_USER_AGENT", DEFAULT_USER_AGENT);
    let max_pages_per_seed = parse_usize("DMVWAIT_MAX_PAGES_PER_SEED", "25")?;
    let max_concurrent_fetches = parse_usize("DMVWAIT_MAX_CONCURRENT_FETCHES", "1")?;

    let tz_raw = or_default("DMVWAIT_TIMEZONE", "America/Los_Angeles");
    let timezone = tz_raw
        .parse::<chrono_tz::Tz>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "DMVWAIT_TIMEZONE".to_string(),
            reason: e.to_string(),
        })?;

    let data_dir = PathBuf::from(or_default("DMVWAIT_DATA_DIR", "./data"));
    let counties_source = or_default("DMVWAIT_COUNTIES_SOURCE", DEFAULT_COUNTIES_SOURCE);
    let county_state_filter = or_default("DMVWAIT_COUNTY_STATE", "California");

    Ok(AppConfig {
        log_level,
        portal_base_url,
        request_timeout_secs,
        user_agent,
        max_pages_per_seed,
        max_concurrent_fetches,
        timezone,
        data_dir,
        counties_source,
        county_state_filter,
    })
}
