//! The `waits` command: one hourly sampling pass.
//!
//! Reads the persisted directory, visits every office's detail page for its
//! posted waits, then merges the fresh samples into the archive. The latest
//! snapshot and the merged archive are both written as CSV and JSON.

use anyhow::Context;
use chrono::Utc;

use dmvwait_core::AppConfig;
use dmvwait_scraper::{sample_facilities, PortalClient, RunStamp};
use dmvwait_store::{merge_samples, read_archive_json};

/// Runs one sampling pass over the whole directory.
///
/// When `dry_run` is `true`, prints what would be sampled and returns
/// without fetching or writing.
///
/// # Errors
///
/// Returns an error if the directory snapshot is missing or unreadable, if
/// the existing archive is corrupt, or if any output file cannot be
/// written. Per-facility fetch failures are logged and skipped instead.
pub(crate) async fn run(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let directory_path = config.data_dir.join("raw").join("dmv_locations.json");
    let rows = read_directory_snapshot(&directory_path)?;
    let urls: Vec<String> = rows.into_iter().map(|row| row.url).collect();

    let stamp = RunStamp::new(Utc::now(), config.timezone);
    tracing::info!(captured = %stamp.captured, facilities = urls.len(), "sampling run");

    if dry_run {
        println!(
            "dry-run: would sample {} facilities, stamped {}",
            urls.len(),
            stamp.captured
        );
        return Ok(());
    }

    let client = PortalClient::new(
        &config.portal_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build portal client")?;

    let samples = sample_facilities(&client, &urls, &stamp, config.max_concurrent_fetches).await;
    tracing::info!(
        sampled = samples.len(),
        skipped = urls.len() - samples.len(),
        "sampling pass complete"
    );

    let processed_dir = config.data_dir.join("processed");
    let archive_dir = processed_dir.join("archive");
    std::fs::create_dir_all(&archive_dir)
        .with_context(|| format!("failed to create output directory {}", archive_dir.display()))?;

    let archive_json = archive_dir.join("wait_times.json");
    let archive = read_archive_json(&archive_json)?;
    let archived_before = archive.len();
    // Fresh samples first: a re-run within the same hour replaces that
    // hour's archived readings.
    let merged = merge_samples(samples.clone(), archive);

    dmvwait_store::write_samples_csv(&processed_dir.join("wait_times_latest.csv"), &samples)?;
    dmvwait_store::write_samples_json(&processed_dir.join("wait_times_latest.json"), &samples)?;
    dmvwait_store::write_samples_csv(&archive_dir.join("wait_times.csv"), &merged)?;
    dmvwait_store::write_samples_json(&archive_json, &merged)?;

    println!(
        "sampled {} facilities at {}; archive grew {} -> {} rows",
        samples.len(),
        stamp.captured,
        archived_before,
        merged.len()
    );

    Ok(())
}

fn read_directory_snapshot(
    path: &std::path::Path,
) -> anyhow::Result<Vec<dmvwait_scraper::FacilityRow>> {
    dmvwait_store::read_directory_json(path).with_context(|| {
        format!(
            "failed to read the directory snapshot at {}; run `dmvwait locations` first",
            path.display()
        )
    })
}
