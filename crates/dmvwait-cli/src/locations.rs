//! The `locations` command: rebuild the office directory.
//!
//! Crawl every seed's result pages, dedup and normalize the cards, persist
//! the directory as CSV/JSON, then join the located rows to county polygons
//! and persist the enriched set as a GeoJSON layer.

use std::path::Path;

use anyhow::Context;

use dmvwait_core::AppConfig;
use dmvwait_geo::{enrich_with_counties, parse_counties};
use dmvwait_scraper::{crawl_directory, normalize_directory, PortalClient};

/// Runs a full directory rebuild.
///
/// When `dry_run` is `true`, fetches only the seed list, prints what would
/// be crawled, and returns without touching the filesystem.
///
/// # Errors
///
/// Returns an error if the seed list cannot be fetched or is empty, if the
/// county reference cannot be loaded or parsed, or if any output file
/// cannot be written. Per-seed and per-page fetch failures are logged and
/// contained inside the crawl instead.
pub(crate) async fn run(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let client = PortalClient::new(
        &config.portal_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build portal client")?;

    let seeds = client
        .fetch_city_seeds()
        .await
        .context("failed to fetch the city seed list")?;
    if seeds.is_empty() {
        anyhow::bail!("the portal returned an empty city seed list; nothing to crawl");
    }
    tracing::info!(seeds = seeds.len(), "fetched city seed list");

    if dry_run {
        println!(
            "dry-run: would crawl {} seeds (up to {} pages each), starting with [{}]",
            seeds.len(),
            config.max_pages_per_seed,
            seeds.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
        );
        return Ok(());
    }

    let cards = crawl_directory(
        &client,
        &seeds,
        config.max_pages_per_seed,
        config.max_concurrent_fetches,
    )
    .await;
    let rows = normalize_directory(cards);
    tracing::info!(rows = rows.len(), "normalized directory");

    let raw_dir = config.data_dir.join("raw");
    let geo_dir = config.data_dir.join("geo");
    create_dir(&raw_dir)?;
    create_dir(&geo_dir)?;

    let csv_path = raw_dir.join("dmv_locations.csv");
    let json_path = raw_dir.join("dmv_locations.json");
    dmvwait_store::write_directory_csv(&csv_path, &rows)?;
    dmvwait_store::write_directory_json(&json_path, &rows)?;

    let counties_raw = load_counties_source(&client, &config.counties_source).await?;
    let counties = parse_counties(&counties_raw, &config.county_state_filter)
        .context("failed to parse the county boundary reference")?;
    tracing::info!(counties = counties.len(), "loaded county boundaries");

    let enriched = enrich_with_counties(&rows, &counties);
    let geojson_path = geo_dir.join("dmv_locations.geojson");
    dmvwait_store::write_locations_geojson(&geojson_path, &enriched)?;

    println!(
        "wrote {} offices to {} ({} joined to a county in {})",
        rows.len(),
        json_path.display(),
        enriched.len(),
        geojson_path.display()
    );

    Ok(())
}

/// Loads the county boundary GeoJSON from a URL or a local path.
async fn load_counties_source(client: &PortalClient, source: &str) -> anyhow::Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        client
            .fetch_html(source)
            .await
            .with_context(|| format!("failed to download county reference from {source}"))
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read county reference from {source}"))
    }
}

fn create_dir(path: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory {}", path.display()))
}
