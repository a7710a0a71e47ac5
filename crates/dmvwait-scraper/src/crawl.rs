//! Paginated directory crawler.
//!
//! One seed is one `"City ZIP"` query against the locations search. Each
//! seed is paginated independently until the portal stops returning cards;
//! because the portal never says "last page", absence of content is the
//! only stop signal and a configured page cap bounds a server that never
//! provides one.

use futures::stream::{self, StreamExt};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::client::PortalClient;
use crate::parse;
use crate::types::FacilityCard;

/// Builds the field-office search URL for one `"City ZIP"` seed.
///
/// The query carries the whole seed as `q`, the city token as `c`, and the
/// ZIP token as `z`. Returns `None` when the seed has fewer than two
/// whitespace-separated tokens; the caller logs and skips such seeds.
#[must_use]
pub fn seed_search_url(base_url: &str, seed: &str) -> Option<String> {
    let tokens: Vec<&str> = seed.split_whitespace().collect();
    let city = tokens.first()?;
    let zip = tokens.get(1)?;

    let q = utf8_percent_encode(seed.trim(), NON_ALPHANUMERIC);
    let c = utf8_percent_encode(city, NON_ALPHANUMERIC);
    Some(format!(
        "{base_url}/portal/locations/?q={q}&c={c}&z={zip}&services=field-office"
    ))
}

/// Builds the URL for page `page` of a seed's result set.
///
/// Page 1 is the seed URL itself; later pages insert a `page/{n}/` path
/// segment immediately before the query string.
#[must_use]
pub fn page_url(seed_url: &str, page: usize) -> String {
    if page <= 1 {
        return seed_url.to_string();
    }
    match seed_url.split_once('?') {
        Some((path, query)) => format!("{path}page/{page}/?{query}"),
        None => {
            let sep = if seed_url.ends_with('/') { "" } else { "/" };
            format!("{seed_url}{sep}page/{page}/")
        }
    }
}

/// Crawls every page of one seed's result set.
///
/// Stops when a page fails to fetch (logged, records from earlier pages are
/// kept), when a page yields no facility records (empty or all-placeholder),
/// or when `max_pages` pages have been fetched without a terminal page
/// (logged as a warning).
pub async fn crawl_seed(
    client: &PortalClient,
    seed_url: &str,
    max_pages: usize,
) -> Vec<FacilityCard> {
    let mut collected = Vec::new();

    for page in 1.. {
        let url = page_url(seed_url, page);
        let html = match client.fetch_html(&url).await {
            Ok(html) => html,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "page fetch failed; stopping this seed");
                break;
            }
        };

        let extract = parse::extract_cards(&html);
        if extract.records.is_empty() {
            tracing::debug!(url = %url, cards = extract.card_count, "terminal page reached");
            break;
        }
        collected.extend(extract.records);

        if page >= max_pages {
            tracing::warn!(
                seed_url,
                max_pages,
                "page cap reached before a terminal page; stopping this seed"
            );
            break;
        }
    }

    collected
}

/// Crawls the full directory: every page of every seed, in seed order.
///
/// Per-seed failures are contained by [`crawl_seed`]; one seed exhausting
/// or failing never affects another. Uses `buffered` rather than
/// `buffer_unordered` because downstream dedup keeps the first occurrence
/// in seed order, which must not depend on network completion order.
pub async fn crawl_directory(
    client: &PortalClient,
    seeds: &[String],
    max_pages: usize,
    max_concurrent: usize,
) -> Vec<FacilityCard> {
    let urls: Vec<String> = seeds
        .iter()
        .filter_map(|seed| match seed_search_url(client.base_url(), seed) {
            Some(url) => Some(url),
            None => {
                tracing::warn!(seed = %seed, "seed lacks a ZIP token; skipping");
                None
            }
        })
        .collect();

    stream::iter(urls)
        .map(|url| async move { crawl_seed(client, &url, max_pages).await })
        .buffered(max_concurrent.max(1))
        .concat()
        .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_url_carries_query_city_zip_and_service_filter() {
        let url = seed_search_url("https://www.dmv.ca.gov", "Alameda 94501").unwrap();
        assert_eq!(
            url,
            "https://www.dmv.ca.gov/portal/locations/?q=Alameda%2094501&c=Alameda&z=94501&services=field-office"
        );
    }

    #[test]
    fn seed_url_uses_first_and_second_tokens_for_city_and_zip() {
        // Multi-word cities still take the first token as the city and the
        // second as the ZIP; the full seed rides in `q`.
        let url = seed_search_url("https://www.dmv.ca.gov", "Los Angeles 90001").unwrap();
        assert!(url.contains("q=Los%20Angeles%2090001"));
        assert!(url.contains("c=Los"));
        assert!(url.contains("z=Angeles"));
    }

    #[test]
    fn seed_without_a_second_token_is_rejected() {
        assert_eq!(seed_search_url("https://www.dmv.ca.gov", "Alameda"), None);
        assert_eq!(seed_search_url("https://www.dmv.ca.gov", ""), None);
    }

    #[test]
    fn page_one_is_the_seed_url_itself() {
        let seed = "https://www.dmv.ca.gov/portal/locations/?q=x&z=1";
        assert_eq!(page_url(seed, 1), seed);
    }

    #[test]
    fn later_pages_insert_the_page_segment_before_the_query() {
        let seed = "https://www.dmv.ca.gov/portal/locations/?q=x&z=1";
        assert_eq!(
            page_url(seed, 3),
            "https://www.dmv.ca.gov/portal/locations/page/3/?q=x&z=1"
        );
    }

    #[test]
    fn page_url_without_a_query_appends_the_segment() {
        assert_eq!(
            page_url("https://example.org/locations", 2),
            "https://example.org/locations/page/2/"
        );
        assert_eq!(
            page_url("https://example.org/locations/", 2),
            "https://example.org/locations/page/2/"
        );
    }
}
