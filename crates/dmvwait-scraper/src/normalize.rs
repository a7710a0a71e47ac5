//! Directory normalization: first-wins dedup and address decomposition.

use std::collections::HashSet;

use crate::types::{FacilityCard, FacilityRow};

/// The pieces of a decomposed composite address.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Decomposes a composite `"street, city, STATE ZIP"` string.
///
/// The string is split on commas into street, city, and region segments;
/// the region segment is split on its last whitespace into state and ZIP.
/// Missing segments become `None` rather than an error, and segments past
/// the third are ignored.
#[must_use]
pub fn split_address(address: &str) -> AddressParts {
    let segments: Vec<&str> = address.split(',').map(str::trim).collect();

    let segment = |i: usize| {
        segments
            .get(i)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };

    let street = segment(0);
    let city = segment(1);

    let (state, zip) = match segments.get(2).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(tail) => match tail.rsplit_once(char::is_whitespace) {
            Some((state, zip)) => (Some(state.trim().to_string()), Some(zip.to_string())),
            None => (Some(tail.to_string()), None),
        },
        None => (None, None),
    };

    AddressParts {
        street,
        city,
        state,
        zip,
    }
}

/// Produces the canonical directory from the raw crawl output.
///
/// Cards are deduplicated by detail URL, keeping the first occurrence in
/// crawl order; city and ZIP seeds overlap geographically, so the same
/// office routinely appears under several seeds. Cards without a detail URL
/// are dropped with a warning — the URL is both the identity key and the
/// sampler's input, so a record without one is unusable downstream.
#[must_use]
pub fn normalize_directory(cards: Vec<FacilityCard>) -> Vec<FacilityRow> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();

    for card in cards {
        let Some(url) = card.detail_url else {
            tracing::warn!(
                name = card.name.as_deref().unwrap_or("<unnamed>"),
                "card has no detail URL; dropping"
            );
            continue;
        };
        if !seen.insert(url.clone()) {
            continue;
        }

        let parts = card.address.as_deref().map(split_address).unwrap_or_default();

        rows.push(FacilityRow {
            place: card.name,
            latitude: card.latitude,
            longitude: card.longitude,
            url,
            address: parts.street,
            hours: card.hours,
            services: card.services,
            city: parts.city,
            state: parts.state,
            zip: parts.zip,
        });
    }

    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
