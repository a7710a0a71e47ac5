//! Tolerant HTML field extraction for search cards and detail pages.
//!
//! Every lookup is independently optional: a card missing any sub-element
//! still produces a record with `None` for that field only. The one
//! exception is the "No Locations found" placeholder card, which is not a
//! facility at all and is dropped entirely.

use scraper::{ElementRef, Html, Selector};

use crate::types::FacilityCard;

/// Placeholder text the portal renders inside a card when a search query
/// matches nothing.
pub const NO_RESULTS_SENTINEL: &str = "No Locations found";

/// Sentinel stored in [`FacilityCard::hours`] when a card carries no
/// opening-hours metadata.
pub const HOURS_UNAVAILABLE: &str = "Hours not available";

/// Everything extracted from one search results page.
pub struct PageExtract {
    /// Cards present on the page, including "no results" placeholders.
    pub card_count: usize,
    /// Facility records, placeholders excluded.
    pub records: Vec<FacilityCard>,
}

struct CardSelectors {
    card: Selector,
    title: Selector,
    type_label: Selector,
    service: Selector,
    address: Selector,
    street: Selector,
    locality: Selector,
    region: Selector,
    postal: Selector,
    hours: Selector,
}

impl CardSelectors {
    fn new() -> Self {
        let parse = |s: &str| Selector::parse(s).expect("valid selector");
        Self {
            card: parse("li.location-results__list-item.search-card"),
            title: parse("h3.search-card__title"),
            type_label: parse("p.search-card__type-label"),
            service: parse("span.kiosk-callout"),
            address: parse(r#"[itemprop="address"]"#),
            street: parse(r#"[itemprop="streetAddress"]"#),
            locality: parse(r#"[itemprop="addressLocality"]"#),
            region: parse(r#"[itemprop="addressRegion"]"#),
            postal: parse(r#"[itemprop="postalCode"]"#),
            hours: parse(r#"meta[itemprop="openingHours"]"#),
        }
    }
}

/// Extracts all facility cards from a search results page.
///
/// `card_count` includes sentinel placeholders so the crawler can tell an
/// empty page from an all-placeholder page; `records` never contains them.
#[must_use]
pub fn extract_cards(html: &str) -> PageExtract {
    let document = Html::parse_document(html);
    let selectors = CardSelectors::new();

    let mut card_count = 0;
    let mut records = Vec::new();

    for card in document.select(&selectors.card) {
        card_count += 1;
        let text: String = card.text().collect();
        if text.contains(NO_RESULTS_SENTINEL) {
            continue;
        }
        records.push(extract_card(card, &selectors));
    }

    PageExtract {
        card_count,
        records,
    }
}

fn extract_card(card: ElementRef<'_>, selectors: &CardSelectors) -> FacilityCard {
    let name = card
        .select(&selectors.title)
        .next()
        .map(|el| collapse_text(el))
        .filter(|s| !s.is_empty());

    let type_label = card.select(&selectors.type_label).next();

    // The type label nests service callout spans; the category is its
    // direct text nodes only.
    let location_type = type_label
        .map(|el| {
            el.children()
                .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|s| !s.is_empty());

    let services = type_label
        .map(|el| {
            el.select(&selectors.service)
                .map(|s| collapse_text(s))
                .collect()
        })
        .unwrap_or_default();

    let detail_url = card.value().attr("data-detail-url").map(str::to_string);
    let latitude = card
        .value()
        .attr("data-lat")
        .and_then(|v| v.trim().parse::<f64>().ok());
    let longitude = card
        .value()
        .attr("data-lng")
        .and_then(|v| v.trim().parse::<f64>().ok());

    let address = extract_address(card, selectors);

    let hours = card
        .select(&selectors.hours)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or(HOURS_UNAVAILABLE)
        .to_string();

    FacilityCard {
        name,
        location_type,
        services,
        latitude,
        longitude,
        detail_url,
        address,
        hours,
    }
}

/// Recomposes the schema.org address parts into the composite
/// `"street, city, STATE ZIP"` form the normalizer decomposes.
///
/// Missing parts are left empty and stray separators trimmed, so a card with
/// only a street still yields `Some("123 Main St")` while a card with no
/// address block at all yields `None`.
fn extract_address(card: ElementRef<'_>, selectors: &CardSelectors) -> Option<String> {
    let scope = card.select(&selectors.address).next()?;
    let part = |selector: &Selector| {
        scope
            .select(selector)
            .next()
            .map(|el| collapse_text(el))
            .unwrap_or_default()
    };

    let street = part(&selectors.street);
    let locality = part(&selectors.locality);
    let region = part(&selectors.region);
    let postal = part(&selectors.postal);

    let composed = format!("{street}, {locality}, {region} {postal}");
    let composed = composed.trim_matches(|c| c == ',' || c == ' ').to_string();
    if composed.is_empty() {
        None
    } else {
        Some(composed)
    }
}

/// Extracts the wait metrics from a facility detail page: the first two
/// `span.p.medium` values, in order (appointment wait, then walk-in wait).
#[must_use]
pub fn extract_wait_times(html: &str) -> (Option<f64>, Option<f64>) {
    let document = Html::parse_document(html);
    let selector = Selector::parse("span.p.medium").expect("valid selector");

    let mut values = document
        .select(&selector)
        .map(|el| parse_wait_value(&el.text().collect::<String>()));

    (values.next().flatten(), values.next().flatten())
}

/// Parses one posted wait value.
///
/// `"closed"` in any case means not available, as does any other
/// non-numeric text; numeric text is minutes.
#[must_use]
pub fn parse_wait_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("closed") {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn collapse_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CARD: &str = r#"
        <html><body><ul>
        <li class="location-results__list-item search-card"
            data-detail-url="https://www.dmv.ca.gov/portal/field-office/santa-monica/"
            data-lat="34.0195" data-lng="-118.4912">
            <h3 class="search-card__title">Santa Monica</h3>
            <p class="search-card__type-label">
                Field Office
                <span class="kiosk-callout">Self-service kiosk</span>
            </p>
            <div itemprop="address">
                <span itemprop="streetAddress">2235 Colorado Ave</span>
                <span itemprop="addressLocality">Santa Monica</span>
                <span itemprop="addressRegion">CA</span>
                <span itemprop="postalCode">90404</span>
            </div>
            <meta itemprop="openingHours" content="Mo-Fr 08:00-17:00">
        </li>
        </ul></body></html>
    "#;

    // -----------------------------------------------------------------------
    // Card extraction
    // -----------------------------------------------------------------------

    #[test]
    fn extracts_all_fields_from_a_full_card() {
        let extract = extract_cards(FULL_CARD);
        assert_eq!(extract.card_count, 1);
        assert_eq!(extract.records.len(), 1);

        let card = &extract.records[0];
        assert_eq!(card.name.as_deref(), Some("Santa Monica"));
        assert_eq!(card.location_type.as_deref(), Some("Field Office"));
        assert_eq!(card.services, vec!["Self-service kiosk".to_string()]);
        assert_eq!(
            card.detail_url.as_deref(),
            Some("https://www.dmv.ca.gov/portal/field-office/santa-monica/")
        );
        assert!((card.latitude.unwrap() - 34.0195).abs() < 1e-9);
        assert!((card.longitude.unwrap() - (-118.4912)).abs() < 1e-9);
        assert_eq!(
            card.address.as_deref(),
            Some("2235 Colorado Ave, Santa Monica, CA 90404")
        );
        assert_eq!(card.hours, "Mo-Fr 08:00-17:00");
    }

    #[test]
    fn bare_card_yields_none_fields_not_an_error() {
        let html = r#"<li class="location-results__list-item search-card"></li>"#;
        let extract = extract_cards(html);
        assert_eq!(extract.records.len(), 1);

        let card = &extract.records[0];
        assert_eq!(card.name, None);
        assert_eq!(card.location_type, None);
        assert!(card.services.is_empty());
        assert_eq!(card.detail_url, None);
        assert_eq!(card.latitude, None);
        assert_eq!(card.address, None);
        assert_eq!(card.hours, HOURS_UNAVAILABLE);
    }

    #[test]
    fn sentinel_card_is_excluded_entirely() {
        let html = r#"
            <li class="location-results__list-item search-card">
                <p>No Locations found near your search.</p>
            </li>
        "#;
        let extract = extract_cards(html);
        assert_eq!(extract.card_count, 1, "the placeholder still counts as a card");
        assert!(
            extract.records.is_empty(),
            "the placeholder must not become a record with null fields"
        );
    }

    #[test]
    fn mixed_page_keeps_real_cards_and_drops_the_sentinel() {
        let html = format!(
            r#"{FULL_CARD}<li class="location-results__list-item search-card">No Locations found</li>"#
        );
        let extract = extract_cards(&html);
        assert_eq!(extract.card_count, 2);
        assert_eq!(extract.records.len(), 1);
        assert_eq!(extract.records[0].name.as_deref(), Some("Santa Monica"));
    }

    #[test]
    fn unparseable_coordinates_become_none() {
        let html = r#"
            <li class="location-results__list-item search-card"
                data-lat="not-a-number" data-lng="">
            </li>
        "#;
        let card = &extract_cards(html).records[0];
        assert_eq!(card.latitude, None);
        assert_eq!(card.longitude, None);
    }

    #[test]
    fn partial_address_composes_without_stray_separators() {
        let html = r#"
            <li class="location-results__list-item search-card">
                <div itemprop="address">
                    <span itemprop="streetAddress">123 Main St</span>
                </div>
            </li>
        "#;
        let card = &extract_cards(html).records[0];
        assert_eq!(card.address.as_deref(), Some("123 Main St"));
    }

    #[test]
    fn type_label_excludes_nested_service_spans() {
        let card = &extract_cards(FULL_CARD).records[0];
        assert_eq!(card.location_type.as_deref(), Some("Field Office"));
        assert!(!card.location_type.as_deref().unwrap().contains("kiosk"));
    }

    // -----------------------------------------------------------------------
    // Wait value parsing
    // -----------------------------------------------------------------------

    #[test]
    fn numeric_wait_text_parses_to_minutes() {
        assert_eq!(parse_wait_value("12"), Some(12.0));
        assert_eq!(parse_wait_value(" 7.5 "), Some(7.5));
    }

    #[test]
    fn closed_is_not_available_in_any_case() {
        assert_eq!(parse_wait_value("closed"), None);
        assert_eq!(parse_wait_value("Closed"), None);
        assert_eq!(parse_wait_value("CLOSED"), None);
    }

    #[test]
    fn garbage_degrades_to_not_available() {
        assert_eq!(parse_wait_value("garbage"), None);
        assert_eq!(parse_wait_value(""), None);
    }

    #[test]
    fn detail_page_yields_both_metrics_in_order() {
        let html = r#"
            <div><span class="p medium">15</span></div>
            <div><span class="p medium">45</span></div>
        "#;
        assert_eq!(extract_wait_times(html), (Some(15.0), Some(45.0)));
    }

    #[test]
    fn detail_page_with_one_closed_metric() {
        let html = r#"
            <span class="p medium">Closed</span>
            <span class="p medium">30</span>
        "#;
        assert_eq!(extract_wait_times(html), (None, Some(30.0)));
    }

    #[test]
    fn detail_page_without_wait_spans_yields_neither_metric() {
        assert_eq!(extract_wait_times("<html><body></body></html>"), (None, None));
    }
}
