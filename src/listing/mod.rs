//! Raw listing normalization
//!
//! Turns the loosely-typed listing objects from the embedded state into
//! [`PropertyRecord`]s with a value for every field.

pub mod format;
pub mod record;

use tracing::debug;

use crate::config::ScrapeConfig;
use crate::page_extractor::schema::{RawListing, RawListingPayload};
use crate::utils::{build_listing_photo_urls, listing_url};

pub use format::{format_area, format_count, format_number, format_price, text_or_unavailable};
pub use record::{Coordinate, OperationKind, PropertyRecord};

/// Listing status value kept by the active-only filter
const ACTIVE_STATUS: &str = "active";

/// Normalize one raw listing
#[must_use]
pub fn normalize_listing(raw: &RawListing, base_url: &str, photo_limit: usize) -> PropertyRecord {
    let brokers = raw
        .list_broker
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|b| {
            format!(
                "{} {}",
                b.name.as_deref().unwrap_or_default(),
                b.license.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string()
        })
        .filter(|s| !s.is_empty())
        .collect();

    let photos = build_listing_photo_urls(
        raw.photos
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|p| p.raw_value.as_deref()),
        photo_limit,
    );

    let associate = raw.associate.as_ref();
    let location = raw.location.as_ref();

    PropertyRecord {
        title: text_or_unavailable(raw.title.as_deref()),
        price: format_price(
            raw.price,
            raw.currency.as_ref().and_then(|c| c.value.as_deref()),
        ),
        address: text_or_unavailable(raw.display_address.as_deref()),
        locality: text_or_unavailable(raw.geo_label.as_deref()),
        latitude: location.and_then(|l| l.latitude()).into(),
        longitude: location.and_then(|l| l.longitude()).into(),
        brokers,
        contact_person: text_or_unavailable(associate.and_then(|a| a.name.as_deref())),
        office: text_or_unavailable(associate.and_then(|a| a.office_name.as_deref())),
        dimensions_land: format_area(raw.dimension_land),
        m2_total: format_area(raw.dimension_total_built),
        m2_cover: format_area(raw.dimension_covered),
        ambientes: format_count(raw.total_rooms, "ambientes"),
        banos: format_count(raw.bathrooms, "baños"),
        property_type: text_or_unavailable(
            raw.property_type.as_ref().and_then(|t| t.value.as_deref()),
        ),
        url: listing_url(base_url, raw.slug.as_deref().unwrap_or_default()),
        photos,
        operation: OperationKind::from_id(raw.operation.as_ref().and_then(|o| o.id))
            .label()
            .to_string(),
    }
}

/// Whether a listing passes the active-only filter
///
/// Listings without a status are kept.
#[must_use]
pub fn is_listed(raw: &RawListing) -> bool {
    raw.status().is_none_or(|s| s.eq_ignore_ascii_case(ACTIVE_STATUS))
}

/// Normalize every listing of a page payload, in payload order
#[must_use]
pub fn normalize_page(payload: &RawListingPayload, config: &ScrapeConfig) -> Vec<PropertyRecord> {
    let records: Vec<PropertyRecord> = payload
        .listings
        .iter()
        .filter(|raw| !config.active_only() || is_listed(raw))
        .map(|raw| normalize_listing(raw, config.base_url(), config.photo_limit()))
        .collect();

    if records.len() != payload.listings.len() {
        debug!(
            kept = records.len(),
            total = payload.listings.len(),
            "Filtered out inactive listings"
        );
    }
    records
}
