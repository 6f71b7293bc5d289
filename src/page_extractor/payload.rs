//! Embedded-state payload extraction
//!
//! The catalog serializes its framework state into a `<script>` element as a
//! JSON object keyed by opaque, build-specific cache keys. The listings
//! container is located by shape rather than by key.

use serde_json::Value;
use tracing::{debug, warn};

use super::schema::{RawListing, RawListingPayload};
use crate::scrape_engine::errors::ScrapeError;
use crate::session::RenderSession;

/// Where to find the embedded state on a page
#[derive(Debug, Clone)]
pub struct PayloadSettings {
    pub selector: String,
    pub wait_timeout: std::time::Duration,
}

impl PayloadSettings {
    #[must_use]
    pub fn from_config(config: &crate::config::ScrapeConfig) -> Self {
        Self {
            selector: config.payload_selector().to_string(),
            wait_timeout: config.payload_wait_timeout(),
        }
    }
}

fn has_identity(item: &Value) -> bool {
    let non_empty = |key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    non_empty("title") && non_empty("slug")
}

/// Listing array candidate under one state entry
///
/// Every item must be an object and the first must carry a title and slug.
/// Later items missing either are dropped during selection.
fn container_array(entry: &Value) -> Option<&Vec<Value>> {
    let items = entry.pointer("/b/data/data")?.as_array()?;
    let shaped = items.iter().all(Value::is_object) && items.first().is_none_or(has_identity);
    shaped.then_some(items)
}

fn page_meta_u64(entry: &Value, key: &str) -> Option<u64> {
    let raw = entry.pointer("/b/data")?.get(key)?;
    raw.as_u64()
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Pick the listings container out of a parsed state document
///
/// Every top-level entry whose `b.data.data` is an array of objects led by
/// one carrying non-empty `title` and `slug` strings is a candidate. The largest candidate
/// wins; ties go to the first in document order.
///
/// # Errors
///
/// * [`ScrapeError::PayloadParseError`] if `state` is not a JSON object
/// * [`ScrapeError::NoMatchingContainer`] if no entry has the container shape
pub fn select_container(state: &Value) -> Result<RawListingPayload, ScrapeError> {
    let entries = state.as_object().ok_or_else(|| {
        ScrapeError::PayloadParseError("embedded state is not a JSON object".to_string())
    })?;

    let mut best: Option<(&String, &Value, &Vec<Value>)> = None;
    for (key, entry) in entries {
        let Some(items) = container_array(entry) else {
            continue;
        };
        match best {
            Some((_, _, current)) if current.len() >= items.len() => {}
            _ => best = Some((key, entry, items)),
        }
    }

    let Some((key, entry, items)) = best else {
        return Err(ScrapeError::NoMatchingContainer {
            entries: entries.len(),
        });
    };

    let mut listings = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !has_identity(item) {
            warn!(index, "Skipping listing without title or slug");
            continue;
        }
        match serde_json::from_value::<RawListing>(item.clone()) {
            Ok(listing) => listings.push(listing),
            Err(e) => warn!(index, error = %e, "Skipping listing that failed to deserialize"),
        }
    }

    debug!(
        key = %key,
        listings = listings.len(),
        raw = items.len(),
        "Selected listings container"
    );

    Ok(RawListingPayload {
        source_key: key.clone(),
        listings,
        raw_count: items.len(),
        total_pages: page_meta_u64(entry, "totalPages").and_then(|n| u32::try_from(n).ok()),
        total_items: page_meta_u64(entry, "totalItems"),
    })
}

/// Parse the raw state text and select its listings container
///
/// # Errors
///
/// See [`select_container`]; malformed JSON maps to
/// [`ScrapeError::PayloadParseError`].
pub fn parse_payload(text: &str) -> Result<RawListingPayload, ScrapeError> {
    let state: Value =
        serde_json::from_str(text).map_err(|e| ScrapeError::PayloadParseError(e.to_string()))?;
    select_container(&state)
}

/// Read and parse the embedded state from the current page
///
/// # Errors
///
/// * [`ScrapeError::PayloadNotFound`] if the state element never appears or is empty
/// * any error from [`parse_payload`]
/// * [`ScrapeError::Session`] on session failure
pub async fn extract_payload<S: RenderSession>(
    session: &mut S,
    settings: &PayloadSettings,
) -> Result<RawListingPayload, ScrapeError> {
    let present = session
        .wait_for_element(&settings.selector, settings.wait_timeout)
        .await?;
    if !present {
        return Err(ScrapeError::PayloadNotFound {
            selector: settings.selector.clone(),
        });
    }

    let text = session
        .read_text(&settings.selector)
        .await?
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ScrapeError::PayloadNotFound {
            selector: settings.selector.clone(),
        })?;

    parse_payload(&text)
}
