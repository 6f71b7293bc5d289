//! URL construction for catalog pages, listings and photos.
//!
//! All functions here are pure string transforms; nothing touches the network.

use url::Url;

use super::constants::{CDN_BASE, DEFAULT_IMAGE_EXT, DEFAULT_IMAGE_SIZE};

/// Filter and ordering parameters of a catalog page URL
#[derive(Debug, Clone, Copy)]
pub struct CatalogQuery<'a> {
    pub sort: &'a str,
    pub operation: &'a str,
    pub stages: &'a str,
    /// Inserted verbatim; callers pass it already percent-encoded
    pub location: &'a str,
}

/// Build the URL of one catalog page
///
/// The query string is assembled by hand: the catalog expects the literal
/// `in:` prefixes and the pre-encoded location filter, which form encoding
/// would mangle.
pub fn listing_page_url(
    base_url: &str,
    listing_path: &str,
    page: u32,
    page_size: u32,
    query: &CatalogQuery<'_>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?.join(listing_path)?;
    url.set_query(Some(&format!(
        "page={page}&pageSize={page_size}&sort={}&in:operationId={}&in:eStageId={}&locations={}",
        query.sort, query.operation, query.stages, query.location
    )));
    Ok(url)
}

/// Canonical public URL of a listing
#[must_use]
pub fn listing_url(base_url: &str, slug: &str) -> String {
    format!("{}/listings/{}", base_url.trim_end_matches('/'), slug)
}

/// Turn a raw photo storage path into a CDN URL with the default size and format
///
/// Returns `None` for paths with fewer than three segments or a root other
/// than `listings`.
#[must_use]
pub fn raw_to_cdn_url(raw_value: &str) -> Option<String> {
    raw_to_cdn_url_with(raw_value, DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_EXT)
}

/// Same as [`raw_to_cdn_url`] with an explicit size token and format
#[must_use]
pub fn raw_to_cdn_url_with(raw_value: &str, size: &str, ext: &str) -> Option<String> {
    let normalized = raw_value.replace('\\', "/");
    let mut parts = normalized.split('/').filter(|s| !s.is_empty());

    let root = parts.next()?;
    let listing_id = parts.next()?;
    let photo_id = parts.next()?;

    if root != "listings" {
        return None;
    }

    Some(format!(
        "{CDN_BASE}/{root}/{listing_id}/{size}/{photo_id}.{ext}"
    ))
}

/// Build up to `limit` distinct photo URLs, preserving input order
///
/// Malformed raw values are skipped.
pub fn build_listing_photo_urls<'a, I>(raw_values: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut urls: Vec<String> = Vec::with_capacity(limit);
    for raw in raw_values {
        if urls.len() >= limit {
            break;
        }
        if let Some(url) = raw_to_cdn_url(raw)
            && !urls.contains(&url)
        {
            urls.push(url);
        }
    }
    urls
}
