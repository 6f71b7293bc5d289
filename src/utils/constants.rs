//! Shared configuration constants for listing_scrape
//!
//! Default values used by the config builder and the URL helpers, kept in one
//! place so tests and the binary agree on them.

/// Site root for listing pages and canonical listing URLs
pub const DEFAULT_BASE_URL: &str = "https://www.remax.com.ar";

/// Path of the paginated catalog, relative to the base URL
pub const DEFAULT_LISTING_PATH: &str = "listings/buy";

/// Listings per catalog page
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Newest listings first
pub const DEFAULT_SORT: &str = "-createdAt";

/// `in:operationId` filter (1 = sale)
pub const DEFAULT_OPERATION_FILTER: &str = "1";

/// `in:eStageId` filter
pub const DEFAULT_STAGE_FILTER: &str = "0,1,2,3,4";

/// `locations` filter, already percent-encoded and inserted verbatim
pub const DEFAULT_LOCATION_FILTER: &str = "in:CB@C%C3%B3rdoba::::::";

/// Hard ceiling on pages per batch request
///
/// Bounds the worst-case run time of a single request. Wider requests are
/// clamped, not rejected.
pub const MAX_PAGES_PER_BATCH: u32 = 50;

/// Total page count reported when discovery cannot read one from the site
pub const FALLBACK_TOTAL_PAGES: u32 = 175;

/// Photo URLs kept per listing
pub const DEFAULT_PHOTO_LIMIT: usize = 3;

/// CDN host serving listing photos
pub const CDN_BASE: &str = "https://d1acdg20u0pmxj.cloudfront.net";

/// Image size token understood by the CDN
pub const DEFAULT_IMAGE_SIZE: &str = "AUTOx860";

/// Image format served by the CDN
pub const DEFAULT_IMAGE_EXT: &str = "webp";

/// Embedded framework state blob
pub const PAYLOAD_SELECTOR: &str = "script#ng-state";

/// One rendered listing card
pub const LISTING_CARD_SELECTOR: &str = "qr-card-property";

/// Marker rendered by the catalog when a query has no results
pub const NO_RESULTS_SELECTOR: &str = ".no-results";

/// Pagination summary ("Página 1 de 175"), only visible at mobile widths
pub const PAGINATOR_SELECTOR: &str = ".p-container-paginator p";

/// Sentinel for fields the raw listing does not carry
pub const UNAVAILABLE: &str = "No disponible";

/// Sentinel price when no usable price/currency pair exists
pub const PRICE_ON_REQUEST: &str = "Consultar";

/// Desktop Chrome user agent presented to the catalog
///
/// Matches the client identity the catalog was profiled with. Update together
/// with the launch flags in `browser_setup`.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Desktop viewport
pub const DESKTOP_VIEWPORT: (u32, u32) = (1920, 1080);

/// Mobile viewport; the paginator carries `hide-gt-sm` and is hidden above it
pub const MOBILE_VIEWPORT: (u32, u32) = (390, 844);
