pub mod browser_pool;
pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod listing;
pub mod page_extractor;
pub mod scrape_engine;
pub mod session;
pub mod utils;

pub use browser_pool::{SessionLease, SessionPool, SessionPoolConfig};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use listing::{Coordinate, OperationKind, PropertyRecord};
pub use page_extractor::{RawListing, RawListingPayload};
pub use scrape_engine::{
    AcceptedPage, BatchProgress, BatchReport, NoOpProgress, PageOutcome, RecoveryAction,
    ScrapeBatchRequest, ScrapeError, ScrapeResult, Severity, ValidationThresholds,
    ValidationVerdict, discover_total_pages, discover_total_pages_with_pool, run_batch, run_page,
    scrape_listings, scrape_listings_with_progress, validate_counts,
};
pub use session::{ChromiumSession, ClientProfile, NavigateOptions, RenderSession, SessionError};
pub use utils::{listing_page_url, raw_to_cdn_url};

/// Scrape `[start_page, end_page]` on a fresh browser and return the records
///
/// Launches a browser for this call only and shuts it down afterwards.
///
/// # Errors
///
/// See [`scrape_listings`].
pub async fn scrape_range(
    config: &ScrapeConfig,
    start_page: u32,
    end_page: u32,
) -> ScrapeResult<Vec<PropertyRecord>> {
    let pool = SessionPool::new(SessionPoolConfig::from_scrape_config(config));
    let result = scrape_listings(&pool, config, ScrapeBatchRequest::new(start_page, end_page)).await;
    pool.shutdown().await;
    result.map(BatchReport::into_records)
}
