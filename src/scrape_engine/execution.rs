//! Entry points that run on the shared browser
//!
//! These lease the pool's browser, open one tab, run the batch or discovery
//! on it and close the tab. Only failing to get a browser is an error.

use tracing::warn;

use super::errors::ScrapeResult;
use super::orchestrator::{BatchReport, ScrapeBatchRequest, run_batch};
use super::pagination::discover_total_pages;
use super::progress::{BatchProgress, NoOpProgress};
use crate::browser_pool::{SessionLease, SessionPool};
use crate::config::ScrapeConfig;
use crate::scrape_engine::errors::ScrapeError;
use crate::session::{ChromiumSession, RenderSession};

async fn open_tab(lease: &mut SessionLease, config: &ScrapeConfig) -> ScrapeResult<ChromiumSession> {
    match lease.open_session(config.request_timeout()).await {
        Ok(session) => Ok(session),
        Err(e) => {
            if e.is_disconnect() {
                lease.mark_unusable();
            }
            Err(ScrapeError::SessionUnavailable(format!("cannot open tab: {e}")))
        }
    }
}

async fn close_tab(session: ChromiumSession, lease: &mut SessionLease) {
    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close tab");
        if e.is_disconnect() {
            lease.mark_unusable();
        }
    }
}

/// Scrape a page range with progress callbacks
///
/// # Errors
///
/// * [`ScrapeError::InvalidRequest`] for a malformed range; checked before a
///   browser is leased
/// * [`ScrapeError::SessionUnavailable`] if no browser or tab could be had
pub async fn scrape_listings_with_progress<P: BatchProgress>(
    pool: &SessionPool,
    config: &ScrapeConfig,
    request: ScrapeBatchRequest,
    progress: &P,
) -> ScrapeResult<BatchReport> {
    let request = request.clamped(config.max_pages_per_batch())?;

    let mut lease = pool.acquire().await?;
    let mut session = open_tab(&mut lease, config).await?;

    let report = run_batch(&mut session, config, request, progress).await;

    close_tab(session, &mut lease).await;
    lease.release().await;
    report
}

/// Scrape a page range on the pool's browser
///
/// # Errors
///
/// See [`scrape_listings_with_progress`].
pub async fn scrape_listings(
    pool: &SessionPool,
    config: &ScrapeConfig,
    request: ScrapeBatchRequest,
) -> ScrapeResult<BatchReport> {
    scrape_listings_with_progress(pool, config, request, &NoOpProgress).await
}

/// Discover the total page count on the pool's browser
///
/// Returns the configured fallback if no browser can be leased.
pub async fn discover_total_pages_with_pool(pool: &SessionPool, config: &ScrapeConfig) -> u32 {
    let mut lease = match pool.acquire().await {
        Ok(lease) => lease,
        Err(e) => {
            warn!(error = %e, "No browser for discovery, using fallback page count");
            return config.fallback_total_pages();
        }
    };

    let mut session = match open_tab(&mut lease, config).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "No tab for discovery, using fallback page count");
            lease.release().await;
            return config.fallback_total_pages();
        }
    };

    let total = discover_total_pages(&mut session, config).await;
    close_tab(session, &mut lease).await;
    lease.release().await;
    total
}
