//! Batch orchestration over a page range
//!
//! Drives the page state machine once per page, strictly in order, on a
//! single session. Stops at the first empty page; failed pages are logged and
//! skipped.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::{ScrapeError, ScrapeResult};
use super::page_machine::{PageOutcome, PageTarget, catalog_page_url, run_page};
use super::progress::BatchProgress;
use crate::config::ScrapeConfig;
use crate::listing::PropertyRecord;
use crate::session::RenderSession;

/// Inclusive page range to scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeBatchRequest {
    pub start_page: u32,
    pub end_page: u32,
    /// Overrides the configured page size for this batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl ScrapeBatchRequest {
    #[must_use]
    pub fn new(start_page: u32, end_page: u32) -> Self {
        Self {
            start_page,
            end_page,
            page_size: None,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Validate and clamp the request against the batch ceiling
    ///
    /// A span wider than `ceiling` pages is narrowed to
    /// `start_page + ceiling - 1` with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidRequest`] when `end_page < start_page`
    /// or the page size override is zero.
    pub fn clamped(self, ceiling: u32) -> ScrapeResult<Self> {
        if self.end_page < self.start_page {
            return Err(ScrapeError::InvalidRequest(format!(
                "end page {} is before start page {}",
                self.end_page, self.start_page
            )));
        }
        if self.page_size == Some(0) {
            return Err(ScrapeError::InvalidRequest(
                "page size must be positive".to_string(),
            ));
        }

        let ceiling = ceiling.max(1);
        let last_allowed = self.start_page.saturating_add(ceiling - 1);
        if self.end_page > last_allowed {
            warn!(
                requested_end = self.end_page,
                clamped_end = last_allowed,
                ceiling,
                "Page range exceeds batch ceiling, clamping"
            );
            return Ok(Self {
                end_page: last_allowed,
                ..self
            });
        }
        Ok(self)
    }

    /// Number of pages in the range
    #[must_use]
    pub fn span(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page).saturating_add(1)
    }
}

/// Why a page was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    pub page: u32,
    pub kind: String,
    pub message: String,
}

/// Everything a batch produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub request: ScrapeBatchRequest,
    /// Records in page order, then payload order within a page
    pub records: Vec<PropertyRecord>,
    pub pages_attempted: Vec<u32>,
    pub pages_accepted: Vec<u32>,
    pub pages_low_confidence: Vec<u32>,
    pub failures: Vec<PageFailure>,
    /// The empty page that ended the batch early
    pub stopped_on_empty: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    fn start(request: ScrapeBatchRequest) -> Self {
        let now = Utc::now();
        Self {
            request,
            records: Vec::new(),
            pages_attempted: Vec::new(),
            pages_accepted: Vec::new(),
            pages_low_confidence: Vec::new(),
            failures: Vec::new(),
            stopped_on_empty: None,
            started_at: now,
            finished_at: now,
        }
    }

    #[must_use]
    pub fn pages_failed(&self) -> Vec<u32> {
        self.failures.iter().map(|f| f.page).collect()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<PropertyRecord> {
        self.records
    }
}

/// Delay before the next page: the configured pacing plus up to a quarter of
/// it in random jitter
fn pacing_delay(base: Duration) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    if base_ms == 0 {
        return Duration::ZERO;
    }
    let jitter = rand::rng().random_range(0..=base_ms / 4);
    Duration::from_millis(base_ms.saturating_add(jitter))
}

/// Run a batch on one session
///
/// Page-level failures never surface as errors; they are recorded in the
/// report and the batch moves on.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidRequest`] if the request is malformed. No
/// page is attempted in that case.
pub async fn run_batch<S, P>(
    session: &mut S,
    config: &ScrapeConfig,
    request: ScrapeBatchRequest,
    progress: &P,
) -> ScrapeResult<BatchReport>
where
    S: RenderSession,
    P: BatchProgress,
{
    let request = request.clamped(config.max_pages_per_batch())?;
    let page_size = request.page_size.unwrap_or_else(|| config.page_size());
    let mut report = BatchReport::start(request);

    info!(
        start = request.start_page,
        end = request.end_page,
        page_size,
        "Starting batch"
    );
    progress.report_batch_started(request.start_page, request.end_page);

    for page in request.start_page..=request.end_page {
        if page > request.start_page {
            tokio::time::sleep(pacing_delay(config.page_pacing())).await;
        }

        let url = catalog_page_url(config, page, page_size).unwrap_or_default();
        progress.report_page_started(page, &url);
        report.pages_attempted.push(page);

        let target = PageTarget::new(page, config).with_page_size(page_size);
        match run_page(session, config, target).await {
            PageOutcome::Accepted(accepted) => {
                progress.report_page_accepted(page, accepted.records.len(), accepted.low_confidence);
                report.pages_accepted.push(page);
                if accepted.low_confidence {
                    report.pages_low_confidence.push(page);
                }
                report.records.extend(accepted.records);
            }
            PageOutcome::Empty { .. } => {
                info!(page, "Empty page, stopping batch");
                progress.report_page_empty(page);
                report.stopped_on_empty = Some(page);
                break;
            }
            PageOutcome::Failed(error) => {
                warn!(page, kind = error.kind(), error = %error, "Page failed, continuing");
                progress.report_page_failed(page, &error);
                report.failures.push(PageFailure {
                    page,
                    kind: error.kind().to_string(),
                    message: error.to_string(),
                });
            }
        }
    }

    report.finished_at = Utc::now();
    info!(
        records = report.records.len(),
        attempted = report.pages_attempted.len(),
        failed = report.failures.len(),
        "Batch finished"
    );
    progress.report_batch_completed(report.records.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        let err = ScrapeBatchRequest::new(5, 2).clamped(50).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidRequest(_)));
    }

    #[test]
    fn clamps_to_ceiling() {
        let req = ScrapeBatchRequest::new(10, 200).clamped(50).unwrap();
        assert_eq!(req.end_page, 59);
        assert_eq!(req.span(), 50);
    }

    #[test]
    fn narrow_range_is_untouched() {
        let req = ScrapeBatchRequest::new(0, 2).clamped(50).unwrap();
        assert_eq!(req, ScrapeBatchRequest::new(0, 2));
        assert_eq!(req.span(), 3);
    }

    #[test]
    fn zero_page_size_override_rejected() {
        assert!(ScrapeBatchRequest::new(0, 1).with_page_size(0).clamped(50).is_err());
    }

    #[test]
    fn pacing_jitter_is_bounded() {
        for _ in 0..50 {
            let d = pacing_delay(Duration::from_millis(1000));
            assert!(d >= Duration::from_millis(1000));
            assert!(d <= Duration::from_millis(1250));
        }
        assert_eq!(pacing_delay(Duration::ZERO), Duration::ZERO);
    }
}
