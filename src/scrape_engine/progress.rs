//! Progress reporting for batch runs
//!
//! Callers that want per-page feedback implement [`BatchProgress`]; everyone
//! else passes [`NoOpProgress`].

use super::errors::ScrapeError;

/// Lifecycle callbacks fired by the batch orchestrator
pub trait BatchProgress: Send + Sync {
    /// The batch is about to start; `end` is already clamped
    fn report_batch_started(&self, start: u32, end: u32);

    /// Navigation to a catalog page is about to start
    fn report_page_started(&self, page: u32, url: &str);

    /// A page was accepted
    fn report_page_accepted(&self, page: u32, records: usize, low_confidence: bool);

    /// A page had no listings; the batch stops after this call
    fn report_page_empty(&self, page: u32);

    /// A page failed; the batch continues
    fn report_page_failed(&self, page: u32, error: &ScrapeError);

    /// The batch finished
    fn report_batch_completed(&self, total_records: usize);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl BatchProgress for NoOpProgress {
    #[inline(always)]
    fn report_batch_started(&self, _start: u32, _end: u32) {}

    #[inline(always)]
    fn report_page_started(&self, _page: u32, _url: &str) {}

    #[inline(always)]
    fn report_page_accepted(&self, _page: u32, _records: usize, _low_confidence: bool) {}

    #[inline(always)]
    fn report_page_empty(&self, _page: u32) {}

    #[inline(always)]
    fn report_page_failed(&self, _page: u32, _error: &ScrapeError) {}

    #[inline(always)]
    fn report_batch_completed(&self, _total_records: usize) {}
}
