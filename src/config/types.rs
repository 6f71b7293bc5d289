//! Core configuration types for listing extraction
//!
//! `ScrapeConfig` carries every tunable of the page pipeline: catalog URL
//! template parts, selectors, timeouts, stability and validation thresholds,
//! the recovery order and batch pacing. Durations are stored as milliseconds
//! and exposed as `Duration` through the getters.

use serde::{Deserialize, Serialize};

use crate::scrape_engine::consistency::ValidationThresholds;
use crate::scrape_engine::recovery::RecoveryAction;

/// Main configuration struct for listing extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Site root. **INVARIANT:** parses as an absolute http(s) URL (checked in builder).
    pub(crate) base_url: String,
    pub(crate) listing_path: String,
    pub(crate) page_size: u32,
    pub(crate) sort: String,
    pub(crate) operation_filter: String,
    pub(crate) stage_filter: String,
    /// Inserted verbatim into the query string
    pub(crate) location_filter: String,

    pub(crate) listing_card_selector: String,
    pub(crate) no_results_selector: String,
    pub(crate) payload_selector: String,
    pub(crate) paginator_selector: String,

    /// Deadline for navigation to reach DOMContentLoaded
    ///
    /// Default: 90 seconds
    pub(crate) navigation_timeout_ms: u64,

    /// Deadline for single round-trip session operations (script evaluation,
    /// reading text) inside the Chromium session
    ///
    /// Default: 15 seconds
    pub(crate) request_timeout_ms: u64,

    /// How long to wait for the first listing card or the no-results marker
    ///
    /// Default: 30 seconds
    pub(crate) content_wait_timeout_ms: u64,

    /// Interval between rendered-count polls
    ///
    /// Default: 500 ms
    pub(crate) stability_poll_interval_ms: u64,

    /// Consecutive identical counts that make a count stable. Minimum 3.
    ///
    /// Default: 3
    pub(crate) stability_required_polls: u32,

    /// Polls before giving up with a render timeout
    ///
    /// Default: 40
    pub(crate) stability_max_polls: u32,

    /// How long to wait for the embedded state element
    ///
    /// Default: 30 seconds
    pub(crate) payload_wait_timeout_ms: u64,

    /// Delay before the single extraction retry
    ///
    /// Default: 2 seconds
    pub(crate) extract_retry_delay_ms: u64,

    pub(crate) validation: ValidationThresholds,

    /// Recovery actions tried in order on a critical mismatch
    ///
    /// Default: wait longer, reload, re-navigate
    pub(crate) recovery_actions: Vec<RecoveryAction>,

    /// Base delay of the wait-longer action; doubles on each repeat
    ///
    /// Default: 2 seconds
    pub(crate) recovery_base_backoff_ms: u64,

    /// Accept a page whose mismatch survived every recovery action,
    /// flagged low-confidence, instead of failing it
    ///
    /// Default: true
    pub(crate) accept_unrecovered: bool,

    /// Pause between consecutive pages of a batch
    ///
    /// Default: 1.5 seconds
    pub(crate) page_pacing_ms: u64,

    /// Hard ceiling on pages per batch request
    ///
    /// Default: 50
    pub(crate) max_pages_per_batch: u32,

    /// Page count reported when discovery cannot read one
    ///
    /// Default: 175
    pub(crate) fallback_total_pages: u32,

    /// How long discovery waits for the pagination summary
    ///
    /// Default: 10 seconds
    pub(crate) paginator_wait_timeout_ms: u64,

    /// Photo URLs kept per record
    ///
    /// Default: 3
    pub(crate) photo_limit: usize,

    /// Keep only listings whose status is `active`
    ///
    /// Default: true
    pub(crate) active_only: bool,

    /// Run Chromium without a window
    ///
    /// Default: true
    pub(crate) headless: bool,
}
