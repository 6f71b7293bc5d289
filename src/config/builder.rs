//! Fluent builder for `ScrapeConfig`
//!
//! Every field has a default, so `ScrapeConfig::builder().build()` yields the
//! catalog the crate was written for. `build()` validates the cross-field
//! invariants the pipeline relies on.

use url::Url;

use super::types::ScrapeConfig;
use crate::scrape_engine::consistency::ValidationThresholds;
use crate::scrape_engine::errors::{ScrapeError, ScrapeResult};
use crate::scrape_engine::recovery::RecoveryAction;
use crate::utils::constants::{
    DEFAULT_BASE_URL, DEFAULT_LISTING_PATH, DEFAULT_LOCATION_FILTER, DEFAULT_OPERATION_FILTER,
    DEFAULT_PAGE_SIZE, DEFAULT_PHOTO_LIMIT, DEFAULT_SORT, DEFAULT_STAGE_FILTER,
    FALLBACK_TOTAL_PAGES, LISTING_CARD_SELECTOR, MAX_PAGES_PER_BATCH, NO_RESULTS_SELECTOR,
    PAGINATOR_SELECTOR, PAYLOAD_SELECTOR,
};

/// Fewest consecutive identical polls accepted as "stable"
pub const MIN_STABILITY_POLLS: u32 = 3;

#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self {
            config: ScrapeConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                listing_path: DEFAULT_LISTING_PATH.to_string(),
                page_size: DEFAULT_PAGE_SIZE,
                sort: DEFAULT_SORT.to_string(),
                operation_filter: DEFAULT_OPERATION_FILTER.to_string(),
                stage_filter: DEFAULT_STAGE_FILTER.to_string(),
                location_filter: DEFAULT_LOCATION_FILTER.to_string(),
                listing_card_selector: LISTING_CARD_SELECTOR.to_string(),
                no_results_selector: NO_RESULTS_SELECTOR.to_string(),
                payload_selector: PAYLOAD_SELECTOR.to_string(),
                paginator_selector: PAGINATOR_SELECTOR.to_string(),
                navigation_timeout_ms: 90_000,
                request_timeout_ms: 15_000,
                content_wait_timeout_ms: 30_000,
                stability_poll_interval_ms: 500,
                stability_required_polls: MIN_STABILITY_POLLS,
                stability_max_polls: 40,
                payload_wait_timeout_ms: 30_000,
                extract_retry_delay_ms: 2_000,
                validation: ValidationThresholds::default(),
                recovery_actions: RecoveryAction::default_order(),
                recovery_base_backoff_ms: 2_000,
                accept_unrecovered: true,
                page_pacing_ms: 1_500,
                max_pages_per_batch: MAX_PAGES_PER_BATCH,
                fallback_total_pages: FALLBACK_TOTAL_PAGES,
                paginator_wait_timeout_ms: 10_000,
                photo_limit: DEFAULT_PHOTO_LIMIT,
                active_only: true,
                headless: true,
            },
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        ScrapeConfigBuilder::default().config
    }
}

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    #[must_use]
    pub fn listing_path(mut self, path: impl Into<String>) -> Self {
        self.config.listing_path = path.into();
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.config.sort = sort.into();
        self
    }

    #[must_use]
    pub fn operation_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.operation_filter = filter.into();
        self
    }

    #[must_use]
    pub fn stage_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.stage_filter = filter.into();
        self
    }

    /// Location filter, already percent-encoded
    #[must_use]
    pub fn location_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.location_filter = filter.into();
        self
    }

    #[must_use]
    pub fn listing_card_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.listing_card_selector = selector.into();
        self
    }

    #[must_use]
    pub fn no_results_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.no_results_selector = selector.into();
        self
    }

    #[must_use]
    pub fn payload_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.payload_selector = selector.into();
        self
    }

    #[must_use]
    pub fn paginator_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.paginator_selector = selector.into();
        self
    }

    #[must_use]
    pub fn navigation_timeout_ms(mut self, ms: u64) -> Self {
        self.config.navigation_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn content_wait_timeout_ms(mut self, ms: u64) -> Self {
        self.config.content_wait_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn stability_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.stability_poll_interval_ms = ms;
        self
    }

    #[must_use]
    pub fn stability_required_polls(mut self, polls: u32) -> Self {
        self.config.stability_required_polls = polls;
        self
    }

    #[must_use]
    pub fn stability_max_polls(mut self, polls: u32) -> Self {
        self.config.stability_max_polls = polls;
        self
    }

    #[must_use]
    pub fn payload_wait_timeout_ms(mut self, ms: u64) -> Self {
        self.config.payload_wait_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn extract_retry_delay_ms(mut self, ms: u64) -> Self {
        self.config.extract_retry_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn validation(mut self, thresholds: ValidationThresholds) -> Self {
        self.config.validation = thresholds;
        self
    }

    #[must_use]
    pub fn recovery_actions(mut self, actions: Vec<RecoveryAction>) -> Self {
        self.config.recovery_actions = actions;
        self
    }

    #[must_use]
    pub fn recovery_base_backoff_ms(mut self, ms: u64) -> Self {
        self.config.recovery_base_backoff_ms = ms;
        self
    }

    #[must_use]
    pub fn accept_unrecovered(mut self, accept: bool) -> Self {
        self.config.accept_unrecovered = accept;
        self
    }

    #[must_use]
    pub fn page_pacing_ms(mut self, ms: u64) -> Self {
        self.config.page_pacing_ms = ms;
        self
    }

    #[must_use]
    pub fn max_pages_per_batch(mut self, pages: u32) -> Self {
        self.config.max_pages_per_batch = pages;
        self
    }

    #[must_use]
    pub fn fallback_total_pages(mut self, pages: u32) -> Self {
        self.config.fallback_total_pages = pages;
        self
    }

    #[must_use]
    pub fn paginator_wait_timeout_ms(mut self, ms: u64) -> Self {
        self.config.paginator_wait_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn photo_limit(mut self, limit: usize) -> Self {
        self.config.photo_limit = limit;
        self
    }

    #[must_use]
    pub fn active_only(mut self, active_only: bool) -> Self {
        self.config.active_only = active_only;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Config`] when the base URL is not an absolute
    /// http(s) URL, the stability window is shorter than
    /// [`MIN_STABILITY_POLLS`] or longer than the poll budget, or a count
    /// that must be positive is zero.
    pub fn build(self) -> ScrapeResult<ScrapeConfig> {
        let config = self.config;

        let base = Url::parse(&config.base_url)
            .map_err(|e| ScrapeError::Config(format!("invalid base_url '{}': {e}", config.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ScrapeError::Config(format!(
                "base_url must be http(s), got '{}'",
                base.scheme()
            )));
        }

        if config.stability_required_polls < MIN_STABILITY_POLLS {
            return Err(ScrapeError::Config(format!(
                "stability_required_polls must be at least {MIN_STABILITY_POLLS}, got {}",
                config.stability_required_polls
            )));
        }
        if config.stability_max_polls < config.stability_required_polls {
            return Err(ScrapeError::Config(format!(
                "stability_max_polls ({}) is below stability_required_polls ({})",
                config.stability_max_polls, config.stability_required_polls
            )));
        }
        if config.page_size == 0 {
            return Err(ScrapeError::Config("page_size must be positive".into()));
        }
        if config.max_pages_per_batch == 0 {
            return Err(ScrapeError::Config(
                "max_pages_per_batch must be positive".into(),
            ));
        }
        if config.fallback_total_pages == 0 {
            return Err(ScrapeError::Config(
                "fallback_total_pages must be positive".into(),
            ));
        }
        config.validation.check().map_err(ScrapeError::Config)?;

        Ok(config)
    }
}
