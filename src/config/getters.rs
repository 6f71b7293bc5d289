//! Getter methods for `ScrapeConfig`

use std::time::Duration;

use super::types::ScrapeConfig;
use crate::scrape_engine::consistency::ValidationThresholds;
use crate::scrape_engine::recovery::RecoveryAction;
use crate::utils::CatalogQuery;

impl ScrapeConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Catalog filters in the shape the URL builder takes
    #[must_use]
    pub fn catalog_query(&self) -> CatalogQuery<'_> {
        CatalogQuery {
            sort: &self.sort,
            operation: &self.operation_filter,
            stages: &self.stage_filter,
            location: &self.location_filter,
        }
    }

    #[must_use]
    pub fn listing_card_selector(&self) -> &str {
        &self.listing_card_selector
    }

    #[must_use]
    pub fn no_results_selector(&self) -> &str {
        &self.no_results_selector
    }

    #[must_use]
    pub fn payload_selector(&self) -> &str {
        &self.payload_selector
    }

    #[must_use]
    pub fn paginator_selector(&self) -> &str {
        &self.paginator_selector
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn content_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.content_wait_timeout_ms)
    }

    #[must_use]
    pub fn stability_poll_interval(&self) -> Duration {
        Duration::from_millis(self.stability_poll_interval_ms)
    }

    #[must_use]
    pub fn stability_required_polls(&self) -> u32 {
        self.stability_required_polls
    }

    #[must_use]
    pub fn stability_max_polls(&self) -> u32 {
        self.stability_max_polls
    }

    #[must_use]
    pub fn payload_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.payload_wait_timeout_ms)
    }

    #[must_use]
    pub fn extract_retry_delay(&self) -> Duration {
        Duration::from_millis(self.extract_retry_delay_ms)
    }

    #[must_use]
    pub fn validation(&self) -> &ValidationThresholds {
        &self.validation
    }

    #[must_use]
    pub fn recovery_actions(&self) -> &[RecoveryAction] {
        &self.recovery_actions
    }

    #[must_use]
    pub fn recovery_base_backoff(&self) -> Duration {
        Duration::from_millis(self.recovery_base_backoff_ms)
    }

    #[must_use]
    pub fn accept_unrecovered(&self) -> bool {
        self.accept_unrecovered
    }

    #[must_use]
    pub fn page_pacing(&self) -> Duration {
        Duration::from_millis(self.page_pacing_ms)
    }

    #[must_use]
    pub fn max_pages_per_batch(&self) -> u32 {
        self.max_pages_per_batch
    }

    #[must_use]
    pub fn fallback_total_pages(&self) -> u32 {
        self.fallback_total_pages
    }

    #[must_use]
    pub fn paginator_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.paginator_wait_timeout_ms)
    }

    #[must_use]
    pub fn photo_limit(&self) -> usize {
        self.photo_limit
    }

    #[must_use]
    pub fn active_only(&self) -> bool {
        self.active_only
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }
}
