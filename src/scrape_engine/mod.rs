//! Listing extraction engine
//!
//! Validation, recovery, the per-page state machine and batch orchestration.

pub mod consistency;
pub mod errors;
pub mod execution;
pub mod orchestrator;
pub mod page_machine;
pub mod pagination;
pub mod progress;
pub mod recovery;

pub use consistency::{Severity, ValidationThresholds, ValidationVerdict, validate_counts};
pub use errors::{ScrapeError, ScrapeResult};
pub use execution::{discover_total_pages_with_pool, scrape_listings, scrape_listings_with_progress};
pub use orchestrator::{BatchReport, PageFailure, ScrapeBatchRequest, run_batch};
pub use page_machine::{AcceptedPage, PageOutcome, PageTarget, catalog_page_url, run_page};
pub use pagination::{discover_total_pages, parse_paginator_total};
pub use progress::{BatchProgress, NoOpProgress};
pub use recovery::{RecoveryAction, RecoveryStrategist};
