//! Configuration module for listing extraction
//!
//! This module provides the `ScrapeConfig` struct and its builder for
//! configuring the page pipeline with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{MIN_STABILITY_POLLS, ScrapeConfigBuilder};
pub use types::ScrapeConfig;
