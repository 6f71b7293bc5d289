//! Tests for the configuration builder

use std::time::Duration;

use listing_scrape::config::{MIN_STABILITY_POLLS, ScrapeConfig};
use listing_scrape::scrape_engine::{RecoveryAction, ValidationThresholds};
use listing_scrape::ScrapeError;

#[test]
fn test_defaults_match_the_catalog() {
    let config = ScrapeConfig::builder().build().unwrap();

    assert_eq!(config.base_url(), "https://www.remax.com.ar");
    assert_eq!(config.page_size(), 24);
    assert_eq!(config.navigation_timeout(), Duration::from_secs(90));
    assert_eq!(config.content_wait_timeout(), Duration::from_secs(30));
    assert_eq!(config.stability_required_polls(), MIN_STABILITY_POLLS);
    assert_eq!(config.page_pacing(), Duration::from_millis(1500));
    assert_eq!(config.max_pages_per_batch(), 50);
    assert_eq!(config.fallback_total_pages(), 175);
    assert_eq!(config.photo_limit(), 3);
    assert_eq!(
        config.recovery_actions(),
        &[
            RecoveryAction::WaitLonger,
            RecoveryAction::Reload,
            RecoveryAction::RenavigateSameUrl
        ]
    );
    assert!(config.accept_unrecovered());
    assert!(config.active_only());
    assert!(config.headless());
}

#[test]
fn test_builder_with_overrides() {
    let config = ScrapeConfig::builder()
        .base_url("http://localhost:8080")
        .page_size(12)
        .stability_required_polls(5)
        .stability_max_polls(20)
        .recovery_actions(vec![RecoveryAction::Reload])
        .accept_unrecovered(false)
        .headless(false)
        .photo_limit(1)
        .build()
        .unwrap();

    assert_eq!(config.base_url(), "http://localhost:8080");
    assert_eq!(config.page_size(), 12);
    assert_eq!(config.stability_required_polls(), 5);
    assert_eq!(config.recovery_actions(), &[RecoveryAction::Reload]);
    assert!(!config.accept_unrecovered());
    assert!(!config.headless());
    assert_eq!(config.photo_limit(), 1);
}

#[test]
fn test_builder_field_override() {
    let config = ScrapeConfig::builder()
        .page_pacing_ms(100)
        .page_pacing_ms(250)
        .headless(true)
        .headless(false)
        .build()
        .unwrap();

    assert_eq!(config.page_pacing(), Duration::from_millis(250));
    assert!(!config.headless());
}

#[test]
fn test_stability_window_below_minimum_is_rejected() {
    let err = ScrapeConfig::builder()
        .stability_required_polls(2)
        .build()
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Config(_)));
}

#[test]
fn test_poll_budget_must_cover_window() {
    let err = ScrapeConfig::builder()
        .stability_required_polls(5)
        .stability_max_polls(4)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("stability_max_polls"));
}

#[test]
fn test_invalid_base_urls_are_rejected() {
    for bad in ["not a url", "ftp://example.com", "www.remax.com.ar"] {
        assert!(
            ScrapeConfig::builder().base_url(bad).build().is_err(),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_zero_counts_are_rejected() {
    assert!(ScrapeConfig::builder().page_size(0).build().is_err());
    assert!(ScrapeConfig::builder().max_pages_per_batch(0).build().is_err());
    assert!(ScrapeConfig::builder().fallback_total_pages(0).build().is_err());
}

#[test]
fn test_bad_thresholds_are_rejected() {
    let thresholds = ValidationThresholds {
        critical_ratio: 2.0,
        ..ValidationThresholds::default()
    };
    assert!(ScrapeConfig::builder().validation(thresholds).build().is_err());
}

#[test]
fn test_config_serialization() {
    let config = ScrapeConfig::builder()
        .recovery_actions(vec![RecoveryAction::RenavigateSameUrl, RecoveryAction::WaitLonger])
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("renavigate_same_url"));

    let restored: ScrapeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.recovery_actions(), config.recovery_actions());
    assert_eq!(restored.base_url(), config.base_url());
}

#[test]
fn test_config_debug_trait() {
    let debug_str = format!("{:?}", ScrapeConfig::default());
    assert!(debug_str.contains("ScrapeConfig"));
    assert!(debug_str.contains("payload_selector"));
}
