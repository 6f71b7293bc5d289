//! Per-page state machine against a scripted session

mod common;

use common::{Event, MockSession, Snapshot, fast_builder, fast_config};
use listing_scrape::scrape_engine::{PageOutcome, PageTarget, RecoveryAction, Severity, run_page};
use listing_scrape::session::{ClientProfile, SessionError};
use listing_scrape::{Coordinate, ScrapeError};

fn target(page: u32) -> PageTarget {
    PageTarget::new(page, &fast_config())
}

#[tokio::test]
async fn consistent_page_is_accepted() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::page(0, 24)]);

    let outcome = run_page(&mut session, &config, target(0)).await;
    let PageOutcome::Accepted(page) = outcome else {
        panic!("expected accepted page, got {outcome:?}");
    };
    assert_eq!(page.records.len(), 24);
    assert_eq!(page.severity, Severity::Consistent);
    assert!(!page.low_confidence);
    assert_eq!(page.recovery_actions, 0);

    let first = &page.records[0];
    assert_eq!(first.title, "Departamento 0-0");
    assert_eq!(first.price, "95000 USD");
    assert_eq!(first.latitude, Coordinate::Known(-31.4253));
    assert_eq!(first.url, "https://www.remax.com.ar/listings/departamento-p0-0");
    assert_eq!(first.operation, "Venta");
    assert_eq!(
        first.photos,
        vec!["https://d1acdg20u0pmxj.cloudfront.net/listings/l00/AUTOx860/photo1.webp"]
    );
}

#[tokio::test]
async fn minor_drift_is_accepted_without_recovery() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::mismatched(0, 24, 18)]);

    let PageOutcome::Accepted(page) = run_page(&mut session, &config, target(0)).await else {
        panic!("expected accepted page");
    };
    assert_eq!(page.severity, Severity::MinorDrift);
    assert_eq!(page.records.len(), 18);
    assert!(!page.low_confidence);
    assert_eq!(session.reload_count(), 0);
}

#[tokio::test]
async fn critical_mismatch_recovers_after_reload() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(
        1,
        vec![Snapshot::mismatched(1, 24, 2), Snapshot::page(1, 23)],
    );

    let PageOutcome::Accepted(page) = run_page(&mut session, &config, target(1)).await else {
        panic!("expected accepted page");
    };
    assert_eq!(page.records.len(), 23);
    assert!(page.low_confidence);
    // WaitLonger did not help, Reload did
    assert_eq!(page.recovery_actions, 2);
    assert_eq!(session.reload_count(), 1);
}

#[tokio::test]
async fn exhausted_recovery_accepts_last_payload_with_low_confidence() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::mismatched(0, 24, 2)]);

    let PageOutcome::Accepted(page) = run_page(&mut session, &config, target(0)).await else {
        panic!("expected low-confidence acceptance");
    };
    assert!(page.low_confidence);
    assert_eq!(page.severity, Severity::CriticalMismatch);
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.recovery_actions, 3);
    // one initial navigation plus one re-navigation
    assert_eq!(session.navigated_pages(), vec![0, 0]);
}

#[tokio::test]
async fn exhausted_recovery_with_empty_payload_is_not_an_empty_page() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::mismatched(0, 24, 0)]);

    let outcome = run_page(&mut session, &config, target(0)).await;
    let PageOutcome::Accepted(page) = outcome else {
        panic!("expected low-confidence acceptance, got {outcome:?}");
    };
    assert!(page.records.is_empty());
    assert!(page.low_confidence);
    assert_eq!(page.severity, Severity::CriticalMismatch);
    assert_eq!(page.dom_count, 24);
    assert_eq!(page.recovery_actions, 3);
}

#[tokio::test]
async fn empty_payload_mismatch_without_recovery_actions_is_accepted() {
    let config = fast_builder().recovery_actions(Vec::new()).build().unwrap();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::mismatched(0, 24, 0)]);

    let outcome = run_page(&mut session, &config, target(0)).await;
    assert!(!outcome.is_empty(), "got {outcome:?}");
    let PageOutcome::Accepted(page) = outcome else {
        panic!("expected accepted page");
    };
    assert!(page.low_confidence);
    assert_eq!(page.recovery_actions, 0);
}

#[tokio::test]
async fn exhausted_recovery_fails_when_low_confidence_disabled() {
    let config = fast_builder().accept_unrecovered(false).build().unwrap();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::mismatched(0, 24, 2)]);

    match run_page(&mut session, &config, target(0)).await {
        PageOutcome::Failed(ScrapeError::CriticalMismatchUnrecovered {
            dom_count,
            payload_count,
            actions,
        }) => {
            assert_eq!(dom_count, 24);
            assert_eq!(payload_count, 2);
            assert_eq!(actions, 3);
        }
        other => panic!("expected unrecovered mismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn recovery_without_any_successful_extraction_fails() {
    let config = fast_builder()
        .recovery_actions(vec![RecoveryAction::Reload, RecoveryAction::RenavigateSameUrl])
        .build()
        .unwrap();
    // After the first load the payload disappears for good
    let mut session = MockSession::new().with_page(
        0,
        vec![
            Snapshot::mismatched(0, 24, 2),
            Snapshot::page(0, 24).without_payload(),
        ],
    );

    let outcome = run_page(&mut session, &config, target(0)).await;
    assert!(
        matches!(
            outcome,
            PageOutcome::Failed(ScrapeError::CriticalMismatchUnrecovered { actions: 2, .. })
        ),
        "got {outcome:?}"
    );
}

#[tokio::test]
async fn navigation_timeout_is_a_failed_page() {
    let config = fast_config();
    let mut session = MockSession::new().with_navigation_error(
        3,
        SessionError::Timeout {
            operation: "Page navigation".into(),
            elapsed_ms: 90_000,
        },
    );

    let outcome = run_page(&mut session, &config, target(3)).await;
    assert!(matches!(
        outcome,
        PageOutcome::Failed(ScrapeError::NavigationTimeout { .. })
    ));
}

#[tokio::test]
async fn navigation_error_is_a_failed_page() {
    let config = fast_config();
    let mut session = MockSession::new()
        .with_navigation_error(3, SessionError::Protocol("net::ERR_NAME_NOT_RESOLVED".into()));

    let outcome = run_page(&mut session, &config, target(3)).await;
    let PageOutcome::Failed(ScrapeError::Navigation { source, .. }) = outcome else {
        panic!("expected navigation failure");
    };
    assert!(!source.is_timeout());
}

#[tokio::test]
async fn page_without_content_fails_rather_than_being_empty() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::blank()]);

    let outcome = run_page(&mut session, &config, target(0)).await;
    assert!(matches!(
        outcome,
        PageOutcome::Failed(ScrapeError::NoContentDetected { .. })
    ));
}

#[tokio::test]
async fn empty_container_is_an_empty_page() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(7, vec![Snapshot::empty(7)]);

    assert!(run_page(&mut session, &config, target(7)).await.is_empty());
}

#[tokio::test]
async fn no_results_marker_without_payload_is_an_empty_page() {
    let config = fast_config();
    let mut session =
        MockSession::new().with_page(7, vec![Snapshot::empty(7).without_payload()]);

    assert!(run_page(&mut session, &config, target(7)).await.is_empty());
}

#[tokio::test]
async fn extraction_is_retried_once() {
    let config = fast_config();
    let mut session =
        MockSession::new().with_page(0, vec![Snapshot::page(0, 24).with_payload_misses(1)]);

    assert!(run_page(&mut session, &config, target(0)).await.is_accepted());
}

#[tokio::test]
async fn second_extraction_failure_fails_the_page() {
    let config = fast_config();
    let mut session =
        MockSession::new().with_page(0, vec![Snapshot::page(0, 24).with_payload_misses(2)]);

    let outcome = run_page(&mut session, &config, target(0)).await;
    assert!(matches!(
        outcome,
        PageOutcome::Failed(ScrapeError::PayloadNotFound { .. })
    ));
}

#[tokio::test]
async fn unstable_count_proceeds_with_last_observation() {
    let config = fast_config();
    let growing: Vec<usize> = (1..=30).collect();
    let snapshot = Snapshot::page(0, 10).with_cards(growing);
    let mut session = MockSession::new().with_page(0, vec![snapshot]);

    // Last observed count (10th poll) matches the payload
    let PageOutcome::Accepted(page) = run_page(&mut session, &config, target(0)).await else {
        panic!("expected accepted page");
    };
    assert_eq!(page.dom_count, 10);
    assert_eq!(page.severity, Severity::Consistent);
}

#[tokio::test]
async fn profile_override_reaches_navigation() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::page(0, 3)]);

    run_page(
        &mut session,
        &config,
        target(0).with_profile(ClientProfile::Mobile),
    )
    .await;
    assert_eq!(
        session.events.first(),
        Some(&Event::Navigate {
            page: 0,
            profile: ClientProfile::Mobile
        })
    );
}
