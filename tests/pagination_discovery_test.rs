//! Total page discovery

mod common;

use common::{Event, MockSession, Snapshot, fast_builder, fast_config};
use listing_scrape::discover_total_pages;
use listing_scrape::session::ClientProfile;

#[tokio::test]
async fn paginator_text_wins() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(
        0,
        vec![
            Snapshot::page(0, 24)
                .with_total_pages(0, 90)
                .with_paginator("Página 1 de 175"),
        ],
    );

    assert_eq!(discover_total_pages(&mut session, &config).await, 175);
}

#[tokio::test]
async fn discovery_uses_the_mobile_profile() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::page(0, 24)]);

    discover_total_pages(&mut session, &config).await;
    assert_eq!(
        session.events.first(),
        Some(&Event::Navigate {
            page: 0,
            profile: ClientProfile::Mobile
        })
    );
}

#[tokio::test]
async fn payload_metadata_when_paginator_missing() {
    let config = fast_config();
    let mut session =
        MockSession::new().with_page(0, vec![Snapshot::page(0, 24).with_total_pages(0, 88)]);

    assert_eq!(discover_total_pages(&mut session, &config).await, 88);
}

#[tokio::test]
async fn unparseable_paginator_falls_through_to_payload() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(
        0,
        vec![
            Snapshot::page(0, 24)
                .with_total_pages(0, 60)
                .with_paginator("Cargando..."),
        ],
    );

    assert_eq!(discover_total_pages(&mut session, &config).await, 60);
}

#[tokio::test]
async fn fallback_when_nothing_is_readable() {
    let config = fast_config();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::blank()]);

    assert_eq!(discover_total_pages(&mut session, &config).await, 175);
}

#[tokio::test]
async fn fallback_is_configurable() {
    let config = fast_builder().fallback_total_pages(12).build().unwrap();
    let mut session = MockSession::new().with_page(0, vec![Snapshot::page(0, 24)]);

    assert_eq!(discover_total_pages(&mut session, &config).await, 12);
}

#[tokio::test]
async fn discovery_is_idempotent() {
    let config = fast_config();
    let snapshot = Snapshot::page(0, 24).with_paginator("Página 1 de 42");
    let mut session = MockSession::new().with_page(0, vec![snapshot]);

    let first = discover_total_pages(&mut session, &config).await;
    let second = discover_total_pages(&mut session, &config).await;
    assert_eq!(first, 42);
    assert_eq!(first, second);
}
