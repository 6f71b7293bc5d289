//! Scripted rendering session and fixtures for the pipeline tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use listing_scrape::config::ScrapeConfig;
use listing_scrape::session::{ClientProfile, NavigateOptions, RenderSession, SessionError};
use listing_scrape::utils::constants::{
    LISTING_CARD_SELECTOR, NO_RESULTS_SELECTOR, PAGINATOR_SELECTOR, PAYLOAD_SELECTOR,
};
use serde_json::{Value, json};

/// Config with millisecond-scale waits so the tests run instantly
pub fn fast_config() -> ScrapeConfig {
    fast_builder().build().unwrap()
}

pub fn fast_builder() -> listing_scrape::ScrapeConfigBuilder {
    ScrapeConfig::builder()
        .navigation_timeout_ms(1_000)
        .request_timeout_ms(1_000)
        .content_wait_timeout_ms(20)
        .stability_poll_interval_ms(1)
        .stability_required_polls(3)
        .stability_max_polls(10)
        .payload_wait_timeout_ms(20)
        .extract_retry_delay_ms(1)
        .recovery_base_backoff_ms(1)
        .page_pacing_ms(0)
        .paginator_wait_timeout_ms(10)
}

/// One raw listing as the catalog embeds it
pub fn listing_json(page: u32, index: usize) -> Value {
    json!({
        "title": format!("Departamento {page}-{index}"),
        "slug": format!("departamento-p{page}-{index}"),
        "price": 95000 + index,
        "currency": { "value": "USD" },
        "displayAddress": format!("Bv. San Juan {index}"),
        "geoLabel": "Nueva Córdoba, Córdoba",
        "location": { "coordinates": [-64.1856, -31.4253] },
        "listBroker": [{ "name": "Carla Ruiz", "license": "CPI 5521" }],
        "associate": { "name": "Carla Ruiz", "officeName": "RE/MAX Centro" },
        "dimensionTotalBuilt": 58,
        "dimensionCovered": 52,
        "totalRooms": 2,
        "bathrooms": 1,
        "type": { "value": "Departamento" },
        "photos": [{ "rawValue": format!("listings/l{page}{index}/photo1") }],
        "operation": { "id": 1 },
        "listingStatus": { "value": "active" }
    })
}

/// Embedded state document with `count` listings under an opaque key
pub fn ng_state(page: u32, count: usize, total_pages: Option<u32>) -> String {
    let listings: Vec<Value> = (0..count).map(|i| listing_json(page, i)).collect();
    let mut data = json!({ "data": listings, "page": page, "pageSize": 24 });
    if let Some(total) = total_pages {
        data["totalPages"] = json!(total);
        data["totalItems"] = json!(u64::from(total) * 24);
    }
    json!({
        "G.json.menu": { "b": { "data": { "items": [] } } },
        "G.json.5f2a91c3": { "b": { "data": data } }
    })
    .to_string()
}

/// What the page looks like after one navigation or reload
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Successive card counts; the last value repeats
    pub cards: Vec<usize>,
    pub no_results: bool,
    pub payload: Option<String>,
    /// Payload probes that report "absent" before the payload shows up
    pub payload_misses: usize,
    pub paginator: Option<String>,
}

impl Snapshot {
    /// A settled page with `count` cards and a matching payload
    pub fn page(page: u32, count: usize) -> Self {
        Self {
            cards: vec![count],
            payload: Some(ng_state(page, count, None)),
            ..Self::default()
        }
    }

    /// `cards` rendered cards but only `payload_count` listings embedded
    pub fn mismatched(page: u32, cards: usize, payload_count: usize) -> Self {
        Self {
            cards: vec![cards],
            payload: Some(ng_state(page, payload_count, None)),
            ..Self::default()
        }
    }

    /// Past the last page: no cards, no-results marker, empty container
    pub fn empty(page: u32) -> Self {
        Self {
            cards: vec![0],
            no_results: true,
            payload: Some(ng_state(page, 0, None)),
            ..Self::default()
        }
    }

    /// Nothing ever renders
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_total_pages(mut self, page: u32, total: u32) -> Self {
        let count = self.cards.last().copied().unwrap_or(0);
        self.payload = Some(ng_state(page, count, Some(total)));
        self
    }

    pub fn with_paginator(mut self, text: &str) -> Self {
        self.paginator = Some(text.to_string());
        self
    }

    pub fn with_cards(mut self, cards: Vec<usize>) -> Self {
        self.cards = cards;
        self
    }

    pub fn with_payload_misses(mut self, misses: usize) -> Self {
        self.payload_misses = misses;
        self
    }

    pub fn without_payload(mut self) -> Self {
        self.payload = None;
        self
    }

    fn content_visible(&self) -> bool {
        self.no_results || self.cards.first().is_some_and(|c| *c > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Navigate { page: u32, profile: ClientProfile },
    Reload { page: u32 },
    Closed,
}

/// Session that replays scripted snapshots per page number
///
/// Each navigation or reload advances the page's queue; the final snapshot
/// repeats once the queue is down to one entry.
#[derive(Debug, Default)]
pub struct MockSession {
    pages: HashMap<u32, VecDeque<Snapshot>>,
    navigation_errors: HashMap<u32, SessionError>,
    current_page: Option<u32>,
    current: Snapshot,
    card_poll: usize,
    pub events: Vec<Event>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, snapshots: Vec<Snapshot>) -> Self {
        self.pages.insert(page, snapshots.into());
        self
    }

    pub fn with_navigation_error(mut self, page: u32, error: SessionError) -> Self {
        self.navigation_errors.insert(page, error);
        self
    }

    /// Page numbers navigated to, in order
    pub fn navigated_pages(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Navigate { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn reload_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Reload { .. }))
            .count()
    }

    fn load(&mut self, page: u32) {
        let snapshot = match self.pages.get_mut(&page) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => Snapshot::blank(),
        };
        self.current_page = Some(page);
        self.current = snapshot;
        self.card_poll = 0;
    }
}

fn page_from_url(url: &str) -> Option<u32> {
    let start = url.find("page=")? + "page=".len();
    let digits: String = url[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn content_selector() -> String {
    format!("{LISTING_CARD_SELECTOR}, {NO_RESULTS_SELECTOR}")
}

impl RenderSession for MockSession {
    async fn navigate(&mut self, url: &str, options: NavigateOptions) -> Result<(), SessionError> {
        let page = page_from_url(url)
            .ok_or_else(|| SessionError::Protocol(format!("unexpected url {url}")))?;
        self.events.push(Event::Navigate {
            page,
            profile: options.profile,
        });
        if let Some(error) = self.navigation_errors.get(&page) {
            return Err(error.clone());
        }
        self.load(page);
        Ok(())
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<bool, SessionError> {
        if selector == content_selector() {
            return Ok(self.current.content_visible());
        }
        if selector == PAYLOAD_SELECTOR {
            if self.current.payload_misses > 0 {
                self.current.payload_misses -= 1;
                return Ok(false);
            }
            return Ok(self.current.payload.is_some());
        }
        if selector == PAGINATOR_SELECTOR {
            return Ok(self.current.paginator.is_some());
        }
        Ok(false)
    }

    async fn read_text(&mut self, selector: &str) -> Result<Option<String>, SessionError> {
        Ok(match selector {
            PAYLOAD_SELECTOR => self.current.payload.clone(),
            PAGINATOR_SELECTOR => self.current.paginator.clone(),
            _ => None,
        })
    }

    async fn count_elements(&mut self, selector: &str) -> Result<usize, SessionError> {
        match selector {
            LISTING_CARD_SELECTOR => {
                let cards = &self.current.cards;
                let count = cards
                    .get(self.card_poll)
                    .or_else(|| cards.last())
                    .copied()
                    .unwrap_or(0);
                self.card_poll += 1;
                Ok(count)
            }
            NO_RESULTS_SELECTOR => Ok(usize::from(self.current.no_results)),
            _ => Ok(0),
        }
    }

    async fn evaluate(&mut self, _script: &str) -> Result<Value, SessionError> {
        Ok(json!({ "page": self.current_page, "readyState": "complete" }))
    }

    async fn reload(&mut self, _timeout: Duration) -> Result<(), SessionError> {
        let page = self
            .current_page
            .ok_or_else(|| SessionError::Protocol("reload before navigation".into()))?;
        self.events.push(Event::Reload { page });
        self.load(page);
        Ok(())
    }

    async fn close(mut self) -> Result<(), SessionError> {
        self.events.push(Event::Closed);
        Ok(())
    }
}
