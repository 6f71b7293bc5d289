//! Render stability detection
//!
//! `page.navigate()` returns once the document is parsed, long before the
//! catalog's client framework finishes rendering cards. The waiter first
//! waits for any sign of content, then polls the card count until it stops
//! changing.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::scrape_engine::errors::ScrapeError;
use crate::session::RenderSession;

/// Stability parameters, usually taken from `ScrapeConfig`
#[derive(Debug, Clone)]
pub struct StabilitySettings {
    pub listing_selector: String,
    pub no_results_selector: String,
    pub content_wait_timeout: Duration,
    pub poll_interval: Duration,
    pub required_polls: u32,
    pub max_polls: u32,
}

impl StabilitySettings {
    #[must_use]
    pub fn from_config(config: &crate::config::ScrapeConfig) -> Self {
        Self {
            listing_selector: config.listing_card_selector().to_string(),
            no_results_selector: config.no_results_selector().to_string(),
            content_wait_timeout: config.content_wait_timeout(),
            poll_interval: config.stability_poll_interval(),
            required_polls: config.stability_required_polls(),
            max_polls: config.stability_max_polls(),
        }
    }
}

/// A settled rendered-card count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableCount {
    pub count: usize,
    /// The catalog rendered its "no results" marker instead of cards
    pub no_results: bool,
}

/// Wait for the rendered listing count to settle
///
/// # Errors
///
/// * [`ScrapeError::NoContentDetected`] if neither a card nor the no-results
///   marker shows up within the content wait
/// * [`ScrapeError::RenderTimeout`] if the count keeps changing for the whole
///   poll budget; the error carries the last observed count
/// * [`ScrapeError::Session`] if the session itself fails
pub async fn wait_for_stable_count<S: RenderSession>(
    session: &mut S,
    settings: &StabilitySettings,
) -> Result<StableCount, ScrapeError> {
    let start = Instant::now();
    let any_content = format!(
        "{}, {}",
        settings.listing_selector, settings.no_results_selector
    );

    let appeared = session
        .wait_for_element(&any_content, settings.content_wait_timeout)
        .await?;
    if !appeared {
        warn!(
            waited = ?settings.content_wait_timeout,
            "No listing cards or no-results marker appeared"
        );
        return Err(ScrapeError::NoContentDetected {
            waited_ms: u64::try_from(settings.content_wait_timeout.as_millis()).unwrap_or(u64::MAX),
        });
    }

    let first = session.count_elements(&settings.listing_selector).await?;
    if first == 0 && session.count_elements(&settings.no_results_selector).await? > 0 {
        info!("Catalog rendered its no-results marker");
        return Ok(StableCount {
            count: 0,
            no_results: true,
        });
    }

    let mut last = first;
    let mut streak: u32 = 1;
    let mut polls: u32 = 1;

    while polls < settings.max_polls {
        if streak >= settings.required_polls {
            debug!(
                count = last,
                polls,
                elapsed = ?start.elapsed(),
                "Rendered count stable"
            );
            return Ok(StableCount {
                count: last,
                no_results: false,
            });
        }

        tokio::time::sleep(settings.poll_interval).await;
        let count = session.count_elements(&settings.listing_selector).await?;
        polls += 1;

        if count == last {
            streak += 1;
        } else {
            debug!(previous = last, count, "Rendered count still changing");
            last = count;
            streak = 1;
        }
    }

    if streak >= settings.required_polls {
        return Ok(StableCount {
            count: last,
            no_results: false,
        });
    }

    warn!(polls, last_count = last, "Rendered count never stabilized");
    Err(ScrapeError::RenderTimeout {
        polls,
        last_count: last,
    })
}
