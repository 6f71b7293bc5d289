//! Total page count discovery
//!
//! Runs page 0 with the mobile profile, where the catalog shows a
//! "Página 1 de N" summary, and falls back to the payload metadata and
//! finally to a configured constant. Discovery never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::page_machine::{PageOutcome, PageTarget, run_page};
use crate::config::ScrapeConfig;
use crate::session::{ClientProfile, RenderSession};

static PAGE_TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)de\s+(\d+)").expect("Invalid paginator total regex"));

/// Parse the total out of a paginator summary such as `"Página 1 de 175"`
#[must_use]
pub fn parse_paginator_total(text: &str) -> Option<u32> {
    PAGE_TOTAL_RE
        .captures(text)?
        .get(1)?
        .as_str()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
}

async fn read_paginator<S: RenderSession>(session: &mut S, config: &ScrapeConfig) -> Option<u32> {
    let selector = config.paginator_selector();
    match session
        .wait_for_element(selector, config.paginator_wait_timeout())
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            debug!("Paginator not rendered");
            return None;
        }
        Err(e) => {
            debug!(error = %e, "Paginator wait failed");
            return None;
        }
    }

    match session.read_text(selector).await {
        Ok(Some(text)) => {
            let total = parse_paginator_total(&text);
            if total.is_none() {
                debug!(text = %text.trim(), "Paginator text carries no total");
            }
            total
        }
        Ok(None) => None,
        Err(e) => {
            debug!(error = %e, "Reading paginator failed");
            None
        }
    }
}

/// Discover how many catalog pages exist
///
/// Returns the paginator total if readable, else the payload's
/// `totalPages`, else `config.fallback_total_pages()`.
pub async fn discover_total_pages<S: RenderSession>(session: &mut S, config: &ScrapeConfig) -> u32 {
    let target = PageTarget::new(0, config).with_profile(ClientProfile::Mobile);
    let outcome = run_page(session, config, target).await;

    if let PageOutcome::Failed(e) = &outcome {
        warn!(error = %e, "First page failed during discovery");
    }

    if let Some(total) = read_paginator(session, config).await {
        info!(total, "Total pages from paginator");
        return total;
    }

    if let Some(total) = outcome.total_pages().filter(|n| *n > 0) {
        info!(total, "Total pages from embedded payload");
        return total;
    }

    let fallback = config.fallback_total_pages();
    warn!(fallback, "Could not determine total pages, using fallback");
    fallback
}
