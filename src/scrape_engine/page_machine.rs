//! Per-page extraction state machine
//!
//! One run takes a catalog page from navigation to a terminal outcome:
//!
//! ```text
//! Navigating -> AwaitingStability -> Extracting -> Validating
//!     -> Accepted
//!     -> Recovering -> (AwaitingStability -> Extracting -> Validating)*
//!     -> Accepted | Empty | Failed
//! ```
//!
//! Every page-level error is contained here and reported as
//! [`PageOutcome::Failed`]; nothing in this module aborts a batch.

use std::fmt;

use tracing::{debug, info, warn};

use super::consistency::{Severity, ValidationVerdict, validate_counts};
use super::errors::{ScrapeError, ScrapeResult};
use super::recovery::RecoveryStrategist;
use crate::config::ScrapeConfig;
use crate::listing::{PropertyRecord, normalize_page};
use crate::page_extractor::js_scripts::PAGE_DIAGNOSTICS_SCRIPT;
use crate::page_extractor::{
    PayloadSettings, RawListingPayload, StabilitySettings, extract_payload, wait_for_stable_count,
};
use crate::session::page_timeout::with_page_timeout;
use crate::session::{ClientProfile, NavigateOptions, RenderSession};
use crate::utils::listing_page_url;

/// Which catalog page to process and how to present the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTarget {
    pub page: u32,
    pub page_size: u32,
    pub profile: ClientProfile,
}

impl PageTarget {
    #[must_use]
    pub fn new(page: u32, config: &ScrapeConfig) -> Self {
        Self {
            page,
            page_size: config.page_size(),
            profile: ClientProfile::Desktop,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ClientProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Catalog URL for a page
///
/// # Errors
///
/// Returns [`ScrapeError::Config`] if the configured base URL cannot be
/// combined with the catalog path.
pub fn catalog_page_url(config: &ScrapeConfig, page: u32, page_size: u32) -> ScrapeResult<String> {
    listing_page_url(
        config.base_url(),
        config.listing_path(),
        page,
        page_size,
        &config.catalog_query(),
    )
    .map(String::from)
    .map_err(|e| ScrapeError::Config(format!("cannot build catalog URL: {e}")))
}

/// A page that produced records
#[derive(Debug, Clone)]
pub struct AcceptedPage {
    pub page: u32,
    pub url: String,
    pub records: Vec<PropertyRecord>,
    pub dom_count: usize,
    pub payload_count: usize,
    pub severity: Severity,
    /// Recovery actions performed before acceptance
    pub recovery_actions: usize,
    /// Set whenever the page needed recovery
    pub low_confidence: bool,
    pub total_pages: Option<u32>,
    pub total_items: Option<u64>,
}

/// Terminal state of one page run
#[derive(Debug, Clone)]
pub enum PageOutcome {
    Accepted(AcceptedPage),
    /// The page exists but lists nothing; past the last real page
    Empty {
        /// Pagination metadata, when the empty payload carried it
        total_pages: Option<u32>,
    },
    Failed(ScrapeError),
}

impl PageOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Total page count reported by the page's payload, if any
    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        match self {
            Self::Accepted(page) => page.total_pages,
            Self::Empty { total_pages } => *total_pages,
            Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Navigating,
    AwaitingStability,
    Extracting,
    Validating,
    Recovering,
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Navigating => "navigating",
            Self::AwaitingStability => "awaiting_stability",
            Self::Extracting => "extracting",
            Self::Validating => "validating",
            Self::Recovering => "recovering",
        };
        f.write_str(name)
    }
}

struct PageRun<'a, S> {
    session: &'a mut S,
    config: &'a ScrapeConfig,
    target: PageTarget,
    url: String,
    stability: StabilitySettings,
    payload: PayloadSettings,
}

impl<S: RenderSession> PageRun<'_, S> {
    fn enter(&self, state: PageState) {
        debug!(page = self.target.page, %state, "Page state");
    }

    fn navigate_options(&self) -> NavigateOptions {
        NavigateOptions::new(self.config.navigation_timeout()).with_profile(self.target.profile)
    }

    async fn navigate(&mut self) -> ScrapeResult<()> {
        self.enter(PageState::Navigating);
        let options = self.navigate_options();
        let result = with_page_timeout(
            self.session.navigate(&self.url, options),
            options.timeout,
            "Page navigation",
        )
        .await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_timeout() => Err(ScrapeError::NavigationTimeout {
                url: self.url.clone(),
            }),
            Err(source) => Err(ScrapeError::Navigation {
                url: self.url.clone(),
                source,
            }),
        }
    }

    /// Settled card count plus whether the no-results marker was shown
    ///
    /// A render timeout is not fatal: the last observed count is used.
    async fn await_stability(&mut self) -> ScrapeResult<(usize, bool)> {
        self.enter(PageState::AwaitingStability);
        match wait_for_stable_count(self.session, &self.stability).await {
            Ok(stable) => Ok((stable.count, stable.no_results)),
            Err(ScrapeError::RenderTimeout { polls, last_count }) => {
                warn!(
                    page = self.target.page,
                    polls, last_count, "Proceeding with unstable rendered count"
                );
                Ok((last_count, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Extract with one delayed retry
    async fn extract(&mut self, no_results: bool) -> Result<RawListingPayload, PageOutcome> {
        self.enter(PageState::Extracting);
        let first = match extract_payload(self.session, &self.payload).await {
            Ok(payload) => return Ok(payload),
            Err(e) => e,
        };
        if no_results && first.is_missing_payload() {
            info!(page = self.target.page, "No-results page without a listings payload");
            return Err(PageOutcome::Empty { total_pages: None });
        }

        debug!(page = self.target.page, error = %first, "Extraction failed, retrying once");
        tokio::time::sleep(self.config.extract_retry_delay()).await;

        extract_payload(self.session, &self.payload)
            .await
            .map_err(|e| {
                if no_results && e.is_missing_payload() {
                    PageOutcome::Empty { total_pages: None }
                } else {
                    PageOutcome::Failed(e)
                }
            })
    }

    fn validate(&self, dom_count: usize, payload: &RawListingPayload) -> ValidationVerdict {
        self.enter(PageState::Validating);
        validate_counts(dom_count, payload.raw_count, self.config.validation())
    }

    fn finish(
        &self,
        payload: &RawListingPayload,
        verdict: ValidationVerdict,
        recovery_actions: usize,
    ) -> PageOutcome {
        if payload.is_empty() {
            info!(page = self.target.page, "Page lists no properties");
            return PageOutcome::Empty {
                total_pages: payload.total_pages,
            };
        }

        self.accept(payload, verdict, recovery_actions, recovery_actions > 0)
    }

    /// Build the accepted outcome; unlike [`Self::finish`] an empty payload stays accepted
    fn accept(
        &self,
        payload: &RawListingPayload,
        verdict: ValidationVerdict,
        recovery_actions: usize,
        low_confidence: bool,
    ) -> PageOutcome {
        let records = normalize_page(payload, self.config);
        info!(
            page = self.target.page,
            records = records.len(),
            rendered = verdict.dom_count,
            payload = verdict.payload_count,
            severity = ?verdict.severity,
            low_confidence,
            "Page accepted"
        );

        PageOutcome::Accepted(AcceptedPage {
            page: self.target.page,
            url: self.url.clone(),
            records,
            dom_count: verdict.dom_count,
            payload_count: verdict.payload_count,
            severity: verdict.severity,
            recovery_actions,
            low_confidence,
            total_pages: payload.total_pages,
            total_items: payload.total_items,
        })
    }

    async fn log_diagnostics(&mut self) {
        match self.session.evaluate(PAGE_DIAGNOSTICS_SCRIPT).await {
            Ok(snapshot) => debug!(page = self.target.page, %snapshot, "Page diagnostics"),
            Err(e) => debug!(page = self.target.page, error = %e, "Page diagnostics unavailable"),
        }
    }

    async fn recover(
        &mut self,
        initial_payload: RawListingPayload,
        initial: ValidationVerdict,
    ) -> PageOutcome {
        self.enter(PageState::Recovering);
        self.log_diagnostics().await;

        let config = self.config;
        let mut strategist =
            RecoveryStrategist::new(config.recovery_actions(), config.recovery_base_backoff());
        let mut last_success: Option<(RawListingPayload, ValidationVerdict)> = None;
        let mut last_verdict = initial;

        loop {
            let options = self.navigate_options();
            let url = self.url.clone();
            let Some((action, result)) = strategist.perform_next(self.session, &url, options).await
            else {
                break;
            };

            if let Err(e) = result {
                warn!(page = self.target.page, ?action, error = %e, "Recovery action failed");
                continue;
            }

            let dom_count = match self.await_stability().await {
                Ok((count, _)) => count,
                Err(e) => {
                    warn!(page = self.target.page, ?action, error = %e, "No content after recovery action");
                    continue;
                }
            };

            self.enter(PageState::Extracting);
            let payload = match extract_payload(self.session, &self.payload).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(page = self.target.page, ?action, error = %e, "Extraction failed after recovery action");
                    continue;
                }
            };

            let verdict = self.validate(dom_count, &payload);
            if verdict.severity.is_acceptable() {
                info!(
                    page = self.target.page,
                    ?action,
                    attempts = strategist.attempts(),
                    "Recovered from count mismatch"
                );
                return self.finish(&payload, verdict, strategist.attempts());
            }
            last_verdict = verdict;
            last_success = Some((payload, verdict));
        }

        let attempts = strategist.attempts();
        if attempts == 0 {
            last_success = Some((initial_payload, initial));
        }

        match last_success {
            Some((payload, verdict)) if config.accept_unrecovered() => {
                warn!(
                    page = self.target.page,
                    rendered = verdict.dom_count,
                    payload = verdict.payload_count,
                    attempts,
                    "Recovery exhausted, accepting last payload with low confidence"
                );
                // never Empty: this payload failed validation
                self.accept(&payload, verdict, attempts, true)
            }
            _ => {
                warn!(
                    page = self.target.page,
                    attempts, "Recovery exhausted without an acceptable payload"
                );
                PageOutcome::Failed(ScrapeError::CriticalMismatchUnrecovered {
                    dom_count: last_verdict.dom_count,
                    payload_count: last_verdict.payload_count,
                    actions: attempts,
                })
            }
        }
    }

    async fn run(mut self) -> PageOutcome {
        if let Err(e) = self.navigate().await {
            warn!(page = self.target.page, error = %e, "Navigation failed");
            return PageOutcome::Failed(e);
        }

        let (dom_count, no_results) = match self.await_stability().await {
            Ok(observed) => observed,
            Err(e) => {
                warn!(page = self.target.page, error = %e, "Page never rendered content");
                return PageOutcome::Failed(e);
            }
        };

        let payload = match self.extract(no_results).await {
            Ok(payload) => payload,
            Err(outcome) => {
                if let PageOutcome::Failed(e) = &outcome {
                    warn!(page = self.target.page, error = %e, "Extraction failed twice");
                }
                return outcome;
            }
        };

        let verdict = self.validate(dom_count, &payload);
        if verdict.severity.is_acceptable() {
            return self.finish(&payload, verdict, 0);
        }

        self.recover(payload, verdict).await
    }
}

/// Run one catalog page to a terminal outcome
///
/// Never returns an error: page-level failures become
/// [`PageOutcome::Failed`] so the caller can keep going.
pub async fn run_page<S: RenderSession>(
    session: &mut S,
    config: &ScrapeConfig,
    target: PageTarget,
) -> PageOutcome {
    let url = match catalog_page_url(config, target.page, target.page_size) {
        Ok(url) => url,
        Err(e) => return PageOutcome::Failed(e),
    };

    PageRun {
        session,
        config,
        target,
        url,
        stability: StabilitySettings::from_config(config),
        payload: PayloadSettings::from_config(config),
    }
    .run()
    .await
}
