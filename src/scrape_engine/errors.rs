//! Error types for listing extraction
//!
//! Page-level variants are contained by the page state machine and turned
//! into a failed page; only session acquisition and request/config
//! validation ever reach the caller of a batch.

use thiserror::Error;

use crate::session::SessionError;

/// Result type alias for scrape operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScrapeError {
    /// Navigation did not reach the readiness signal in time
    #[error("navigation to {url} timed out")]
    NavigationTimeout { url: String },

    /// Navigation failed for a reason other than a timeout
    #[error("navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: SessionError,
    },

    /// Neither a listing nor the no-results marker appeared
    #[error("no listing content or no-results marker appeared within {waited_ms}ms")]
    NoContentDetected { waited_ms: u64 },

    /// The rendered listing count never settled
    #[error("rendered listing count did not stabilize after {polls} polls (last count {last_count})")]
    RenderTimeout { polls: u32, last_count: usize },

    /// The embedded state element never appeared
    #[error("embedded state element '{selector}' not found")]
    PayloadNotFound { selector: String },

    /// The embedded state text is not a JSON object
    #[error("embedded state is not well-formed: {0}")]
    PayloadParseError(String),

    /// No entry of the embedded state looks like a listings container
    #[error("no listings container found among {entries} state entries")]
    NoMatchingContainer { entries: usize },

    /// Rendered and embedded counts still disagree after every recovery action
    #[error("rendered count {dom_count} vs payload count {payload_count} unresolved after {actions} recovery actions")]
    CriticalMismatchUnrecovered {
        dom_count: usize,
        payload_count: usize,
        actions: usize,
    },

    /// A session operation failed outside navigation
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// No usable rendering session could be acquired
    #[error("rendering session unavailable: {0}")]
    SessionUnavailable(String),

    /// The batch request is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The configuration is invalid
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Whether this error is contained to a single page
    #[must_use]
    pub fn is_page_level(&self) -> bool {
        !matches!(
            self,
            Self::SessionUnavailable(_) | Self::InvalidRequest(_) | Self::Config(_)
        )
    }

    /// Short stable label for logs and reports
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NavigationTimeout { .. } => "navigation_timeout",
            Self::Navigation { .. } => "navigation",
            Self::NoContentDetected { .. } => "no_content_detected",
            Self::RenderTimeout { .. } => "render_timeout",
            Self::PayloadNotFound { .. } => "payload_not_found",
            Self::PayloadParseError(_) => "payload_parse_error",
            Self::NoMatchingContainer { .. } => "no_matching_container",
            Self::CriticalMismatchUnrecovered { .. } => "critical_mismatch_unrecovered",
            Self::Session(_) => "session",
            Self::SessionUnavailable(_) => "session_unavailable",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Config(_) => "config",
        }
    }

    /// Whether the failure means the page lacked the expected payload
    #[must_use]
    pub fn is_missing_payload(&self) -> bool {
        matches!(
            self,
            Self::PayloadNotFound { .. } | Self::NoMatchingContainer { .. }
        )
    }
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain
        Self::SessionUnavailable(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_level_classification() {
        assert!(ScrapeError::NavigationTimeout { url: "u".into() }.is_page_level());
        assert!(ScrapeError::PayloadParseError("x".into()).is_page_level());
        assert!(!ScrapeError::SessionUnavailable("down".into()).is_page_level());
        assert!(!ScrapeError::InvalidRequest("end < start".into()).is_page_level());
    }

    #[test]
    fn anyhow_context_is_preserved() {
        let err: ScrapeError = anyhow::anyhow!("root cause")
            .context("Failed to launch browser")
            .into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to launch browser"));
        assert!(msg.contains("root cause"));
    }
}
