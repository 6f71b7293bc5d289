//! Rendering-session abstraction
//!
//! The extraction pipeline drives a page through this trait only. The
//! Chromium-backed implementation lives in [`chromium`]; tests script their
//! own.

pub mod chromium;
pub mod page_timeout;

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::constants::{CHROME_USER_AGENT, DESKTOP_VIEWPORT, MOBILE_VIEWPORT};

pub use chromium::ChromiumSession;

/// Failure reported by a rendering session
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The operation did not finish within its deadline
    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    /// The browser or page went away
    #[error("session disconnected: {0}")]
    Disconnected(String),

    /// The engine answered with an error or an unexpected value
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

/// Readiness signal a navigation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WaitUntil {
    #[default]
    DomContentLoaded,
    Load,
}

/// Client identity presented to the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientProfile {
    #[default]
    Desktop,
    /// Narrow viewport; some catalog widgets only render below tablet width
    Mobile,
}

impl ClientProfile {
    #[must_use]
    pub fn user_agent(self) -> &'static str {
        CHROME_USER_AGENT
    }

    #[must_use]
    pub fn viewport(self) -> (u32, u32) {
        match self {
            Self::Desktop => DESKTOP_VIEWPORT,
            Self::Mobile => MOBILE_VIEWPORT,
        }
    }

    #[must_use]
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

/// Options for [`RenderSession::navigate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub wait_until: WaitUntil,
    pub timeout: Duration,
    pub profile: ClientProfile,
}

impl NavigateOptions {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            wait_until: WaitUntil::default(),
            timeout,
            profile: ClientProfile::default(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ClientProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// One page context inside a rendering engine
///
/// All operations suspend; implementations bound each of them and report
/// expiry as [`SessionError::Timeout`]. A session is owned by exactly one
/// page pipeline at a time.
pub trait RenderSession: Send {
    /// Navigate to `url` and wait for the requested readiness signal
    fn navigate(
        &mut self,
        url: &str,
        options: NavigateOptions,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Wait until an element matching `selector` exists
    ///
    /// Returns `Ok(false)` when the deadline passes without a match.
    fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<bool, SessionError>> + Send;

    /// Text content of the first element matching `selector`
    fn read_text(
        &mut self,
        selector: &str,
    ) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    /// Number of elements currently matching `selector`
    fn count_elements(
        &mut self,
        selector: &str,
    ) -> impl Future<Output = Result<usize, SessionError>> + Send;

    /// Evaluate a script in the page and return its JSON result
    fn evaluate(
        &mut self,
        script: &str,
    ) -> impl Future<Output = Result<serde_json::Value, SessionError>> + Send;

    /// Reload the current document
    fn reload(&mut self, timeout: Duration) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Close the page context
    fn close(self) -> impl Future<Output = Result<(), SessionError>> + Send
    where
        Self: Sized;
}
