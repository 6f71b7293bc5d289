//! Chromium-backed [`RenderSession`] built on chromiumoxide
//!
//! One `ChromiumSession` wraps one browser tab. Client identity (user agent,
//! viewport) is applied lazily before a navigation that asks for a different
//! profile than the tab currently has.

use std::time::{Duration, Instant};

use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use tracing::{debug, trace};

use super::page_timeout::with_page_timeout;
use super::{ClientProfile, NavigateOptions, RenderSession, SessionError, WaitUntil};
use crate::page_extractor::js_scripts;

/// Poll interval for `wait_for_element`
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Classify a chromiumoxide error by its message
///
/// chromiumoxide folds websocket, channel and CDP failures into one error
/// type; the message is the only stable signal of which one happened.
fn map_cdp_error(operation: &str, error: impl std::fmt::Display) -> SessionError {
    let msg = error.to_string();
    let lower = msg.to_lowercase();

    if lower.contains("timeout") || lower.contains("timed out") {
        return SessionError::Timeout {
            operation: operation.to_string(),
            elapsed_ms: 0,
        };
    }

    if lower.contains("closed")
        || lower.contains("disconnected")
        || lower.contains("channel")
        || lower.contains("websocket")
        || lower.contains("no response from the chromium instance")
        || lower.contains("session not found")
    {
        return SessionError::Disconnected(format!("{operation}: {msg}"));
    }

    SessionError::Protocol(format!("{operation}: {msg}"))
}

/// A browser tab driven through the Chrome DevTools Protocol
#[derive(Debug)]
pub struct ChromiumSession {
    page: Page,
    profile: Option<ClientProfile>,
    /// Deadline for single round-trip operations (evaluate, read text)
    request_timeout: Duration,
}

impl ChromiumSession {
    /// Open a blank tab in `browser`
    pub async fn open(browser: &Browser, request_timeout: Duration) -> Result<Self, SessionError> {
        let page = with_page_timeout(
            async {
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| map_cdp_error("new_page", e))
            },
            request_timeout,
            "Open page",
        )
        .await?;

        Ok(Self {
            page,
            profile: None,
            request_timeout,
        })
    }

    async fn apply_profile(&mut self, profile: ClientProfile) -> Result<(), SessionError> {
        if self.profile == Some(profile) {
            return Ok(());
        }

        let (width, height) = profile.viewport();
        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(if profile.is_mobile() { 3.0 } else { 1.0 })
            .mobile(profile.is_mobile())
            .build()
            .map_err(|e| SessionError::Protocol(format!("device metrics: {e}")))?;

        self.page
            .execute(metrics)
            .await
            .map_err(|e| map_cdp_error("set device metrics", e))?;

        self.page
            .set_user_agent(SetUserAgentOverrideParams::new(profile.user_agent().to_string()))
            .await
            .map_err(|e| map_cdp_error("set user agent", e))?;

        debug!(?profile, width, height, "Applied client profile");
        self.profile = Some(profile);
        Ok(())
    }

    async fn evaluate_value(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        let page = &self.page;
        with_page_timeout(
            async {
                let result = page
                    .evaluate(script)
                    .await
                    .map_err(|e| map_cdp_error("evaluate", e))?;
                // Scripts returning `undefined` carry no value
                Ok(result
                    .into_value::<serde_json::Value>()
                    .unwrap_or(serde_json::Value::Null))
            },
            self.request_timeout,
            "Script evaluation",
        )
        .await
    }
}

impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, url: &str, options: NavigateOptions) -> Result<(), SessionError> {
        self.apply_profile(options.profile).await?;

        let page = &self.page;
        with_page_timeout(
            async {
                page.goto(url)
                    .await
                    .map_err(|e| map_cdp_error("goto", e))?;
                if options.wait_until == WaitUntil::Load {
                    page.wait_for_navigation()
                        .await
                        .map_err(|e| map_cdp_error("wait_for_navigation", e))?;
                }
                Ok(())
            },
            options.timeout,
            "Page navigation",
        )
        .await
    }

    async fn wait_for_element(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, SessionError> {
        let script = js_scripts::exists_script(selector);
        let start = Instant::now();

        loop {
            match self.evaluate_value(&script).await {
                Ok(serde_json::Value::Bool(true)) => {
                    trace!(selector, elapsed = ?start.elapsed(), "Element present");
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) if e.is_disconnect() => return Err(e),
                Err(e) => trace!(selector, error = %e, "Element probe failed, retrying"),
            }

            if start.elapsed() >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }

    async fn read_text(&mut self, selector: &str) -> Result<Option<String>, SessionError> {
        match self
            .evaluate_value(&js_scripts::read_text_script(selector))
            .await?
        {
            serde_json::Value::String(text) => Ok(Some(text)),
            serde_json::Value::Null => Ok(None),
            other => Err(SessionError::Protocol(format!(
                "read_text({selector}) returned non-string value: {other}"
            ))),
        }
    }

    async fn count_elements(&mut self, selector: &str) -> Result<usize, SessionError> {
        let value = self
            .evaluate_value(&js_scripts::count_script(selector))
            .await?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                SessionError::Protocol(format!("count({selector}) returned {value}"))
            })
    }

    async fn evaluate(&mut self, script: &str) -> Result<serde_json::Value, SessionError> {
        self.evaluate_value(script).await
    }

    async fn reload(&mut self, timeout: Duration) -> Result<(), SessionError> {
        let page = &self.page;
        with_page_timeout(
            async {
                page.reload()
                    .await
                    .map_err(|e| map_cdp_error("reload", e))?;
                Ok(())
            },
            timeout,
            "Page reload",
        )
        .await
    }

    async fn close(self) -> Result<(), SessionError> {
        self.page
            .close()
            .await
            .map_err(|e| map_cdp_error("close", e))
    }
}
