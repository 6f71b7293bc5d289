//! Recovery actions for a critical count mismatch
//!
//! The strategist walks an ordered, configurable list of actions. Each call
//! to [`RecoveryStrategist::perform_next`] performs one action on the
//! session; the page state machine then re-extracts and re-validates.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::session::{NavigateOptions, RenderSession, SessionError};

/// Cap for the progressive wait-longer delay
const MAX_WAIT_LONGER: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Give client-side rendering more time; delay doubles on each repeat
    WaitLonger,
    /// Reload the current document
    Reload,
    /// Navigate to the same page URL again
    RenavigateSameUrl,
}

impl RecoveryAction {
    #[must_use]
    pub fn default_order() -> Vec<Self> {
        vec![Self::WaitLonger, Self::Reload, Self::RenavigateSameUrl]
    }
}

/// Per-page cursor over the configured recovery actions
#[derive(Debug)]
pub struct RecoveryStrategist<'a> {
    actions: &'a [RecoveryAction],
    next: usize,
    waits_taken: u32,
    base_backoff: Duration,
}

impl<'a> RecoveryStrategist<'a> {
    #[must_use]
    pub fn new(actions: &'a [RecoveryAction], base_backoff: Duration) -> Self {
        Self {
            actions,
            next: 0,
            waits_taken: 0,
            base_backoff,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.actions.len()
    }

    /// Actions performed so far
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.next
    }

    /// Delay the next wait-longer action would use
    #[must_use]
    pub fn wait_longer_delay(&self) -> Duration {
        let factor = 1u32.checked_shl(self.waits_taken).unwrap_or(u32::MAX);
        self.base_backoff
            .checked_mul(factor)
            .unwrap_or(MAX_WAIT_LONGER)
            .min(MAX_WAIT_LONGER)
    }

    /// Perform the next action
    ///
    /// Returns `None` once every action has been tried. The cursor advances
    /// even when the action itself fails, so a broken reload cannot loop.
    pub async fn perform_next<S: RenderSession>(
        &mut self,
        session: &mut S,
        url: &str,
        navigate: NavigateOptions,
    ) -> Option<(RecoveryAction, Result<(), SessionError>)> {
        let action = *self.actions.get(self.next)?;
        self.next += 1;

        info!(
            action = ?action,
            attempt = self.next,
            of = self.actions.len(),
            "Performing recovery action"
        );

        let result = match action {
            RecoveryAction::WaitLonger => {
                let delay = self.wait_longer_delay();
                self.waits_taken += 1;
                debug!(?delay, "Waiting for rendering to catch up");
                tokio::time::sleep(delay).await;
                Ok(())
            }
            RecoveryAction::Reload => session.reload(navigate.timeout).await,
            RecoveryAction::RenavigateSameUrl => session.navigate(url, navigate).await,
        };

        Some((action, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_wait_reload_renavigate() {
        assert_eq!(
            RecoveryAction::default_order(),
            vec![
                RecoveryAction::WaitLonger,
                RecoveryAction::Reload,
                RecoveryAction::RenavigateSameUrl
            ]
        );
    }

    #[test]
    fn wait_longer_backs_off_progressively() {
        let actions = [RecoveryAction::WaitLonger; 3];
        let mut strategist = RecoveryStrategist::new(&actions, Duration::from_millis(100));
        assert_eq!(strategist.wait_longer_delay(), Duration::from_millis(100));
        strategist.waits_taken = 1;
        assert_eq!(strategist.wait_longer_delay(), Duration::from_millis(200));
        strategist.waits_taken = 3;
        assert_eq!(strategist.wait_longer_delay(), Duration::from_millis(800));
        strategist.waits_taken = 40;
        assert_eq!(strategist.wait_longer_delay(), MAX_WAIT_LONGER);
    }

    #[test]
    fn empty_action_list_is_exhausted() {
        let strategist = RecoveryStrategist::new(&[], Duration::from_secs(1));
        assert!(strategist.is_exhausted());
        assert_eq!(strategist.attempts(), 0);
    }

    #[test]
    fn serde_names_are_snake_case() {
        let json = serde_json::to_string(&RecoveryAction::RenavigateSameUrl).unwrap();
        assert_eq!(json, "\"renavigate_same_url\"");
    }
}
