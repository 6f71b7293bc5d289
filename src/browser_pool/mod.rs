//! Single-owner shared browser
//!
//! Keeps one long-lived Chromium instance behind an async mutex. A batch
//! leases the browser for its whole run; other batches wait for the lease.
//! Every lease health-checks the browser first and relaunches it if the
//! probe fails.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser_profile::{create_unique_profile, remove_profile_dir};
use crate::scrape_engine::errors::{ScrapeError, ScrapeResult};
use crate::session::{ChromiumSession, SessionError};

/// Pool settings
#[derive(Debug, Clone)]
pub struct SessionPoolConfig {
    /// Run the browser without a window (default: true)
    pub headless: bool,
    /// Deadline for launching a browser (default: 60s)
    pub launch_timeout: Duration,
    /// Deadline for the liveness probe (default: 5s)
    pub health_check_timeout: Duration,
}

impl Default for SessionPoolConfig {
    fn default() -> Self {
        Self {
            headless: true,
            launch_timeout: Duration::from_secs(60),
            health_check_timeout: Duration::from_secs(5),
        }
    }
}

impl SessionPoolConfig {
    #[must_use]
    pub fn from_scrape_config(config: &crate::config::ScrapeConfig) -> Self {
        Self {
            headless: config.headless(),
            ..Self::default()
        }
    }
}

/// A running browser plus the task draining its event stream
#[derive(Debug)]
struct ManagedBrowser {
    id: u64,
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    launched_at: Instant,
}

impl ManagedBrowser {
    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser {}: {e}", self.id);
        }
        match self.browser.wait().await {
            Ok(status) => debug!("Browser {} process exited: {status:?}", self.id),
            Err(e) => debug!("Failed to reap browser {} process: {e}", self.id),
        }
        info!(
            "Closed browser {} after {:?}",
            self.id,
            self.launched_at.elapsed()
        );
    }
}

impl Drop for ManagedBrowser {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(dir) = self.user_data_dir.take() {
            remove_profile_dir(&dir);
        }
    }
}

/// Shared browser with single-owner leases
#[derive(Debug)]
pub struct SessionPool {
    config: SessionPoolConfig,
    slot: Arc<Mutex<Option<ManagedBrowser>>>,
    next_id: AtomicU64,
}

impl SessionPool {
    /// Create a pool; the browser is launched lazily on first acquire
    pub fn new(config: SessionPoolConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            slot: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(0),
        })
    }

    async fn launch(&self) -> Result<ManagedBrowser> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let profile = create_unique_profile()?;

        let (browser, handler, user_data_dir) = tokio::time::timeout(
            self.config.launch_timeout,
            crate::browser_setup::launch_browser(self.config.headless, profile.path().to_path_buf()),
        )
        .await
        .map_err(|_| anyhow::anyhow!("browser launch exceeded {:?}", self.config.launch_timeout))?
        .context("Failed to launch browser for session pool")?;

        // The managed browser owns the directory from here on
        let _ = profile.into_path();
        info!("Launched browser {id}");

        Ok(ManagedBrowser {
            id,
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
            launched_at: Instant::now(),
        })
    }

    async fn is_healthy(&self, managed: &ManagedBrowser) -> bool {
        match tokio::time::timeout(self.config.health_check_timeout, managed.browser.version()).await
        {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!("Browser {} failed health check: {e}", managed.id);
                false
            }
            Err(_) => {
                warn!("Browser {} health check timed out", managed.id);
                false
            }
        }
    }

    /// Take exclusive use of the browser
    ///
    /// Waits for any other lease to be released, probes the browser and
    /// relaunches it if it is gone.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::SessionUnavailable`] if no healthy browser
    /// could be launched.
    pub async fn acquire(&self) -> ScrapeResult<SessionLease> {
        let mut slot = Arc::clone(&self.slot).lock_owned().await;

        let healthy = match slot.as_ref() {
            Some(managed) => self.is_healthy(managed).await,
            None => false,
        };
        if !healthy && let Some(stale) = slot.take() {
            stale.close().await;
        }

        if slot.is_none() {
            let managed = self.launch().await.map_err(ScrapeError::from)?;
            *slot = Some(managed);
        }

        if let Some(managed) = slot.as_ref() {
            debug!("Leased browser {}", managed.id);
        }
        Ok(SessionLease {
            slot,
            unusable: false,
        })
    }

    /// Close the browser if one is running
    pub async fn shutdown(&self) {
        info!("Shutting down session pool");
        if let Some(managed) = self.slot.lock().await.take() {
            managed.close().await;
        }
    }
}

/// Exclusive use of the pool's browser
///
/// Dropping the lease releases it; a lease marked unusable also tears the
/// browser down so the next acquire starts fresh.
pub struct SessionLease {
    slot: OwnedMutexGuard<Option<ManagedBrowser>>,
    unusable: bool,
}

impl SessionLease {
    /// Identifier of the leased browser instance
    #[must_use]
    pub fn browser_id(&self) -> Option<u64> {
        self.slot.as_ref().map(|m| m.id)
    }

    /// Open a new tab as a rendering session
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Disconnected`] if the browser is gone, or any
    /// error opening the tab.
    pub async fn open_session(&self, request_timeout: Duration) -> Result<ChromiumSession, SessionError> {
        let managed = self
            .slot
            .as_ref()
            .ok_or_else(|| SessionError::Disconnected("leased browser is gone".to_string()))?;
        ChromiumSession::open(&managed.browser, request_timeout).await
    }

    /// Discard the browser when this lease is released
    pub fn mark_unusable(&mut self) {
        self.unusable = true;
    }

    /// Release the lease, closing the browser gracefully if it was marked unusable
    pub async fn release(mut self) {
        if self.unusable
            && let Some(managed) = self.slot.take()
        {
            managed.close().await;
        }
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        if self.unusable
            && let Some(managed) = self.slot.take()
        {
            warn!("Discarding unusable browser {}", managed.id);
        }
    }
}

impl std::fmt::Debug for SessionLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLease")
            .field("browser_id", &self.browser_id())
            .field("unusable", &self.unusable)
            .finish()
    }
}
