//! Chrome profile directories
//!
//! Every launch gets its own UUID-named directory so a relaunch never trips
//! over a `SingletonLock` left behind by a crashed browser.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory name prefix for profiles created by this crate
pub const PROFILE_PREFIX: &str = "listing_scrape_chrome";

/// Profile directory removed on drop unless released with [`into_path`](Self::into_path)
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl BrowserProfile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand the directory to another owner; it will not be removed on drop
    pub fn into_path(mut self) -> PathBuf {
        self.cleanup_on_drop = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.cleanup_on_drop && self.path.exists() {
            remove_profile_dir(&self.path);
        }
    }
}

/// Create a fresh profile directory under the system temp dir
pub fn create_unique_profile() -> Result<BrowserProfile> {
    let path = std::env::temp_dir().join(format!("{PROFILE_PREFIX}_{}", Uuid::new_v4()));

    // create_dir fails if the path already exists
    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    debug!("Created Chrome profile directory: {}", path.display());
    Ok(BrowserProfile {
        path,
        cleanup_on_drop: true,
    })
}

/// Best-effort removal of a profile directory
pub fn remove_profile_dir(path: &Path) {
    debug!("Removing Chrome profile directory: {}", path.display());
    if let Err(e) = std::fs::remove_dir_all(path) {
        warn!("Failed to remove profile directory {}: {e}", path.display());
    }
}
