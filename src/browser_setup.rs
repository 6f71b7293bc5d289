//! Chromium discovery and launch

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::utils::constants::{CHROME_USER_AGENT, DESKTOP_VIEWPORT};

/// Environment variable that overrides executable discovery
pub const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

fn platform_candidates() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        let mut roots: Vec<PathBuf> = ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"]
            .iter()
            .filter_map(|var| std::env::var_os(var).map(PathBuf::from))
            .collect();
        roots.push(PathBuf::from(r"C:\Program Files"));
        roots
            .into_iter()
            .flat_map(|root| {
                [
                    root.join(r"Google\Chrome\Application\chrome.exe"),
                    root.join(r"Chromium\Application\chrome.exe"),
                ]
            })
            .collect()
    } else if cfg!(target_os = "macos") {
        let mut paths = vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
            PathBuf::from("/opt/homebrew/bin/chromium"),
        ];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"));
            paths.push(home.join("Applications/Chromium.app/Contents/MacOS/Chromium"));
        }
        paths
    } else {
        [
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
        .into_iter()
        .map(PathBuf::from)
        .collect()
    }
}

/// Find a Chrome/Chromium executable
///
/// Checks `CHROMIUM_PATH`, then well-known install locations, then `which`.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CHROMIUM_PATH_ENV).map(PathBuf::from) {
        if path.exists() {
            info!("Using browser from {CHROMIUM_PATH_ENV}: {}", path.display());
            return Ok(path);
        }
        warn!(
            "{CHROMIUM_PATH_ENV} points to a missing file: {}",
            path.display()
        );
    }

    if let Some(path) = platform_candidates().into_iter().find(|p| p.exists()) {
        info!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows") {
        for cmd in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    info!("Found browser using 'which {cmd}': {found}");
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache directory
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir();
            warn!(
                "No user cache directory, downloading into {}",
                fallback.display()
            );
            fallback
        })
        .join("listing_scrape")
        .join("chromium");

    info!("Downloading managed Chromium into {}", cache_dir.display());
    std::fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

/// Launch flags for container-friendly headless scraping
const LAUNCH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
    "--no-first-run",
    "--no-zygote",
    "--no-default-browser-check",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-extensions",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-hang-monitor",
    "--metrics-recording-only",
    "--password-store=basic",
    "--use-mock-keychain",
    "--hide-scrollbars",
    "--mute-audio",
];

/// Find or download Chromium and launch it
///
/// Returns the browser, the task draining its CDP event stream, and the
/// profile directory it runs in.
pub async fn launch_browser(
    headless: bool,
    user_data_dir: PathBuf,
) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let chrome_path = match find_browser_executable().await {
        Ok(path) => path,
        Err(e) => {
            warn!("{e}; falling back to a managed download");
            download_managed_browser().await?
        }
    };

    std::fs::create_dir_all(&user_data_dir).context("Failed to create user data directory")?;

    let (width, height) = DESKTOP_VIEWPORT;
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(width, height)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path);

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder = builder.arg(format!("--user-agent={CHROME_USER_AGENT}"));
    for arg in LAUNCH_ARGS {
        builder = builder.arg(*arg);
    }

    let browser_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    debug!("Launching browser with config: {:?}", browser_config);
    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let msg = e.to_string();
                // chromiumoxide cannot decode some newer CDP events
                if msg.contains("data did not match any variant of untagged enum Message")
                    || msg.contains("Failed to deserialize WS response")
                {
                    trace!("Suppressed CDP decode error: {msg}");
                } else {
                    error!("Browser handler error: {e:?}");
                }
            }
        }
        debug!("Browser handler task completed");
    });

    info!("Browser launched (headless: {headless})");
    Ok((browser, handler_task, user_data_dir))
}
