// listing-scrape: scrape a page range of the catalog and print the records.
//
//   START_PAGE  first page (default 0)
//   END_PAGE    last page; when unset the total is discovered and the
//               range runs to the end, clamped to the batch ceiling
//   HEADLESS    set to "false" to watch the browser
//   RUST_LOG    tracing filter (default "info")

use anyhow::{Context, Result};
use listing_scrape::{
    ScrapeBatchRequest, ScrapeConfig, SessionPool, SessionPoolConfig,
    discover_total_pages_with_pool, scrape_listings,
};
use tracing_subscriber::EnvFilter;

fn env_u32(name: &str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .with_context(|| format!("{name} must be a non-negative integer, got '{raw}'")),
        _ => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let headless = std::env::var("HEADLESS").map_or(true, |v| v != "false");
    let config = ScrapeConfig::builder()
        .headless(headless)
        .build()
        .context("Invalid configuration")?;
    let pool = SessionPool::new(SessionPoolConfig::from_scrape_config(&config));

    let start = env_u32("START_PAGE")?.unwrap_or(0);
    let end = match env_u32("END_PAGE")? {
        Some(end) => end,
        None => {
            let total = discover_total_pages_with_pool(&pool, &config).await;
            tracing::info!(total, "Discovered total pages");
            total.saturating_sub(1).max(start)
        }
    };

    let result = scrape_listings(&pool, &config, ScrapeBatchRequest::new(start, end)).await;
    pool.shutdown().await;
    let report = result.context("Batch failed")?;

    tracing::info!(
        records = report.records.len(),
        failed = ?report.pages_failed(),
        low_confidence = ?report.pages_low_confidence,
        "Done"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&report.into_records()).context("Failed to encode records")?
    );
    Ok(())
}
