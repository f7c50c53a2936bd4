//! # LA Times Search Scraper
//!
//! Drives a real browser through the Los Angeles Times search page and
//! exports the recent articles that match a search phrase to a spreadsheet.
//!
//! ## Features
//!
//! - Searches for a phrase, optionally filtered by news categories and sorted
//!   by a chosen order
//! - Walks the result pages newest-first until articles fall outside a
//!   recency window of N months
//! - Downloads each article's image under a SHA-256 content-addressed name
//! - Counts search phrase occurrences and flags mentions of money
//! - Writes an `.xlsx` spreadsheet, and optionally a JSON copy
//!
//! ## Usage
//!
//! ```sh
//! chromedriver --port=9515 &
//! latimes_search_scraper -c config.json --headless
//! ```
//!
//! ## Architecture
//!
//! The application follows a linear pipeline:
//! 1. **Session**: connect to a WebDriver server and open a browser
//! 2. **Navigation**: search, filter by category, sort
//! 3. **Extraction**: paginate and build article records
//! 4. **Output**: write the spreadsheet (and JSON)
//!
//! The browser is closed on every exit path once the session is open.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod extractor;
mod locators;
mod media;
mod models;
mod navigator;
mod outputs;
mod page;
mod pipeline;
mod session;
mod text_metrics;
mod utils;

use browser::BrowserSession;
use cli::Cli;
use config::ScraperConfig;
use locators::SiteLocators;
use media::HttpImageFetcher;
use pipeline::run_pipeline;
use session::with_session;

const IMAGE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("latimes_search_scraper starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Config errors are fatal before any browser is started
    let config = ScraperConfig::load(&args.config).await?;
    let settings = args.run_settings();
    let locators = SiteLocators::latimes();
    let fetcher = HttpImageFetcher::new(IMAGE_DOWNLOAD_TIMEOUT)?;

    let session = BrowserSession::connect(&args.webdriver_url, args.headless).await?;

    let summary = with_session(session, async |page: &BrowserSession| {
        run_pipeline(page, &fetcher, &config, &settings, &locators).await
    })
    .await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        records = summary.records.len(),
        skipped = summary.skipped,
        pages = summary.pages_visited,
        stop_reason = ?summary.stop_reason,
        "Execution complete"
    );

    Ok(())
}
