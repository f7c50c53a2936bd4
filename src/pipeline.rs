//! The scrape from landing page to exported files.
//!
//! 1. **Search**: open the search box and submit the phrase
//! 2. **Filter**: tick the configured categories (best-effort)
//! 3. **Sort**: choose the configured sort order
//! 4. **Extract**: walk the result pages and build records
//! 5. **Export**: write the spreadsheet, and the JSON copy when asked for

use crate::config::{RunSettings, ScraperConfig};
use crate::extractor::Extractor;
use crate::locators::SiteLocators;
use crate::media::ImageFetcher;
use crate::models::ExtractionSummary;
use crate::navigator::Navigator;
use crate::outputs::{json, xlsx};
use crate::page::PageSource;
use chrono::Local;
use std::error::Error;
use tracing::{info, instrument};

/// Run every stage against `page`, which must be a fresh browser page.
///
/// Search and sort failures, an unusable download folder and export failures
/// abort the run. Everything else is logged and reflected in the summary.
#[instrument(level = "info", skip_all, fields(search_phrase = %config.search_phrase))]
pub async fn run_pipeline<P, F>(
    page: &P,
    fetcher: &F,
    config: &ScraperConfig,
    settings: &RunSettings,
    locators: &SiteLocators,
) -> Result<ExtractionSummary, Box<dyn Error>>
where
    P: PageSource,
    F: ImageFetcher,
{
    let navigator = Navigator::new(page, locators, settings);
    navigator.open_search_page(&settings.base_url).await?;
    navigator.enter_search_phrase(&config.search_phrase).await?;
    navigator.filter_by_category(&config.news_category).await;
    navigator.sort_by(&settings.sort_order).await?;

    let summary = Extractor::new(page, fetcher, locators, config, settings, Local::now())
        .run()
        .await?;

    xlsx::write_results(&summary.records, &settings.output_path)?;
    if let Some(path) = &settings.json_output {
        json::write_results(&summary.records, path).await?;
    }

    info!(
        records = summary.records.len(),
        skipped = summary.skipped,
        pages = summary.pages_visited,
        output = %settings.output_path.display(),
        "Pipeline finished"
    );
    Ok(summary)
}
