//! Result pagination and article extraction.
//!
//! The extractor walks the search result pages newest-first. For every entry
//! it reads the raw fields, dates the article, and either records it (after
//! downloading its image) or counts it as too old. The run ends when too
//! many consecutive articles fall outside the recency window, when there is
//! no further page, or when a page cannot be read.
//!
//! # Per-entry failures
//!
//! Reading or downloading a single entry yields `Result<_, SkipReason>`; a
//! failed entry is logged and skipped and pagination carries on.
//!
//! # Stopping
//!
//! With the default tolerance of one, the first out-of-window article ends the
//! run, even when later entries would be in the window. Results are assumed to
//! be sorted newest-first.

use crate::config::{RunSettings, ScraperConfig};
use crate::locators::SiteLocators;
use crate::media::{ImageFetcher, store_image};
use crate::models::{ArticleRecord, ExtractionSummary, RawArticle, SkipReason, StopReason};
use crate::page::{PageElement, PageError, PageSource, WaitCondition};
use crate::text_metrics::{contains_money, count_search_phrase};
use crate::utils::{ensure_writable_dir, truncate_for_log};
use chrono::{DateTime, Local, TimeDelta, TimeZone};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

#[derive(Debug, Error)]
#[error("download folder {path} is not usable: {source}")]
pub struct DownloadFolderError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Oldest publication time still inside a window of `months` × 30 days
/// ending at `now`.
///
/// `None` when the window reaches past the earliest representable date; every
/// article is then inside it.
pub fn date_limit(now: DateTime<Local>, months: u32) -> Option<DateTime<Local>> {
    TimeDelta::try_days(30 * i64::from(months)).and_then(|window| now.checked_sub_signed(window))
}

/// Local publication time of a millisecond epoch timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Local>, SkipReason> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|millis| Local.timestamp_millis_opt(millis).single())
        .ok_or_else(|| SkipReason::BadTimestamp(raw.to_string()))
}

fn missing(field: &'static str) -> impl FnOnce(PageError) -> SkipReason {
    move |source| SkipReason::MissingField { field, source }
}

/// What one result entry turned into.
#[derive(Debug)]
enum EntryOutcome {
    Recorded(ArticleRecord),
    OutOfWindow(DateTime<Local>),
    Skipped(SkipReason),
}

/// Paginates through search results and builds article records.
pub struct Extractor<'a, P, F> {
    page: &'a P,
    fetcher: &'a F,
    locators: &'a SiteLocators,
    search_phrase: &'a str,
    download_folder: &'a Path,
    date_limit: Option<DateTime<Local>>,
    settings: &'a RunSettings,
}

impl<'a, P, F> Extractor<'a, P, F>
where
    P: PageSource,
    F: ImageFetcher,
{
    /// Prepare an extraction whose recency window ends at `now`.
    pub fn new(
        page: &'a P,
        fetcher: &'a F,
        locators: &'a SiteLocators,
        config: &'a ScraperConfig,
        settings: &'a RunSettings,
        now: DateTime<Local>,
    ) -> Self {
        Extractor {
            page,
            fetcher,
            locators,
            search_phrase: &config.search_phrase,
            download_folder: &config.download_folder,
            date_limit: date_limit(now, config.months),
            settings,
        }
    }

    /// Walk the result pages starting from the one currently loaded.
    ///
    /// Only an unusable download folder is an error; every page-level
    /// problem ends the walk with the matching [`StopReason`].
    #[instrument(level = "info", skip_all, fields(date_limit = ?self.date_limit.map(|limit| limit.date_naive())))]
    pub async fn run(&self) -> Result<ExtractionSummary, DownloadFolderError> {
        ensure_writable_dir(self.download_folder)
            .await
            .map_err(|source| DownloadFolderError {
                path: self.download_folder.to_path_buf(),
                source,
            })?;

        let tolerance = self.settings.old_article_tolerance.max(1);
        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut pages_visited = 0u32;
        let mut old_streak = 0u32;
        let mut visited = HashSet::new();
        if let Ok(url) = self.page.current_url().await {
            visited.insert(url);
        }

        let stop_reason = 'pages: loop {
            pages_visited += 1;

            let entries = match self.page_entries().await {
                Ok(entries) => entries,
                Err(e) => {
                    error!(page = pages_visited, error = %e, "Results list unavailable; stopping");
                    break StopReason::ListUnavailable;
                }
            };
            info!(page = pages_visited, entries = entries.len(), "Processing results page");

            for (index, entry) in entries.iter().enumerate() {
                match self.process_entry(entry).await {
                    EntryOutcome::Recorded(record) => {
                        old_streak = 0;
                        debug!(index, title = %truncate_for_log(&record.title, 80), "Recorded article");
                        records.push(record);
                    }
                    EntryOutcome::OutOfWindow(published) => {
                        old_streak += 1;
                        info!(
                            index,
                            published = %published.format("%Y-%m-%d"),
                            streak = old_streak,
                            "Article older than the recency window"
                        );
                        if old_streak >= tolerance {
                            break 'pages StopReason::DateLimit;
                        }
                    }
                    EntryOutcome::Skipped(reason) => {
                        skipped += 1;
                        error!(index, error = %reason, "Error processing article; skipping");
                    }
                }
            }

            if self
                .settings
                .max_pages
                .is_some_and(|cap| pages_visited >= cap)
            {
                warn!(pages_visited, "Page cap reached; stopping");
                break StopReason::PageCap;
            }

            let Some(next_url) = self.next_page_url().await else {
                info!(pages_visited, "No next page; end of results");
                break StopReason::NoNextPage;
            };
            if !visited.insert(next_url.clone()) {
                warn!(url = %next_url, "Next page was already visited; stopping");
                break StopReason::RevisitedPage;
            }
            if let Err(e) = self.page.navigate(&next_url).await {
                error!(url = %next_url, error = %e, "Failed to open next page; stopping");
                break StopReason::NavigationFailed;
            }
        };

        info!(
            records = records.len(),
            skipped,
            pages_visited,
            ?stop_reason,
            "Extraction finished"
        );
        Ok(ExtractionSummary {
            records,
            pages_visited,
            skipped,
            stop_reason,
        })
    }

    async fn page_entries(&self) -> Result<Vec<P::Element>, PageError> {
        self.page
            .wait_until(
                &self.locators.results_list,
                WaitCondition::Present,
                self.settings.wait_timeout,
            )
            .await?;
        self.page.find_all(&self.locators.result_entry).await
    }

    async fn process_entry(&self, entry: &P::Element) -> EntryOutcome {
        let raw = match self.read_entry(entry).await {
            Ok(raw) => raw,
            Err(reason) => return EntryOutcome::Skipped(reason),
        };
        let published = match parse_timestamp(&raw.timestamp) {
            Ok(published) => published,
            Err(reason) => return EntryOutcome::Skipped(reason),
        };
        if self.date_limit.is_some_and(|limit| published < limit) {
            return EntryOutcome::OutOfWindow(published);
        }
        match self.build_record(raw, published).await {
            Ok(record) => EntryOutcome::Recorded(record),
            Err(reason) => EntryOutcome::Skipped(reason),
        }
    }

    async fn read_entry(&self, entry: &P::Element) -> Result<RawArticle, SkipReason> {
        let l = self.locators;

        let title = entry.child_text(&l.title).await.map_err(missing("title"))?;
        let description = entry
            .child_text(&l.description)
            .await
            .map_err(missing("description"))?;
        let timestamp = entry
            .child_attr(&l.timestamp, l.timestamp_attribute)
            .await
            .map_err(missing("timestamp"))?;
        let image_src = entry
            .child_attr(&l.image, l.image_attribute)
            .await
            .map_err(missing("image"))?;
        let image_url = self.absolute_url(image_src).await;

        Ok(RawArticle {
            title,
            description,
            timestamp,
            image_url,
        })
    }

    async fn build_record(
        &self,
        raw: RawArticle,
        published: DateTime<Local>,
    ) -> Result<ArticleRecord, SkipReason> {
        let bytes = self.fetcher.fetch(&raw.image_url).await?;
        let path = store_image(self.download_folder, &bytes).await?;

        Ok(ArticleRecord {
            count_of_search_phrases: count_search_phrase(
                self.search_phrase,
                &raw.title,
                &raw.description,
            ),
            contains_money: contains_money(&raw.title, &raw.description),
            date: published.format("%Y-%m-%d").to_string(),
            image_filename: path.display().to_string(),
            title: raw.title,
            description: raw.description,
        })
    }

    /// Absolute URL of the next results page, if the page links one.
    async fn next_page_url(&self) -> Option<String> {
        let link = self
            .page
            .wait_until(
                &self.locators.next_page_link,
                WaitCondition::Clickable,
                self.settings.wait_timeout,
            )
            .await
            .ok()?;
        let href = match link.attr("href").await {
            Ok(Some(href)) => href,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Could not read next page link");
                return None;
            }
        };

        Some(self.absolute_url(href).await)
    }

    /// `href` resolved against the page currently loaded; unchanged when
    /// either side does not parse.
    async fn absolute_url(&self, href: String) -> String {
        let Ok(current) = self.page.current_url().await else {
            return href;
        };
        Url::parse(&current)
            .and_then(|base| base.join(&href))
            .map(String::from)
            .unwrap_or(href)
    }
}
