//! Data models for scraped search results.
//!
//! - [`RawArticle`]: the strings read from one result entry
//! - [`ArticleRecord`]: one exported row
//! - [`SkipReason`]: why an entry produced no row
//! - [`ExtractionSummary`]: everything the pagination loop hands back

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fields of one search-result entry exactly as they appear on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    /// Milliseconds since the Unix epoch, as written in the page markup.
    pub timestamp: String,
    pub image_url: String,
}

/// One row of the exported results.
///
/// Field names are the column headers of the spreadsheet and the keys of the
/// JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    /// Publication date in `YYYY-MM-DD` format.
    pub date: String,
    pub description: String,
    /// Path of the stored image, `<download_folder>/<sha256-hex>.jpg`.
    pub image_filename: String,
    /// Case-insensitive occurrences of the search phrase in the title plus
    /// those in the description.
    pub count_of_search_phrases: usize,
    /// Whether the title or description mentions an amount of money.
    pub contains_money: bool,
}

impl ArticleRecord {
    /// Column headers, in export order.
    pub const COLUMNS: [&'static str; 6] = [
        "title",
        "date",
        "description",
        "image_filename",
        "count_of_search_phrases",
        "contains_money",
    ];
}

/// Why a single result entry was skipped. Skipping never stops pagination.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("could not read {field}: {source}")]
    MissingField {
        field: &'static str,
        #[source]
        source: crate::page::PageError,
    },

    #[error("timestamp {0:?} is not a millisecond epoch value")]
    BadTimestamp(String),

    #[error("image download failed: {0}")]
    Image(#[from] crate::media::MediaError),
}

/// Why the pagination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Enough consecutive articles fell outside the recency window.
    DateLimit,
    /// The last page has no next-page link.
    NoNextPage,
    /// The results list never appeared on the current page.
    ListUnavailable,
    /// Following the next-page link failed.
    NavigationFailed,
    /// The next-page link points at a page already visited in this run.
    RevisitedPage,
    /// The configured page cap was reached.
    PageCap,
}

/// Outcome of a full pagination run.
#[derive(Debug)]
pub struct ExtractionSummary {
    /// Records in encounter order.
    pub records: Vec<ArticleRecord>,
    pub pages_visited: u32,
    pub skipped: usize,
    pub stop_reason: StopReason,
}
