//! Run configuration.
//!
//! Two layers feed a run:
//! - [`ScraperConfig`]: what to search for, read once from a JSON file
//! - [`RunSettings`]: how to run, built from the command line
//!
//! # Configuration File
//!
//! ```json
//! {
//!   "search_phrase": "climate",
//!   "news_category": ["California", "World & Nation"],
//!   "months": 1,
//!   "download_folder": "output/images"
//! }
//! ```
//!
//! Every key is required. `news_category` may be an empty list.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What to search for and where to keep downloaded images.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScraperConfig {
    /// Phrase typed into the site search.
    pub search_phrase: String,
    /// Category filters to tick, in order. Empty means no filtering.
    pub news_category: Vec<String>,
    /// Size of the recency window; one month counts as 30 days.
    pub months: u32,
    /// Folder that receives the content-addressed images.
    pub download_folder: PathBuf,
}

impl ScraperConfig {
    /// Read and parse the JSON configuration file at `path`.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config: ScraperConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            search_phrase = %config.search_phrase,
            categories = config.news_category.len(),
            months = config.months,
            download_folder = %config.download_folder.display(),
            "Loaded configuration"
        );
        Ok(config)
    }
}

/// Runtime knobs that do not belong to the search itself.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Landing page of the site.
    pub base_url: String,
    /// Visible text of the sort option to choose.
    pub sort_order: String,
    /// Upper bound for every element wait.
    pub wait_timeout: Duration,
    /// Pause after applying filters or sorting so results can refresh.
    pub settle_delay: Duration,
    /// Consecutive out-of-window articles that end pagination.
    pub old_article_tolerance: u32,
    /// Optional cap on result pages visited.
    pub max_pages: Option<u32>,
    /// Spreadsheet destination.
    pub output_path: PathBuf,
    /// Optional JSON export destination.
    pub json_output: Option<PathBuf>,
}

#[cfg(test)]
impl RunSettings {
    /// Settings with no pauses, for tests against an in-memory page.
    pub fn for_tests(output_dir: &Path) -> Self {
        RunSettings {
            base_url: "https://news.test/".to_string(),
            sort_order: "Newest".to_string(),
            wait_timeout: Duration::from_millis(10),
            settle_delay: Duration::ZERO,
            old_article_tolerance: 1,
            max_pages: None,
            output_path: output_dir.join("news_results.xlsx"),
            json_output: None,
        }
    }
}
