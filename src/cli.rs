//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option has a default, so running the binary with no arguments
//! searches the Los Angeles Times with `config.json` from the working
//! directory. A few options can also come from environment variables.

use crate::config::RunSettings;
use crate::locators::LATIMES_BASE_URL;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Defaults: config.json, chromedriver on localhost:9515
/// latimes_search_scraper
///
/// # Headless browser, JSON copy of the results, at most five pages
/// latimes_search_scraper --headless --json-output output/news_results.json --max-pages 5
///
/// # Remote selenium server
/// WEBDRIVER_URL=http://selenium:4444 latimes_search_scraper -c search.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "SCRAPER_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Spreadsheet output path
    #[arg(short, long, default_value = "output/news_results.xlsx")]
    pub output: PathBuf,

    /// Also write the results as JSON to this path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// WebDriver server (chromedriver, selenium) to drive the browser through
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Landing page of the news site
    #[arg(long, default_value = LATIMES_BASE_URL)]
    pub base_url: String,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Visible text of the sort option to select
    #[arg(long, default_value = "Newest")]
    pub sort_by: String,

    /// Seconds to wait for any element before giving up
    #[arg(long, default_value_t = 10)]
    pub wait_secs: u64,

    /// Milliseconds to pause after filtering or sorting
    #[arg(long, default_value_t = 2000)]
    pub settle_millis: u64,

    /// Consecutive articles older than the window that end pagination
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub old_article_tolerance: u32,

    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<u32>,
}

impl Cli {
    /// Runtime settings for the pipeline.
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            base_url: self.base_url.clone(),
            sort_order: self.sort_by.clone(),
            wait_timeout: Duration::from_secs(self.wait_secs),
            settle_delay: Duration::from_millis(self.settle_millis),
            old_article_tolerance: self.old_article_tolerance,
            max_pages: self.max_pages,
            output_path: self.output.clone(),
            json_output: self.json_output.clone(),
        }
    }
}
