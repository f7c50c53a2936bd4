//! WebDriver-backed implementation of the page traits.
//!
//! [`BrowserSession`] drives a Chrome instance through a WebDriver server
//! (chromedriver or a Selenium grid) using `thirtyfour`. Start chromedriver
//! before running the scraper:
//!
//! ```sh
//! chromedriver --port=9515
//! ```

use crate::page::{Locator, PageElement, PageError, PageSource, Session, WaitCondition};
use std::time::Duration;
use thirtyfour::ChromiumLikeCapabilities;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use tracing::{debug, info, instrument};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

impl From<WebDriverError> for PageError {
    fn from(e: WebDriverError) -> Self {
        PageError::Driver(e.to_string())
    }
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(_) => By::Css(locator.as_str()),
        Locator::Tag(_) => By::Tag(locator.as_str()),
    }
}

fn lookup_failed(locator: &Locator, e: WebDriverError) -> PageError {
    PageError::NotFound {
        locator: locator.clone(),
        reason: e.to_string(),
    }
}

/// A live browser session.
pub struct BrowserSession {
    driver: WebDriver,
}

impl BrowserSession {
    /// Start a Chrome session on the WebDriver server at `server_url`.
    #[instrument(level = "info", skip_all, fields(%server_url, headless))]
    pub async fn connect(server_url: &str, headless: bool) -> Result<Self, PageError> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(server_url, caps).await?;
        driver.maximize_window().await?;
        info!("Browser session started");

        Ok(BrowserSession { driver })
    }
}

impl PageSource for BrowserSession {
    type Element = BrowserElement;

    #[instrument(level = "debug", skip(self))]
    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, PageError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn find_one(&self, locator: &Locator) -> Result<BrowserElement, PageError> {
        self.driver
            .find(by(locator))
            .await
            .map(BrowserElement)
            .map_err(|e| lookup_failed(locator, e))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<BrowserElement>, PageError> {
        let elements = self.driver.find_all(by(locator)).await?;
        Ok(elements.into_iter().map(BrowserElement).collect())
    }

    async fn wait_until(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<BrowserElement, PageError> {
        let query = self.driver.query(by(locator)).wait(timeout, POLL_INTERVAL);
        let query = match condition {
            WaitCondition::Present => query,
            WaitCondition::Clickable => query.and_clickable(),
        };

        query.first().await.map(BrowserElement).map_err(|e| {
            debug!(%locator, error = %e, "Wait for element failed");
            PageError::Timeout {
                locator: locator.clone(),
                waited: timeout,
            }
        })
    }
}

impl Session for BrowserSession {
    async fn close(self) -> Result<(), PageError> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// An element handle within a [`BrowserSession`].
#[derive(Debug, Clone)]
pub struct BrowserElement(WebElement);

impl PageElement for BrowserElement {
    async fn find_one(&self, locator: &Locator) -> Result<Self, PageError> {
        self.0
            .find(by(locator))
            .await
            .map(BrowserElement)
            .map_err(|e| lookup_failed(locator, e))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, PageError> {
        let elements = self.0.find_all(by(locator)).await?;
        Ok(elements.into_iter().map(BrowserElement).collect())
    }

    async fn text(&self) -> Result<String, PageError> {
        Ok(self.0.text().await?)
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.0.attr(name).await?)
    }

    async fn click(&self) -> Result<(), PageError> {
        self.0.click().await?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), PageError> {
        self.0.send_keys(text).await?;
        Ok(())
    }

    async fn press_enter(&self) -> Result<(), PageError> {
        self.0.send_keys(Key::Enter).await?;
        Ok(())
    }

    async fn select_by_text(&self, text: &str) -> Result<(), PageError> {
        let select = SelectElement::new(&self.0).await?;
        select.select_by_exact_text(text).await?;
        Ok(())
    }
}
