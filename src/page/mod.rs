//! Browser page abstraction.
//!
//! Everything the scraper does to a rendered page goes through the traits in
//! this module, so the navigation and extraction logic never touches the
//! WebDriver client directly:
//!
//! - [`PageSource`]: the page as a whole (navigation, lookups, bounded waits)
//! - [`PageElement`]: one element found on that page
//! - [`Session`]: a page source that owns a browser and must be closed
//!
//! The real implementation lives in [`crate::browser`]. Tests run the same
//! code against the in-memory page in [`fake`].

use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
pub mod fake;

/// How to find an element within a page or within another element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// A CSS selector.
    Css(String),
    /// A bare tag name such as `input`.
    Tag(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Locator::Tag(name.into())
    }

    /// The selector string, whatever its kind.
    pub fn as_str(&self) -> &str {
        match self {
            Locator::Css(s) | Locator::Tag(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::Tag(s) => write!(f, "tag `{s}`"),
        }
    }
}

/// What a bounded wait waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// The element exists in the document.
    Present,
    /// The element exists, is displayed and is enabled.
    Clickable,
}

/// Failure of a single page or element operation.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no element matches {locator}: {reason}")]
    NotFound { locator: Locator, reason: String },

    #[error("timed out after {waited:?} waiting for {locator}")]
    Timeout { locator: Locator, waited: Duration },

    #[error("element at {locator} has no `{attribute}` attribute")]
    MissingAttribute { locator: Locator, attribute: String },

    #[error("webdriver error: {0}")]
    Driver(String),
}

/// An element found on a page.
pub trait PageElement: Sized {
    /// First descendant matching `locator`.
    async fn find_one(&self, locator: &Locator) -> Result<Self, PageError>;

    /// All descendants matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, PageError>;

    /// Rendered text of the element and its descendants.
    async fn text(&self) -> Result<String, PageError>;

    /// Value of an attribute, `None` when the element does not carry it.
    async fn attr(&self, name: &str) -> Result<Option<String>, PageError>;

    async fn click(&self) -> Result<(), PageError>;

    async fn send_keys(&self, text: &str) -> Result<(), PageError>;

    async fn press_enter(&self) -> Result<(), PageError>;

    /// Choose the `<option>` whose visible text is exactly `text`.
    async fn select_by_text(&self, text: &str) -> Result<(), PageError>;

    /// Text of the first descendant matching `locator`.
    async fn child_text(&self, locator: &Locator) -> Result<String, PageError> {
        self.find_one(locator).await?.text().await
    }

    /// Attribute of the first descendant matching `locator`; a missing
    /// attribute is an error.
    async fn child_attr(&self, locator: &Locator, attribute: &str) -> Result<String, PageError> {
        self.find_one(locator)
            .await?
            .attr(attribute)
            .await?
            .ok_or_else(|| PageError::MissingAttribute {
                locator: locator.clone(),
                attribute: attribute.to_string(),
            })
    }
}

/// A rendered page that can be navigated and queried.
pub trait PageSource {
    type Element: PageElement;

    async fn navigate(&self, url: &str) -> Result<(), PageError>;

    async fn current_url(&self) -> Result<String, PageError>;

    async fn find_one(&self, locator: &Locator) -> Result<Self::Element, PageError>;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, PageError>;

    /// Poll for `locator` until `condition` holds, failing with
    /// [`PageError::Timeout`] once `timeout` has elapsed.
    async fn wait_until(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Self::Element, PageError>;
}

/// A page source backed by a browser that has to be released.
pub trait Session: PageSource + Sized {
    async fn close(self) -> Result<(), PageError>;
}
