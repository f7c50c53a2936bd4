//! In-memory page source used by the unit tests.
//!
//! Pages are plain HTML strings keyed by URL and queried with `scraper`, so
//! the production locators run unchanged against fixture markup. Clicks, key
//! presses, selections and navigations are appended to a shared action log
//! that tests inspect afterwards.

use super::{Locator, PageElement, PageError, PageSource, Session, WaitCondition};
use chrono::{DateTime, Local};
use scraper::{ElementRef, Html, Selector};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

type ActionLog = Rc<RefCell<Vec<String>>>;

#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    current: RefCell<Option<String>>,
    log: ActionLog,
    closed: Rc<Cell<bool>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the markup served at `url`.
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Pretend the browser is already showing `url`.
    pub fn starting_at(self, url: &str) -> Self {
        *self.current.borrow_mut() = Some(url.to_string());
        self.log.borrow_mut().push(format!("goto:{url}"));
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    /// Handle that still reports the close state after the site was consumed.
    pub fn closed_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.closed)
    }

    fn document(&self) -> Result<Html, PageError> {
        let current = self.current.borrow();
        let url = current
            .as_deref()
            .ok_or_else(|| PageError::Driver("no page loaded".to_string()))?;
        let html = self
            .pages
            .get(url)
            .ok_or_else(|| PageError::Driver(format!("no fixture for {url}")))?;
        Ok(Html::parse_document(html))
    }

    fn element(&self, element: ElementRef<'_>) -> FakeElement {
        FakeElement::from_ref(element, Rc::clone(&self.log))
    }
}

fn selector(locator: &Locator) -> Result<Selector, PageError> {
    Selector::parse(locator.as_str())
        .map_err(|e| PageError::Driver(format!("invalid selector {locator}: {e:?}")))
}

fn not_found(locator: &Locator) -> PageError {
    PageError::NotFound {
        locator: locator.clone(),
        reason: "no matching element".to_string(),
    }
}

impl PageSource for FakeSite {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<(), PageError> {
        if !self.pages.contains_key(url) {
            return Err(PageError::Driver(format!("no fixture for {url}")));
        }
        self.log.borrow_mut().push(format!("goto:{url}"));
        *self.current.borrow_mut() = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, PageError> {
        self.current
            .borrow()
            .clone()
            .ok_or_else(|| PageError::Driver("no page loaded".to_string()))
    }

    async fn find_one(&self, locator: &Locator) -> Result<FakeElement, PageError> {
        let document = self.document()?;
        let selector = selector(locator)?;
        document
            .select(&selector)
            .next()
            .map(|element| self.element(element))
            .ok_or_else(|| not_found(locator))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>, PageError> {
        let document = self.document()?;
        let selector = selector(locator)?;
        Ok(document
            .select(&selector)
            .map(|element| self.element(element))
            .collect())
    }

    async fn wait_until(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<FakeElement, PageError> {
        let element = self.find_one(locator).await.map_err(|e| match e {
            PageError::NotFound { .. } => PageError::Timeout {
                locator: locator.clone(),
                waited: timeout,
            },
            other => other,
        })?;
        if condition == WaitCondition::Clickable && element.attrs.contains_key("disabled") {
            return Err(PageError::Timeout {
                locator: locator.clone(),
                waited: timeout,
            });
        }
        Ok(element)
    }
}

impl Session for FakeSite {
    async fn close(self) -> Result<(), PageError> {
        self.log.borrow_mut().push("close".to_string());
        self.closed.set(true);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    html: String,
    text: String,
    attrs: HashMap<String, String>,
    tag: String,
    log: ActionLog,
}

impl FakeElement {
    fn from_ref(element: ElementRef<'_>, log: ActionLog) -> Self {
        Self {
            html: element.html(),
            text: element.text().collect::<String>().trim().to_string(),
            attrs: element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tag: element.value().name().to_string(),
            log,
        }
    }

    fn describe(&self) -> String {
        ["value", "data-element", "class"]
            .iter()
            .find_map(|key| self.attrs.get(*key).cloned())
            .unwrap_or_else(|| self.tag.clone())
    }

    fn record(&self, action: String) {
        self.log.borrow_mut().push(action);
    }
}

impl PageElement for FakeElement {
    async fn find_one(&self, locator: &Locator) -> Result<Self, PageError> {
        let fragment = Html::parse_fragment(&self.html);
        let selector = selector(locator)?;
        fragment
            .select(&selector)
            .next()
            .map(|element| FakeElement::from_ref(element, Rc::clone(&self.log)))
            .ok_or_else(|| not_found(locator))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, PageError> {
        let fragment = Html::parse_fragment(&self.html);
        let selector = selector(locator)?;
        Ok(fragment
            .select(&selector)
            .map(|element| FakeElement::from_ref(element, Rc::clone(&self.log)))
            .collect())
    }

    async fn text(&self) -> Result<String, PageError> {
        Ok(self.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn click(&self) -> Result<(), PageError> {
        self.record(format!("click:{}", self.describe()));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), PageError> {
        self.record(format!("keys:{text}"));
        Ok(())
    }

    async fn press_enter(&self) -> Result<(), PageError> {
        self.record("enter".to_string());
        Ok(())
    }

    async fn select_by_text(&self, text: &str) -> Result<(), PageError> {
        let option = Locator::tag("option");
        for candidate in PageElement::find_all(self, &option).await? {
            if candidate.text == text {
                self.record(format!("select:{text}"));
                return Ok(());
            }
        }
        Err(PageError::Driver(format!("no option with text {text:?}")))
    }
}

/// One search-result entry in the site's markup.
pub fn entry(title: &str, description: &str, published: DateTime<Local>, image: &str) -> String {
    format!(
        r#"<li>
          <h3 class="promo-title">{title}</h3>
          <p class="promo-description">{description}</p>
          <p class="promo-timestamp" data-timestamp="{}">date</p>
          <div class="promo-media"><img class="image" src="{image}"></div>
        </li>"#,
        published.timestamp_millis()
    )
}

/// A results page holding `entries`, optionally linking to a next page.
pub fn results_page(entries: &[String], next: Option<&str>) -> String {
    let next = next
        .map(|href| {
            format!(r#"<div class="search-results-module-next-page"><a href="{href}">Next</a></div>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><ul class="search-results-module-results-menu">{}</ul>{next}</body></html>"#,
        entries.concat()
    )
}
