//! Search page navigation: landing page, search box, category filters and
//! sort order.
//!
//! Opening the search, submitting the phrase and sorting are structural steps
//! and fail the run. Category filtering is best-effort: an unknown category
//! is logged and skipped, and a broken filter panel is logged and ignored.

use crate::config::RunSettings;
use crate::locators::SiteLocators;
use crate::page::{PageElement, PageError, PageSource, WaitCondition};
use itertools::Itertools;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Which configured categories were ticked and which were not found.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CategoryFilterOutcome {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    /// Whether the apply button was pressed.
    pub filter_submitted: bool,
}

/// Drives the search controls of a page.
pub struct Navigator<'a, P> {
    page: &'a P,
    locators: &'a SiteLocators,
    wait: Duration,
    settle: Duration,
}

impl<'a, P: PageSource> Navigator<'a, P> {
    pub fn new(page: &'a P, locators: &'a SiteLocators, settings: &RunSettings) -> Self {
        Navigator {
            page,
            locators,
            wait: settings.wait_timeout,
            settle: settings.settle_delay,
        }
    }

    /// Load the landing page and open the search box.
    #[instrument(level = "info", skip(self))]
    pub async fn open_search_page(&self, base_url: &str) -> Result<(), PageError> {
        self.page.navigate(base_url).await?;
        self.page
            .wait_until(&self.locators.search_button, WaitCondition::Clickable, self.wait)
            .await?
            .click()
            .await?;
        info!("Search box opened");
        Ok(())
    }

    /// Type the phrase into the search box and submit it.
    #[instrument(level = "info", skip(self))]
    pub async fn enter_search_phrase(&self, phrase: &str) -> Result<(), PageError> {
        let input = self
            .page
            .wait_until(&self.locators.search_input, WaitCondition::Present, self.wait)
            .await?;
        input.send_keys(phrase).await?;
        input.press_enter().await?;
        info!("Search submitted");
        Ok(())
    }

    /// Tick the checkbox of every category that can be found, then apply.
    ///
    /// Never fails: problems are logged and reflected in the outcome.
    #[instrument(level = "info", skip_all, fields(count = categories.len()))]
    pub async fn filter_by_category(&self, categories: &[String]) -> CategoryFilterOutcome {
        let mut outcome = CategoryFilterOutcome::default();
        if categories.is_empty() {
            info!("No categories configured; skipping filter");
            return outcome;
        }

        if let Err(e) = self.apply_categories(categories, &mut outcome).await {
            error!(error = %e, "Category filter failed; continuing unfiltered");
        }

        info!(
            applied = %outcome.applied.iter().join(", "),
            skipped = %outcome.skipped.iter().join(", "),
            submitted = outcome.filter_submitted,
            "Category filtering finished"
        );
        outcome
    }

    async fn apply_categories(
        &self,
        categories: &[String],
        outcome: &mut CategoryFilterOutcome,
    ) -> Result<(), PageError> {
        self.click_when_ready(&self.locators.filters_open_button).await?;
        self.click_when_ready(&self.locators.see_all_button).await?;

        for name in categories {
            match self.toggle_category(name).await {
                Ok(()) => outcome.applied.push(name.clone()),
                Err(e) => {
                    error!(category = %name, error = %e, "Category filter error; skipping category");
                    outcome.skipped.push(name.clone());
                }
            }
        }

        self.click_when_ready(&self.locators.apply_button).await?;
        outcome.filter_submitted = true;
        sleep(self.settle).await;
        Ok(())
    }

    /// Click the checkbox inside the first label whose text contains `name`.
    async fn toggle_category(&self, name: &str) -> Result<(), PageError> {
        for label in self.page.find_all(&self.locators.category_label).await? {
            if label.text().await?.contains(name) {
                return label
                    .find_one(&self.locators.category_checkbox)
                    .await?
                    .click()
                    .await;
            }
        }
        Err(PageError::NotFound {
            locator: self.locators.category_label.clone(),
            reason: format!("no label contains {name:?}"),
        })
    }

    /// Choose the sort order by the visible text of its option.
    #[instrument(level = "info", skip(self))]
    pub async fn sort_by(&self, order: &str) -> Result<(), PageError> {
        let select = self
            .page
            .wait_until(&self.locators.sort_select, WaitCondition::Present, self.wait)
            .await?;
        select.select_by_text(order).await?;
        sleep(self.settle).await;
        info!("Sort order applied");
        Ok(())
    }

    async fn click_when_ready(&self, locator: &crate::page::Locator) -> Result<(), PageError> {
        let element = self
            .page
            .wait_until(locator, WaitCondition::Clickable, self.wait)
            .await
            .inspect_err(|e| warn!(%locator, error = %e, "Control not ready"))?;
        element.click().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::FakeSite;
    use std::path::Path;

    const URL: &str = "https://news.test/";

    fn search_page(categories: &str) -> String {
        format!(
            r#"<html><body>
            <button data-element="search-button">Search</button>
            <input data-element="search-form-input" type="text">
            <button class="button filters-open-button">Filters</button>
            <button class="button see-all-button">See all</button>
            {categories}
            <button class="button apply-button">Apply</button>
            <select class="select-input">
              <option>Relevance</option>
              <option>Newest</option>
              <option>Oldest</option>
            </select>
            </body></html>"#
        )
    }

    fn labels() -> &'static str {
        r#"<label><input type="checkbox" value="california"> California</label>
           <label><input type="checkbox" value="world"> World &amp; Nation</label>
           <label><input type="checkbox" value="science"> Science &amp; Medicine</label>"#
    }

    fn settings() -> RunSettings {
        RunSettings::for_tests(Path::new("unused"))
    }

    #[tokio::test]
    async fn test_open_search_and_submit_phrase() {
        let site = FakeSite::new().with_page(URL, search_page(""));
        let locators = SiteLocators::latimes();
        let settings = settings();
        let navigator = Navigator::new(&site, &locators, &settings);

        navigator.open_search_page(URL).await.unwrap();
        navigator.enter_search_phrase("climate").await.unwrap();

        assert_eq!(
            site.actions(),
            vec![
                format!("goto:{URL}"),
                "click:search-button".to_string(),
                "keys:climate".to_string(),
                "enter".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_search_button_is_fatal() {
        let site = FakeSite::new().with_page(URL, "<html><body></body></html>");
        let locators = SiteLocators::latimes();
        let settings = settings();
        let navigator = Navigator::new(&site, &locators, &settings);

        let err = navigator.open_search_page(URL).await.unwrap_err();
        assert!(matches!(err, PageError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_no_categories_touches_nothing() {
        let site = FakeSite::new()
            .with_page(URL, search_page(labels()))
            .starting_at(URL);
        let locators = SiteLocators::latimes();
        let settings = settings();
        let navigator = Navigator::new(&site, &locators, &settings);

        let outcome = navigator.filter_by_category(&[]).await;

        assert_eq!(outcome, CategoryFilterOutcome::default());
        assert_eq!(site.actions(), vec![format!("goto:{URL}")]);
    }

    #[tokio::test]
    async fn test_unknown_category_is_skipped_and_rest_applied() {
        let site = FakeSite::new()
            .with_page(URL, search_page(labels()))
            .starting_at(URL);
        let locators = SiteLocators::latimes();
        let settings = settings();
        let navigator = Navigator::new(&site, &locators, &settings);

        let categories = vec![
            "California".to_string(),
            "Sports".to_string(),
            "Science".to_string(),
        ];
        let outcome = navigator.filter_by_category(&categories).await;

        assert_eq!(outcome.applied, vec!["California", "Science"]);
        assert_eq!(outcome.skipped, vec!["Sports"]);
        assert!(outcome.filter_submitted);

        let actions = site.actions();
        assert!(actions.contains(&"click:california".to_string()));
        assert!(actions.contains(&"click:science".to_string()));
        assert!(!actions.contains(&"click:world".to_string()));
        assert_eq!(actions.last().unwrap(), "click:button apply-button");
    }

    #[tokio::test]
    async fn test_broken_filter_panel_does_not_fail() {
        let page = r#"<html><body><select class="select-input"><option>Newest</option></select></body></html>"#;
        let site = FakeSite::new().with_page(URL, page).starting_at(URL);
        let locators = SiteLocators::latimes();
        let settings = settings();
        let navigator = Navigator::new(&site, &locators, &settings);

        let outcome = navigator
            .filter_by_category(&["California".to_string()])
            .await;

        assert!(!outcome.filter_submitted);
        assert!(outcome.applied.is_empty());
        navigator.sort_by("Newest").await.unwrap();
    }

    #[tokio::test]
    async fn test_sort_by_visible_text() {
        let site = FakeSite::new()
            .with_page(URL, search_page(""))
            .starting_at(URL);
        let locators = SiteLocators::latimes();
        let settings = settings();
        let navigator = Navigator::new(&site, &locators, &settings);

        navigator.sort_by("Newest").await.unwrap();
        assert_eq!(site.actions().last().unwrap(), "select:Newest");

        assert!(navigator.sort_by("Most popular").await.is_err());
    }
}
