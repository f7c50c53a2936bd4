//! Site-specific element locators.
//!
//! Every selector the scraper knows about the target site lives here; the
//! navigation and extraction code only ever refers to these fields.

use crate::page::Locator;

/// Default landing page.
pub const LATIMES_BASE_URL: &str = "https://www.latimes.com/";

/// Locators for the search, filter, sort and result-list controls of a news
/// site's search page.
#[derive(Debug, Clone)]
pub struct SiteLocators {
    pub search_button: Locator,
    pub search_input: Locator,
    pub filters_open_button: Locator,
    pub see_all_button: Locator,
    /// Every label in the category panel; matched against category names by text.
    pub category_label: Locator,
    /// Checkbox inside a matched category label.
    pub category_checkbox: Locator,
    pub apply_button: Locator,
    pub sort_select: Locator,
    pub results_list: Locator,
    /// One entry of the results list, in document order.
    pub result_entry: Locator,
    pub title: Locator,
    pub description: Locator,
    pub timestamp: Locator,
    pub timestamp_attribute: &'static str,
    pub image: Locator,
    pub image_attribute: &'static str,
    pub next_page_link: Locator,
}

impl SiteLocators {
    /// Locators for the Los Angeles Times search page.
    pub fn latimes() -> Self {
        SiteLocators {
            search_button: Locator::css(r#"button[data-element="search-button"]"#),
            search_input: Locator::css(r#"input[data-element="search-form-input"]"#),
            filters_open_button: Locator::css("button.filters-open-button"),
            see_all_button: Locator::css("button.see-all-button"),
            category_label: Locator::css("label"),
            category_checkbox: Locator::tag("input"),
            apply_button: Locator::css("button.apply-button"),
            sort_select: Locator::css("select.select-input"),
            results_list: Locator::css("ul.search-results-module-results-menu"),
            result_entry: Locator::css("ul.search-results-module-results-menu > li"),
            title: Locator::css("h3.promo-title"),
            description: Locator::css("p.promo-description"),
            timestamp: Locator::css("p.promo-timestamp"),
            timestamp_attribute: "data-timestamp",
            image: Locator::css("div.promo-media img.image"),
            image_attribute: "src",
            next_page_link: Locator::css("div.search-results-module-next-page a"),
        }
    }
}
