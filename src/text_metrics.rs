//! Derived text metrics stored with every article record.

use once_cell::sync::Lazy;
use regex::Regex;

/// `$` followed by digits with optional cents, an amount in "dollars", or "USD".
static MONEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(\.\d{2})?|(\d+ )?dollars|USD").unwrap());

/// Case-insensitive, non-overlapping occurrences of `phrase` in `title` plus
/// those in `description`.
///
/// The two fields are counted separately, so a phrase that would only appear
/// across the join of title and description is not counted. An empty phrase
/// counts as zero.
pub fn count_search_phrase(phrase: &str, title: &str, description: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    let needle = phrase.to_lowercase();
    let count_in = |text: &str| text.to_lowercase().matches(needle.as_str()).count();
    count_in(title) + count_in(description)
}

/// Whether the title or description mentions money.
pub fn contains_money(title: &str, description: &str) -> bool {
    MONEY_PATTERN.is_match(&format!("{title} {description}"))
}
