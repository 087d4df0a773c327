//! The logical elements of the search page and the selectors that have been seen to match
//! them.
//!
//! The site ships test ids on some builds and not on others, and its markup changes often, so
//! each element lists its most specific selector first and falls back to looser ones.

use crate::wd::{Locator, Selector};

/// Present once the document has loaded.
pub const PAGE_READY: Locator = Locator::new("page body", &[Selector::tag("body")]);

/// The "from" city field.
pub const ORIGIN_INPUT: Locator = Locator::new(
    "origin input",
    &[
        Selector::css("[data-test-id='origin-autocomplete-field']"),
        Selector::css("input[placeholder*='Откуда']"),
        Selector::css("input[placeholder*='откуда']"),
        Selector::css("[data-test-id='origin']"),
        Selector::id("origin"),
        Selector::css(".origin-field input"),
    ],
);

/// The "to" city field.
pub const DESTINATION_INPUT: Locator = Locator::new(
    "destination input",
    &[
        Selector::css("[data-test-id='destination-autocomplete-field']"),
        Selector::css("input[placeholder*='Куда']"),
        Selector::css("input[placeholder*='куда']"),
        Selector::css("[data-test-id='destination']"),
        Selector::id("destination"),
        Selector::css(".destination-field input"),
    ],
);

/// The button that starts a search.
///
/// The last candidate matches any button whose text says "найти" or "search", in any case.
pub const SEARCH_BUTTON: Locator = Locator::new(
    "search button",
    &[
        Selector::css("[data-test-id='form-submit']"),
        Selector::css("button[type='submit']"),
        Selector::css(".search-button"),
        Selector::css("[data-test-id='search-button']"),
        Selector::css("button.search-btn"),
        Selector::xpath(concat!(
            "//button[contains(translate(normalize-space(.), ",
            "'ABCDEFGHIJKLMNOPQRSTUVWXYZАБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ', ",
            "'abcdefghijklmnopqrstuvwxyzабвгдеёжзийклмнопрстуфхцчшщъыьэюя'), 'найти') ",
            "or contains(translate(normalize-space(.), ",
            "'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), 'search')]",
        )),
    ],
);

/// The page footer.
pub const FOOTER: Locator = Locator::new(
    "footer",
    &[
        Selector::tag("footer"),
        Selector::css(".footer"),
        Selector::css("[data-test-id='footer']"),
        Selector::css("div.footer"),
    ],
);

/// Links inside the footer. Only meaningful relative to a resolved [`FOOTER`].
pub const FOOTER_LINK: Selector = Selector::tag("a");

/// The site logo.
pub const LOGO: Locator = Locator::new(
    "logo",
    &[
        Selector::css("[data-test-id='logo']"),
        Selector::css("a[href='/']"),
        Selector::css(".logo"),
        Selector::css("img[alt*='Aviasales']"),
        Selector::css("img[alt*='логотип']"),
        Selector::css("[class*='logo']"),
    ],
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wd::Strategy;

    #[test]
    fn test_ids_come_first() {
        for locator in [ORIGIN_INPUT, DESTINATION_INPUT, SEARCH_BUTTON, LOGO] {
            assert!(
                locator.candidates()[0].value().starts_with("[data-test-id="),
                "{}",
                locator.role()
            );
        }
    }

    #[test]
    fn search_button_ends_with_text_match() {
        let last = SEARCH_BUTTON.candidates().last().unwrap();
        assert_eq!(last.strategy(), Strategy::XPath);
        assert!(last.value().contains("'найти'"));
        assert!(last.value().contains("'search'"));
    }
}
