//! WebDriver types and declarations.

use std::fmt;
use webdriver::command::LocatorParameters;
use webdriver::common::LocatorStrategy;

/// Dynamic set of [WebDriver capabilities][1].
///
/// [1]: https://www.w3.org/TR/webdriver/#dfn-capability
pub type Capabilities = serde_json::Map<String, serde_json::Value>;

/// How a [`Selector`] is matched against the page.
///
/// See [the specification][1] for more details.
///
/// [1]: https://www.w3.org/TR/webdriver1/#locator-strategies
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Strategy {
    /// Match a [CSS selector][1].
    ///
    /// [1]: https://developer.mozilla.org/en-US/docs/Web/CSS/CSS_Selectors
    Css,

    /// Match an element's [`id`][1] exactly.
    ///
    /// [1]: https://developer.mozilla.org/en-US/docs/Web/HTML/Global_attributes/id
    Id,

    /// Match by tag name, e.g. `footer`.
    TagName,

    /// Match a link by its exact text.
    LinkText,

    /// Match an [XPath expression][1].
    ///
    /// Useful when only the visible text identifies an element.
    ///
    /// [1]: https://developer.mozilla.org/en-US/docs/Web/XPath
    XPath,
}

/// One way of finding an element: a strategy and the selector string it interprets.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Selector {
    strategy: Strategy,
    value: &'static str,
}

impl Selector {
    /// A CSS selector.
    pub const fn css(value: &'static str) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// An element id.
    pub const fn id(value: &'static str) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// A tag name.
    pub const fn tag(value: &'static str) -> Self {
        Self::new(Strategy::TagName, value)
    }

    /// An exact link text.
    pub const fn link_text(value: &'static str) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// An XPath expression.
    pub const fn xpath(value: &'static str) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// A selector with an explicit strategy.
    pub const fn new(strategy: Strategy, value: &'static str) -> Self {
        Self { strategy, value }
    }

    /// The strategy of this selector.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The raw selector string.
    pub fn value(&self) -> &'static str {
        self.value
    }

    pub(crate) fn into_parameters(self) -> LocatorParameters {
        match self.strategy {
            Strategy::Css => LocatorParameters {
                using: LocatorStrategy::CSSSelector,
                value: self.value.to_string(),
            },
            Strategy::Id => LocatorParameters {
                using: LocatorStrategy::XPath,
                value: format!("//*[@id=\"{}\"]", self.value),
            },
            Strategy::TagName => LocatorParameters {
                using: LocatorStrategy::TagName,
                value: self.value.to_string(),
            },
            Strategy::LinkText => LocatorParameters {
                using: LocatorStrategy::LinkText,
                value: self.value.to_string(),
            },
            Strategy::XPath => LocatorParameters {
                using: LocatorStrategy::XPath,
                value: self.value.to_string(),
            },
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.strategy {
            Strategy::Css => "css",
            Strategy::Id => "id",
            Strategy::TagName => "tag-name",
            Strategy::LinkText => "link-text",
            Strategy::XPath => "xpath",
        };
        write!(f, "{}={}", tag, self.value)
    }
}

/// The ordered candidate selectors for one logical element.
///
/// Candidates are tried strictly in declaration order, so resolution is reproducible for a
/// given page state. A locator is built once, in `const` context, and never changes.
///
/// ```
/// use fareprobe::wd::{Locator, Selector};
///
/// const SUBMIT: Locator = Locator::new(
///     "submit button",
///     &[Selector::css("[data-test-id='form-submit']"), Selector::css("button[type='submit']")],
/// );
/// assert_eq!(SUBMIT.len(), 2);
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Locator {
    role: &'static str,
    candidates: &'static [Selector],
}

impl Locator {
    /// Create a locator for the element playing `role`.
    ///
    /// # Panics
    ///
    /// If `candidates` is empty. In a `const` this is a compile error.
    pub const fn new(role: &'static str, candidates: &'static [Selector]) -> Self {
        assert!(!candidates.is_empty(), "a locator needs at least one candidate");
        Self { role, candidates }
    }

    /// The logical role, e.g. "origin input".
    pub fn role(&self) -> &'static str {
        self.role
    }

    /// The candidates, in the order they are tried.
    pub fn candidates(&self) -> &'static [Selector] {
        self.candidates
    }

    /// Number of candidates. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}
