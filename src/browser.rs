//! The boundary between the page layer and whatever drives the browser.

use crate::elements::Element;
use crate::error::CmdError;
use crate::wd::Selector;
use crate::Client;
use std::fmt::Debug;

/// A browser session, as seen by the [`Resolver`](crate::resolver::Resolver) and
/// [`SearchPage`](crate::page::SearchPage).
///
/// Every method is one round-trip to the browser. Implementations report a selector that
/// matches nothing as a [miss](CmdError::is_miss), and an element that refuses input as
/// [`CmdError::NotInteractable`].
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// A handle to one element on the current page.
    type Element: Clone + Debug;

    /// Load `url` and wait for the browser's own load event.
    async fn navigate(&self, url: &str) -> Result<(), CmdError>;

    /// The current document title.
    async fn title(&self) -> Result<String, CmdError>;

    /// The current URL.
    async fn current_url(&self) -> Result<String, CmdError>;

    /// Find the first element matching `selector`.
    async fn find(&self, selector: &Selector) -> Result<Self::Element, CmdError>;

    /// Find every descendant of `parent` matching `selector`.
    async fn find_all_in(
        &self,
        parent: &Self::Element,
        selector: &Selector,
    ) -> Result<Vec<Self::Element>, CmdError>;

    /// Whether `element` is visible.
    async fn is_displayed(&self, element: &Self::Element) -> Result<bool, CmdError>;

    /// Whether `element` accepts input.
    async fn is_enabled(&self, element: &Self::Element) -> Result<bool, CmdError>;

    /// Empty a text field.
    async fn clear(&self, element: &Self::Element) -> Result<(), CmdError>;

    /// Type `text` into `element`.
    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), CmdError>;

    /// Click `element`.
    async fn click(&self, element: &Self::Element) -> Result<(), CmdError>;

    /// Visible text of `element`.
    async fn text(&self, element: &Self::Element) -> Result<String, CmdError>;

    /// A DOM property of `element`, e.g. `value`.
    async fn property(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, CmdError>;

    /// End the session.
    async fn close(self) -> Result<(), CmdError>;
}

impl Browser for Client {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<(), CmdError> {
        self.goto(url).await
    }

    async fn title(&self) -> Result<String, CmdError> {
        Client::title(self).await
    }

    async fn current_url(&self) -> Result<String, CmdError> {
        Ok(Client::current_url(self).await?.into())
    }

    async fn find(&self, selector: &Selector) -> Result<Element, CmdError> {
        Client::find(self, *selector).await
    }

    async fn find_all_in(
        &self,
        parent: &Element,
        selector: &Selector,
    ) -> Result<Vec<Element>, CmdError> {
        Client::find_all_in(self, parent, *selector).await
    }

    async fn is_displayed(&self, element: &Element) -> Result<bool, CmdError> {
        Client::is_displayed(self, element).await
    }

    async fn is_enabled(&self, element: &Element) -> Result<bool, CmdError> {
        Client::is_enabled(self, element).await
    }

    async fn clear(&self, element: &Element) -> Result<(), CmdError> {
        Client::clear(self, element).await
    }

    async fn send_keys(&self, element: &Element, text: &str) -> Result<(), CmdError> {
        Client::send_keys(self, element, text).await
    }

    async fn click(&self, element: &Element) -> Result<(), CmdError> {
        Client::click(self, element).await
    }

    async fn text(&self, element: &Element) -> Result<String, CmdError> {
        Client::text(self, element).await
    }

    async fn property(&self, element: &Element, name: &str) -> Result<Option<String>, CmdError> {
        Client::property(self, element, name).await
    }

    async fn close(self) -> Result<(), CmdError> {
        Client::close(self).await
    }
}
