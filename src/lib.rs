//! Smoke tests for a flight search site and its price API.
//!
//! The site side drives a conforming (potentially headless) browser over the [WebDriver
//! protocol]. Page elements are described as [`Locator`](wd::Locator)s: ordered lists of
//! candidate selectors, most specific first. A [`Resolver`](resolver::Resolver) tries them in
//! order with a bounded wait, and [`SearchPage`] exposes one method per thing a user does on
//! the page.
//!
//! The API side is [`PriceApi`], a small client for the `prices_for_dates` route.
//!
//! The checks themselves live in [`scenarios`], and the `fareprobe` binary runs them.
//!
//! # Examples
//!
//! These examples assume that you have a [WebDriver compatible] process running on port 9515.
//! A quick way to get one is to run [`chromedriver`] at the command line.
//!
//! ```no_run
//! use fareprobe::{Config, SearchPage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fareprobe::Error> {
//!     let config = Config::from_env()?;
//!     let page = SearchPage::connect(&config).await?;
//!
//!     page.open().await?;
//!     page.fill_origin("Москва").await?;
//!     page.fill_destination("Санкт-Петербург").await?;
//!     page.submit_search().await?;
//!     page.wait_for_results().await?;
//!     println!("results at {}", page.current_url().await);
//!
//!     page.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Querying prices needs no browser:
//!
//! ```no_run
//! use fareprobe::{Config, PriceApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fareprobe::Error> {
//!     let api = PriceApi::new(&Config::from_env()?)?;
//!     let prices = api.search_one_way("MOW", "LED", "2025-09-01").await?;
//!     println!("{} offers in {}", prices.data.len(), prices.currency);
//!     Ok(())
//! }
//! ```
//!
//! [WebDriver protocol]: https://www.w3.org/TR/webdriver/
//! [WebDriver compatible]: https://github.com/Fyrd/caniuse/issues/2757#issuecomment-304529217
//! [`chromedriver`]: https://chromedriver.chromium.org/
#![deny(missing_docs)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

/// Error types.
pub mod error;

pub mod api;
pub mod blocking;
pub mod browser;
pub mod capabilities;
pub mod config;
pub mod locators;
pub mod page;
pub mod resolver;
pub mod scenarios;
pub mod wait;
pub mod wd;

mod client;
mod elements;
mod http;
mod session;

#[cfg(test)]
mod mock;

pub use crate::api::PriceApi;
pub use crate::browser::Browser;
pub use crate::capabilities::{BrowserKind, BrowserOptions};
pub use crate::client::Client;
pub use crate::config::{Config, Fixtures};
pub use crate::elements::Element;
pub use crate::error::Error;
pub use crate::page::SearchPage;

use crate::wd::Capabilities;

/// A builder for WebDriver [`Client`]s.
///
/// ```no_run
/// # async fn run() -> Result<(), fareprobe::error::NewSessionError> {
/// use fareprobe::{BrowserOptions, ClientBuilder};
///
/// let client = ClientBuilder::new()
///     .capabilities(BrowserOptions::default().capabilities())
///     .connect("http://localhost:9515")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    capabilities: Capabilities,
}

impl ClientBuilder {
    /// A builder that asks for no particular capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass the given [WebDriver capabilities][1] to the browser.
    ///
    /// The WebDriver specification has a list of [standard
    /// capabilities](https://www.w3.org/TR/webdriver1/#capabilities), which are given below. In
    /// addition, most browser vendors support a number of browser-specific capabilities stored
    /// in an object under a prefixed key like
    /// [`moz:firefoxOptions`](https://developer.mozilla.org/en-US/docs/Web/WebDriver/Capabilities/firefoxOptions)
    /// or
    /// [`goog:chromeOptions`](https://sites.google.com/a/chromium.org/chromedriver/capabilities).
    ///
    /// [1]: https://www.w3.org/TR/webdriver/#dfn-capability
    pub fn capabilities(&mut self, cap: Capabilities) -> &mut Self {
        self.capabilities = cap;
        self
    }

    /// Connect to the session at the given URL.
    pub async fn connect(&self, webdriver: &str) -> Result<Client, error::NewSessionError> {
        Client::with_capabilities(webdriver, &self.capabilities).await
    }
}
