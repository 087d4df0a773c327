//! The search page, one method per user action.

use crate::browser::Browser;
use crate::config::Config;
use crate::error::{CmdError, NewSessionError, PageError};
use crate::locators;
use crate::resolver::Resolver;
use crate::wait::Wait;
use crate::wd::Locator;
use crate::{Client, ClientBuilder};

/// What the URL of a results page contains.
pub const RESULTS_MARKER: &str = "/search";

/// The flight search page.
///
/// Each operation looks its elements up afresh through a [`Resolver`], so nothing goes stale
/// between calls. Every wait is bounded by [`Config::timeout`].
///
/// ```no_run
/// # async fn run() -> Result<(), fareprobe::Error> {
/// use fareprobe::{Config, SearchPage};
///
/// let config = Config::from_env()?;
/// let page = SearchPage::connect(&config).await?;
/// page.open().await?;
/// page.fill_origin("Москва").await?;
/// page.fill_destination("Санкт-Петербург").await?;
/// page.submit_search().await?;
/// page.wait_for_results().await?;
/// page.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SearchPage<B: Browser> {
    browser: B,
    base_url: String,
    resolver: Resolver,
    wait: Wait,
}

impl SearchPage<Client> {
    /// Start a browser session as described by `config` and wrap it.
    pub async fn connect(config: &Config) -> Result<Self, NewSessionError> {
        let client = ClientBuilder::new()
            .capabilities(config.browser.capabilities())
            .connect(config.webdriver_url())
            .await?;

        let (width, height) = config.browser.window;
        if let Err(e) = client.set_window_size(width, height).await {
            tracing::warn!(error = %e, "could not resize window");
        }
        Ok(Self::new(client, config))
    }
}

impl<B: Browser> SearchPage<B> {
    /// Wrap an existing browser session.
    pub fn new(browser: B, config: &Config) -> Self {
        Self {
            browser,
            base_url: config.base_url.clone(),
            resolver: Resolver::new(config.timeout),
            wait: Wait::new(config.timeout),
        }
    }

    /// The underlying browser, for checks the page does not cover.
    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// The resolver used for every lookup.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Load the search page and wait until its body is there.
    #[tracing::instrument(skip(self), fields(url = %self.base_url))]
    pub async fn open(&self) -> Result<(), PageError> {
        self.browser
            .navigate(&self.base_url)
            .await
            .map_err(|e| PageError::Navigation {
                url: self.base_url.clone(),
                source: Some(e),
            })?;

        if self
            .resolver
            .resolve(&self.browser, &locators::PAGE_READY)
            .await
            .is_found()
        {
            Ok(())
        } else {
            Err(PageError::Navigation {
                url: self.base_url.clone(),
                source: None,
            })
        }
    }

    /// The document title, or an empty string if the browser could not say.
    #[tracing::instrument(skip(self))]
    pub async fn title(&self) -> String {
        match self.browser.title().await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(error = %e, "could not read title");
                String::new()
            }
        }
    }

    /// The current URL, or an empty string if the browser could not say.
    #[tracing::instrument(skip(self))]
    pub async fn current_url(&self) -> String {
        match self.browser.current_url().await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "could not read url");
                String::new()
            }
        }
    }

    /// The origin field.
    #[tracing::instrument(skip(self))]
    pub async fn origin_field(&self) -> Result<B::Element, PageError> {
        self.element(&locators::ORIGIN_INPUT).await
    }

    /// The destination field.
    #[tracing::instrument(skip(self))]
    pub async fn destination_field(&self) -> Result<B::Element, PageError> {
        self.element(&locators::DESTINATION_INPUT).await
    }

    /// Replace the origin field's contents with `city`.
    #[tracing::instrument(skip(self))]
    pub async fn fill_origin(&self, city: &str) -> Result<(), PageError> {
        self.fill(&locators::ORIGIN_INPUT, city).await
    }

    /// Replace the destination field's contents with `city`.
    #[tracing::instrument(skip(self))]
    pub async fn fill_destination(&self, city: &str) -> Result<(), PageError> {
        self.fill(&locators::DESTINATION_INPUT, city).await
    }

    /// What the origin field holds right now.
    #[tracing::instrument(skip(self))]
    pub async fn origin_value(&self) -> Result<String, PageError> {
        self.value(&locators::ORIGIN_INPUT).await
    }

    /// What the destination field holds right now.
    #[tracing::instrument(skip(self))]
    pub async fn destination_value(&self) -> Result<String, PageError> {
        self.value(&locators::DESTINATION_INPUT).await
    }

    /// Press the search button.
    ///
    /// A disabled button is reported as not interactable without clicking it.
    #[tracing::instrument(skip(self))]
    pub async fn submit_search(&self) -> Result<(), PageError> {
        let locator = &locators::SEARCH_BUTTON;
        let button = self.element(locator).await?;
        if !self.browser.is_enabled(&button).await? {
            return Err(PageError::ElementNotInteractable {
                element: locator.role(),
                source: None,
            });
        }
        self.browser
            .click(&button)
            .await
            .map_err(|e| refused(locator, e))
    }

    /// Wait until the browser is on a results page.
    #[tracing::instrument(skip(self))]
    pub async fn wait_for_results(&self) -> Result<(), PageError> {
        let browser = &self.browser;
        let url = self
            .wait
            .until(|| async move {
                match browser.current_url().await {
                    Ok(url) if url.contains(RESULTS_MARKER) => Some(url),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::trace!(error = %e, "url not readable yet");
                        None
                    }
                }
            })
            .await
            .map_err(|waited| PageError::Timeout {
                condition: format!("url containing {:?}", RESULTS_MARKER),
                waited,
            })?;
        tracing::debug!(%url, "on results page");
        Ok(())
    }

    /// The page footer.
    #[tracing::instrument(skip(self))]
    pub async fn footer(&self) -> Result<B::Element, PageError> {
        self.element(&locators::FOOTER).await
    }

    /// Every link in the footer.
    #[tracing::instrument(skip(self))]
    pub async fn footer_links(&self) -> Result<Vec<B::Element>, PageError> {
        let footer = self.footer().await?;
        let links = self
            .browser
            .find_all_in(&footer, &locators::FOOTER_LINK)
            .await?;
        tracing::debug!(links = links.len(), "footer links");
        Ok(links)
    }

    /// The site logo, if the page shows one.
    #[tracing::instrument(skip(self))]
    pub async fn logo(&self) -> Option<B::Element> {
        let logo = self
            .resolver
            .resolve(&self.browser, &locators::LOGO)
            .await
            .found();
        if logo.is_none() {
            tracing::warn!("no logo on the page");
        }
        logo
    }

    /// End the browser session.
    #[tracing::instrument(skip(self))]
    pub async fn close(self) -> Result<(), CmdError> {
        self.browser.close().await
    }

    async fn element(&self, locator: &Locator) -> Result<B::Element, PageError> {
        self.resolver
            .resolve(&self.browser, locator)
            .await
            .or_not_found(locator)
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), PageError> {
        let field = self.element(locator).await?;
        self.browser
            .clear(&field)
            .await
            .map_err(|e| refused(locator, e))?;
        self.browser
            .send_keys(&field, text)
            .await
            .map_err(|e| refused(locator, e))
    }

    async fn value(&self, locator: &Locator) -> Result<String, PageError> {
        let field = self.element(locator).await?;
        Ok(self
            .browser
            .property(&field, "value")
            .await?
            .unwrap_or_default())
    }
}

fn refused(locator: &Locator, e: CmdError) -> PageError {
    match e {
        e @ CmdError::NotInteractable(..) => PageError::ElementNotInteractable {
            element: locator.role(),
            source: Some(e),
        },
        e => PageError::Command(e),
    }
}
