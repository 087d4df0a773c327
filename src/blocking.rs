//! A blocking wrapper around [`page::SearchPage`](crate::page::SearchPage).
//!
//! For callers without an async runtime of their own. Each wrapper owns a current-thread tokio
//! runtime and drives every call to completion on it.

use crate::config::Config;
use crate::error::{CmdError, Error, PageError};
use crate::page;
use crate::Client;
use tokio::runtime::{Builder, Runtime};

/// The search page, with blocking methods.
///
/// The browser session is closed when this is dropped, including while unwinding from a panic.
#[derive(Debug)]
pub struct SearchPage {
    rt: Runtime,
    page: Option<page::SearchPage<Client>>,
}

impl SearchPage {
    /// Start a browser session as described by `config`.
    pub fn connect(config: &Config) -> Result<Self, Error> {
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Session(e.into()))?;
        let page = rt.block_on(page::SearchPage::connect(config))?;
        Ok(Self {
            rt,
            page: Some(page),
        })
    }

    fn with<'a, F, R>(
        &'a self,
        f: impl FnOnce(&'a page::SearchPage<Client>) -> F,
    ) -> Result<R, Error>
    where
        F: std::future::Future<Output = Result<R, PageError>>,
    {
        let page = self.page.as_ref().ok_or(CmdError::Closed)?;
        Ok(self.rt.block_on(f(page))?)
    }

    /// See [`page::SearchPage::open`].
    pub fn open(&self) -> Result<(), Error> {
        self.with(|p| p.open())
    }

    /// See [`page::SearchPage::title`].
    pub fn title(&self) -> String {
        self.page
            .as_ref()
            .map(|p| self.rt.block_on(p.title()))
            .unwrap_or_default()
    }

    /// See [`page::SearchPage::current_url`].
    pub fn current_url(&self) -> String {
        self.page
            .as_ref()
            .map(|p| self.rt.block_on(p.current_url()))
            .unwrap_or_default()
    }

    /// See [`page::SearchPage::fill_origin`].
    pub fn fill_origin(&self, city: &str) -> Result<(), Error> {
        self.with(|p| p.fill_origin(city))
    }

    /// See [`page::SearchPage::fill_destination`].
    pub fn fill_destination(&self, city: &str) -> Result<(), Error> {
        self.with(|p| p.fill_destination(city))
    }

    /// See [`page::SearchPage::origin_value`].
    pub fn origin_value(&self) -> Result<String, Error> {
        self.with(|p| p.origin_value())
    }

    /// See [`page::SearchPage::destination_value`].
    pub fn destination_value(&self) -> Result<String, Error> {
        self.with(|p| p.destination_value())
    }

    /// See [`page::SearchPage::submit_search`].
    pub fn submit_search(&self) -> Result<(), Error> {
        self.with(|p| p.submit_search())
    }

    /// See [`page::SearchPage::wait_for_results`].
    pub fn wait_for_results(&self) -> Result<(), Error> {
        self.with(|p| p.wait_for_results())
    }

    /// How many links the footer has.
    pub fn footer_links(&self) -> Result<usize, Error> {
        self.with(|p| async move { Ok(p.footer_links().await?.len()) })
    }

    /// Whether the page shows a logo.
    pub fn has_logo(&self) -> bool {
        self.page
            .as_ref()
            .map(|p| self.rt.block_on(p.logo()).is_some())
            .unwrap_or(false)
    }

    /// Borrow the async page, e.g. to run a [scenario](crate::scenarios) on it.
    pub fn block_on<'a, F, R>(
        &'a self,
        f: impl FnOnce(&'a page::SearchPage<Client>) -> F,
    ) -> Result<R, Error>
    where
        F: std::future::Future<Output = Result<R, Error>>,
    {
        let page = self.page.as_ref().ok_or(CmdError::Closed)?;
        self.rt.block_on(f(page))
    }

    /// End the browser session.
    pub fn close(mut self) -> Result<(), CmdError> {
        match self.page.take() {
            Some(page) => self.rt.block_on(page.close()),
            None => Ok(()),
        }
    }
}

impl Drop for SearchPage {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = self.rt.block_on(page.close()) {
                tracing::warn!(error = %e, "could not close browser session");
            }
        }
    }
}
