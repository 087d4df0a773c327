//! Finding a logical element through its ordered candidate selectors.

use crate::browser::Browser;
use crate::error::{CmdError, PageError};
use crate::wait::{Wait, DEFAULT_PERIOD, DEFAULT_TIMEOUT};
use crate::wd::{Locator, Selector};
use std::time::Duration;

/// The outcome of resolving a [`Locator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<E> {
    /// A candidate matched a displayed element.
    Found(E),
    /// No candidate matched in time.
    NotFound,
}

impl<E> Resolution<E> {
    /// The element, if one was found.
    pub fn found(self) -> Option<E> {
        match self {
            Resolution::Found(e) => Some(e),
            Resolution::NotFound => None,
        }
    }

    /// True if a candidate matched.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(..))
    }

    /// Turn [`Resolution::NotFound`] into [`PageError::ElementNotFound`] for `locator`.
    pub fn or_not_found(self, locator: &Locator) -> Result<E, PageError> {
        self.found().ok_or(PageError::ElementNotFound {
            element: locator.role(),
            candidates: locator.len(),
        })
    }
}

/// Tries a locator's candidates in order until one is present and displayed.
///
/// The total wait is split evenly between the candidates, so a locator with no match gives up
/// after roughly `timeout` no matter how many candidates it has. Within its share a candidate
/// is polled until it shows up. A lookup that fails for any reason other than a miss (a
/// malformed selector, say) skips straight to the next candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolver {
    timeout: Duration,
    period: Duration,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Resolver {
    /// Give each locator at most `timeout` in total.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            period: DEFAULT_PERIOD,
        }
    }

    /// Poll every `period` instead of the default.
    pub fn every(self, period: Duration) -> Self {
        Self { period, ..self }
    }

    /// The total wait per locator.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `locator` against the current page of `browser`.
    #[tracing::instrument(level = "debug", skip_all, fields(element = locator.role()))]
    pub async fn resolve<B: Browser>(&self, browser: &B, locator: &Locator) -> Resolution<B::Element> {
        let n = u32::try_from(locator.len()).unwrap_or(u32::MAX);
        let wait = Wait::new(self.timeout / n).every(self.period);

        for selector in locator.candidates() {
            match attempt(browser, selector, wait).await {
                Ok(element) => {
                    tracing::debug!(candidate = %selector, "resolved");
                    return Resolution::Found(element);
                }
                Err(Skipped::TimedOut(waited)) => {
                    tracing::trace!(candidate = %selector, ?waited, "no match");
                }
                Err(Skipped::Failed(e)) => {
                    tracing::debug!(candidate = %selector, error = %e, "candidate failed");
                }
            }
        }

        tracing::debug!(candidates = locator.len(), "not found");
        Resolution::NotFound
    }
}

enum Skipped {
    TimedOut(Duration),
    Failed(CmdError),
}

async fn attempt<B: Browser>(
    browser: &B,
    selector: &Selector,
    wait: Wait,
) -> Result<B::Element, Skipped> {
    let outcome = wait
        .until(|| async move {
            let element = match browser.find(selector).await {
                Ok(element) => element,
                Err(e) if e.is_miss() => return None,
                Err(e) => return Some(Err(e)),
            };
            match browser.is_displayed(&element).await {
                Ok(true) => Some(Ok(element)),
                Ok(false) => None,
                Err(e) if e.is_miss() => None,
                Err(e) => Some(Err(e)),
            }
        })
        .await;

    match outcome {
        Ok(Ok(element)) => Ok(element),
        Ok(Err(e)) => Err(Skipped::Failed(e)),
        Err(waited) => Err(Skipped::TimedOut(waited)),
    }
}
