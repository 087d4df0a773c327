//! WebDriver client implementation.

use crate::elements::Element;
use crate::error;
use crate::http::HttpClient;
use crate::session::{self, Command};
use crate::wd::{Capabilities, Selector};
use serde_json::Value as Json;
use url::Url;

/// A WebDriver client tied to a single browser
/// [session](https://www.w3.org/TR/webdriver1/#sessions).
///
/// Use [`ClientBuilder`](crate::ClientBuilder) to create a new session.
///
/// Callers should explicitly call [`Client::close`] and wait for it before exiting. If a
/// `Client` is dropped while its session is still open, a session close request is spawned on
/// the current tokio runtime, and any error from it is dropped. Without a runtime the browser
/// is left running.
pub struct Client {
    pub(crate) http: HttpClient,
    pub(crate) wdb: Url,
    pub(crate) session: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("webdriver", &self.wdb.as_str())
            .field("session", &self.session)
            .finish()
    }
}

impl Client {
    /// Connect to the WebDriver host at `webdriver` and start a session with the given
    /// capabilities.
    ///
    /// Prefer using [`ClientBuilder`](crate::ClientBuilder) over calling this method directly.
    pub async fn with_capabilities(
        webdriver: &str,
        cap: &Capabilities,
    ) -> Result<Self, error::NewSessionError> {
        Self::connect(webdriver, cap).await
    }

    /// Get the unique session ID assigned by the WebDriver server to this client.
    ///
    /// `None` once the session has been closed.
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Terminate the WebDriver session.
    ///
    /// See [8.2 Delete Session](https://www.w3.org/TR/webdriver1/#delete-session).
    pub async fn close(mut self) -> Result<(), error::CmdError> {
        // taken first so that a cancelled close doesn't also fire on drop
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        session::delete_session(&self.http, &self.wdb, &session).await
    }

    /// Resize the current window.
    ///
    /// See [10.7.2 Set Window Rect](https://www.w3.org/TR/webdriver1/#dfn-set-window-rect).
    pub async fn set_window_size(&self, width: u32, height: u32) -> Result<(), error::CmdError> {
        if width == 0 || height == 0 {
            return Err(error::CmdError::InvalidArgument(
                "size".into(),
                format!("Expected a non-empty window but got {}x{}", width, height),
            ));
        }
        self.issue(Command::SetWindowRect { width, height }).await?;
        Ok(())
    }
}

/// [Navigation](https://www.w3.org/TR/webdriver1/#navigation)
impl Client {
    /// Navigate directly to the given URL.
    ///
    /// See [9.1 Navigate To](https://www.w3.org/TR/webdriver1/#dfn-navigate-to).
    pub async fn goto(&self, url: &str) -> Result<(), error::CmdError> {
        let url = Url::parse(url)?;
        self.issue(Command::Get(url.as_str())).await?;
        Ok(())
    }

    /// Retrieve the currently active URL for this session.
    ///
    /// See [9.2 Get Current URL](https://www.w3.org/TR/webdriver1/#dfn-get-current-url).
    pub async fn current_url(&self) -> Result<Url, error::CmdError> {
        let url = self.issue(Command::GetCurrentUrl).await?;
        if let Some(url) = url.as_str() {
            let url = if url.is_empty() { "about:blank" } else { url };
            Ok(url.parse()?)
        } else {
            Err(error::CmdError::NotW3C(url))
        }
    }

    /// Get the current page title.
    ///
    /// See [9.6 Get Title](https://www.w3.org/TR/webdriver1/#dfn-get-title).
    pub async fn title(&self) -> Result<String, error::CmdError> {
        let title = self.issue(Command::GetTitle).await?;
        if let Json::String(s) = title {
            Ok(s)
        } else {
            Err(error::CmdError::NotW3C(title))
        }
    }
}

/// [Element Retrieval](https://www.w3.org/TR/webdriver1/#element-retrieval)
impl Client {
    /// Find an element on the page that matches the given [`Selector`].
    ///
    /// This is a single lookup with no waiting. Use [`Resolver`](crate::resolver::Resolver)
    /// for bounded, multi-candidate lookups.
    ///
    /// See [12.2 Find Element](https://www.w3.org/TR/webdriver1/#find-element).
    pub async fn find(&self, search: Selector) -> Result<Element, error::CmdError> {
        let res = self
            .issue(Command::FindElement(search.into_parameters()))
            .await?;
        Element::from_lookup(res)
    }

    /// Find all descendants of `parent` that match the given [`Selector`].
    ///
    /// See [12.5 Find Elements From
    /// Element](https://www.w3.org/TR/webdriver1/#find-elements-from-element).
    pub async fn find_all_in(
        &self,
        parent: &Element,
        search: Selector,
    ) -> Result<Vec<Element>, error::CmdError> {
        let res = self
            .issue(Command::FindElementElements(
                parent.id(),
                search.into_parameters(),
            ))
            .await?;
        match res {
            Json::Array(a) => a.into_iter().map(Element::from_lookup).collect(),
            res => Err(error::CmdError::NotW3C(res)),
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%session, "client dropped outside a runtime; session left open");
            return;
        };

        let (http, wdb) = (self.http.clone(), self.wdb.clone());
        rt.spawn(async move {
            if let Err(e) = session::delete_session(&http, &wdb, &session).await {
                tracing::debug!(%session, error = %e, "could not close dropped session");
            }
        });
    }
}
