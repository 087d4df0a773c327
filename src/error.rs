use http::StatusCode;
use std::borrow::Cow;
use std::io::Error as IOError;
use std::time::Duration;
use thiserror::Error;
use url::ParseError;
use webdriver::error as webdriver;

/// A failure to move bytes over HTTP, shared by the WebDriver and price API clients.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be assembled.
    #[error("could not build request: {0}")]
    Request(#[from] http::Error),
    /// The server could not be reached, or the exchange failed part-way.
    #[error("request failed: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),
    /// The response body could not be read.
    #[error("could not read response body: {0}")]
    Body(#[from] hyper::Error),
}

/// An error occurred while attempting to establish a session for a new `Client`.
#[derive(Debug, Error)]
pub enum NewSessionError {
    /// The given WebDriver URL is invalid.
    #[error("webdriver url is invalid: {0}")]
    BadWebdriverUrl(#[from] ParseError),
    /// The WebDriver server could not be reached.
    #[error("webdriver server did not respond: {0}")]
    Failed(#[from] TransportError),
    /// The HTTP client or its runtime could not be set up.
    #[error("could not set up client: {0}")]
    Setup(#[from] IOError),
    /// The server did not give a WebDriver-conforming response.
    #[error("webdriver server gave non-conformant response: {0}")]
    NotW3C(serde_json::Value),
    /// The WebDriver server refused to create a new session.
    #[error("webdriver did not create session: {0}")]
    SessionNotCreated(WebDriver),
}

/// An error occurred while executing some browser action.
#[derive(Debug, Error)]
pub enum CmdError {
    /// A standard WebDriver error occurred.
    ///
    /// See [the spec] for details about what each of these errors represent. Note that for
    /// convenience `NoSuchElement` and `NotInteractable` have been extracted into their own
    /// top-level variants.
    ///
    /// [the spec]: https://www.w3.org/TR/webdriver/#handling-errors
    #[error("webdriver returned error: {0}")]
    Standard(WebDriver),

    /// No element was found matching the given selector.
    ///
    /// Also used for the ["stale element reference"] error variant.
    ///
    /// ["stale element reference"]: https://www.w3.org/TR/webdriver/#dfn-stale-element-reference
    #[error("no element found matching selector: {0}")]
    NoSuchElement(WebDriver),

    /// The element exists but cannot be clicked or typed into.
    ///
    /// Covers both "element not interactable" and "element click intercepted".
    #[error("element not interactable: {0}")]
    NotInteractable(WebDriver),

    /// A bad URL was encountered during parsing.
    #[error("bad url provided: {0}")]
    BadUrl(#[from] ParseError),

    /// A request to the WebDriver server failed.
    #[error("webdriver could not be reached: {0}")]
    Failed(#[from] TransportError),

    /// The session has already been closed.
    #[error("webdriver session has been closed")]
    Closed,

    /// The WebDriver server responded with a non-standard, non-JSON reply.
    #[error("webdriver returned invalid response: {0}")]
    NotJson(String),

    /// The WebDriver server responded to a command with an invalid JSON response.
    #[error("webdriver returned incoherent response: {0}")]
    Json(#[from] serde_json::Error),

    /// The WebDriver server produced a response that does not conform to the [W3C WebDriver
    /// specification][spec].
    ///
    /// [spec]: https://www.w3.org/TR/webdriver/
    #[error("webdriver returned non-conforming response: {0:?}")]
    NotW3C(serde_json::Value),

    /// A function was invoked with an invalid argument.
    #[error("invalid argument `{0}`: {1}")]
    InvalidArgument(String, String),
}

impl CmdError {
    /// Returns true if this error indicates that a matching element was not found.
    pub fn is_miss(&self) -> bool {
        matches!(self, CmdError::NoSuchElement(..))
    }

    pub(crate) fn from_webdriver_error(e: WebDriver) -> Self {
        match e.error {
            webdriver::ErrorStatus::NoSuchElement
            | webdriver::ErrorStatus::StaleElementReference => CmdError::NoSuchElement(e),
            webdriver::ErrorStatus::ElementNotInteractable
            | webdriver::ErrorStatus::ElementClickIntercepted => CmdError::NotInteractable(e),
            _ => CmdError::Standard(e),
        }
    }
}

/// Error returned by WebDriver.
#[derive(Debug)]
pub struct WebDriver {
    /// Code of this error provided by WebDriver.
    ///
    /// Intentionally made private, so library users cannot match on it.
    pub(crate) error: webdriver::ErrorStatus,

    /// Description of this error provided by WebDriver.
    pub message: Cow<'static, str>,
}

impl std::fmt::Display for WebDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WebDriver {}

impl WebDriver {
    pub(crate) fn new(error: webdriver::ErrorStatus, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }

    /// Returns [code] of this error provided by WebDriver.
    ///
    /// [code]: https://www.w3.org/TR/webdriver/#dfn-error-code
    pub fn error(&self) -> &'static str {
        self.error.error_code()
    }
}

/// A page-level operation failed.
///
/// Every variant names the logical element or condition involved, so a failing scenario
/// reports which step broke.
#[derive(Debug, Error)]
pub enum PageError {
    /// None of a locator's candidate selectors resolved to a displayed element.
    #[error("element not found: {element} (tried {candidates} selectors)")]
    ElementNotFound {
        /// Role of the logical element, e.g. "origin input".
        element: &'static str,
        /// How many candidate selectors were tried.
        candidates: usize,
    },

    /// The element was found but refused the interaction.
    #[error("element not interactable: {element}")]
    ElementNotInteractable {
        /// Role of the logical element.
        element: &'static str,
        /// The driver's refusal, if there was one; `None` when the element reported itself
        /// disabled.
        #[source]
        source: Option<CmdError>,
    },

    /// A wait predicate never became true.
    #[error("timed out after {waited:?} waiting for {condition}")]
    Timeout {
        /// What was being waited for.
        condition: String,
        /// How long was waited.
        waited: Duration,
    },

    /// The page failed to load.
    #[error("navigation to {url} failed")]
    Navigation {
        /// The URL that was requested.
        url: String,
        /// The driver failure, or `None` if the page never became ready.
        #[source]
        source: Option<CmdError>,
    },

    /// Any other driver failure.
    #[error(transparent)]
    Command(#[from] CmdError),
}

/// A price API call failed.
///
/// A reply with `success: false` is a failure, never an empty result.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API base URL could not be joined with the route.
    #[error("price api url is invalid: {0}")]
    BadUrl(#[from] ParseError),

    /// The API could not be reached.
    #[error("could not reach price api: {0}")]
    Transport(#[from] TransportError),

    /// The HTTP client could not be set up.
    #[error("could not set up client: {0}")]
    Setup(#[from] IOError),

    /// No reply arrived in time.
    #[error("price api did not answer within {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-success HTTP status.
    #[error("price api answered {status}: {body}")]
    Status {
        /// HTTP status of the reply.
        status: StatusCode,
        /// Raw reply body.
        body: String,
    },

    /// The reply was not the expected JSON.
    #[error("price api returned an invalid body: {0}")]
    Json(#[from] serde_json::Error),

    /// The API said `success: false`.
    #[error("price api reported failure: {}", message.as_deref().unwrap_or("no message"))]
    Unsuccessful {
        /// The API's own error message, if it sent one.
        message: Option<String>,
    },

    /// A successful reply lacked a required field.
    #[error("price api reply lacks `{0}`")]
    MissingField(&'static str),

    /// The API returned more results than the requested limit.
    #[error("price api returned {returned} results for limit {limit}")]
    LimitExceeded {
        /// The requested limit.
        limit: u32,
        /// How many results came back.
        returned: usize,
    },
}

/// An environment value could not be parsed into configuration.
#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    /// The environment variable.
    pub key: &'static str,
    /// The value found there.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Any failure a scenario can report.
#[derive(Debug, Error)]
pub enum Error {
    /// No browser session could be created.
    #[error(transparent)]
    Session(#[from] NewSessionError),
    /// A raw driver command failed.
    #[error(transparent)]
    Command(#[from] CmdError),
    /// A page operation failed.
    #[error(transparent)]
    Page(#[from] PageError),
    /// A price API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A scenario check did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),
}
