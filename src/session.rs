//! The WebDriver wire: which endpoint each command hits, what it sends, and how replies are
//! read back.

use crate::client::Client;
use crate::error::{self, CmdError, NewSessionError};
use crate::http::{self, HttpClient, Reply};
use crate::wd::Capabilities;
use base64::Engine as _;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Method;
use serde_json::{json, Value as Json};
use url::Url;
use webdriver::command::LocatorParameters;
use webdriver::error::ErrorStatus;

/// A command that can be sent to the WebDriver.
///
/// Only the commands the page layer needs are modeled. Element ids are the opaque references
/// handed out by `Find Element`.
#[derive(Debug)]
pub(crate) enum Command<'a> {
    NewSession(&'a Capabilities),
    DeleteSession,
    Get(&'a str),
    GetCurrentUrl,
    GetTitle,
    FindElement(LocatorParameters),
    FindElementElements(&'a str, LocatorParameters),
    IsDisplayed(&'a str),
    IsEnabled(&'a str),
    GetProperty(&'a str, &'a str),
    GetText(&'a str),
    Click(&'a str),
    Clear(&'a str),
    SendKeys(&'a str, &'a str),
    SetWindowRect { width: u32, height: u32 },
}

impl Command<'_> {
    /// The endpoint to send the request to.
    ///
    /// This mapping is essentially that of <https://www.w3.org/TR/webdriver/#list-of-endpoints>.
    fn endpoint(&self, wdb: &Url, session: Option<&str>) -> Result<Url, CmdError> {
        if let Command::NewSession(..) = *self {
            return Ok(wdb.join("session")?);
        }

        let session = session.ok_or(CmdError::Closed)?;
        if let Command::DeleteSession = *self {
            return Ok(wdb.join(&format!("session/{}", session))?);
        }

        let base = wdb.join(&format!("session/{}/", session))?;
        let url = match *self {
            Command::NewSession(..) | Command::DeleteSession => unreachable!(),
            Command::Get(..) | Command::GetCurrentUrl => base.join("url"),
            Command::GetTitle => base.join("title"),
            Command::FindElement(..) => base.join("element"),
            Command::FindElementElements(id, _) => base.join(&format!("element/{}/elements", id)),
            Command::IsDisplayed(id) => base.join(&format!("element/{}/displayed", id)),
            Command::IsEnabled(id) => base.join(&format!("element/{}/enabled", id)),
            Command::GetProperty(id, prop) => {
                base.join(&format!("element/{}/property/{}", id, prop))
            }
            Command::GetText(id) => base.join(&format!("element/{}/text", id)),
            Command::Click(id) => base.join(&format!("element/{}/click", id)),
            Command::Clear(id) => base.join(&format!("element/{}/clear", id)),
            Command::SendKeys(id, _) => base.join(&format!("element/{}/value", id)),
            Command::SetWindowRect { .. } => base.join("window/rect"),
        };
        Ok(url?)
    }

    /// The HTTP request method to use, and the request body for the request.
    fn method_and_body(&self) -> Result<(Method, Option<String>), CmdError> {
        let (method, body) = match *self {
            Command::NewSession(caps) => (
                Method::POST,
                Some(json!({
                    "capabilities": {
                        "alwaysMatch": caps,
                        "firstMatch": [{}],
                    }
                })),
            ),
            Command::DeleteSession => (Method::DELETE, None),
            Command::Get(url) => (Method::POST, Some(json!({ "url": url }))),
            Command::FindElement(ref loc) | Command::FindElementElements(_, ref loc) => {
                (Method::POST, Some(serde_json::to_value(loc)?))
            }
            Command::SendKeys(_, text) => (Method::POST, Some(json!({ "text": text }))),
            Command::Click(..) | Command::Clear(..) => (Method::POST, Some(json!({}))),
            Command::SetWindowRect { width, height } => (
                Method::POST,
                Some(json!({ "width": width, "height": height })),
            ),
            Command::GetCurrentUrl
            | Command::GetTitle
            | Command::IsDisplayed(..)
            | Command::IsEnabled(..)
            | Command::GetProperty(..)
            | Command::GetText(..) => (Method::GET, None),
        };
        Ok((method, body.map(|b| b.to_string())))
    }
}

/// Issue `cmd` against `session` on the WebDriver server at `wdb`.
///
/// Takes no `Client`, so it can run after the client that owned the session is gone.
pub(crate) async fn issue(
    transport: &HttpClient,
    wdb: &Url,
    session: Option<&str>,
    cmd: Command<'_>,
) -> Result<Json, CmdError> {
    let url = cmd.endpoint(wdb, session)?;
    let (method, body) = cmd.method_and_body()?;
    tracing::trace!(%method, path = url.path(), "webdriver command");

    let req = build_request(method, &url, body)?;
    let reply = http::send(transport, req).await?;
    parse_reply(reply)
}

/// End `session`.
pub(crate) async fn delete_session(
    transport: &HttpClient,
    wdb: &Url,
    session: &str,
) -> Result<(), CmdError> {
    issue(transport, wdb, Some(session), Command::DeleteSession).await?;
    tracing::debug!(%session, "webdriver session closed");
    Ok(())
}

impl Client {
    /// Issue a WebDriver command, and then read and parse the response.
    pub(crate) async fn issue(&self, cmd: Command<'_>) -> Result<Json, CmdError> {
        issue(&self.http, &self.wdb, self.session.as_deref(), cmd).await
    }

    /// Create a new session on the WebDriver server at `webdriver`.
    ///
    /// <https://www.w3.org/TR/webdriver/#dfn-new-session>
    pub(crate) async fn connect(
        webdriver: &str,
        cap: &Capabilities,
    ) -> Result<Client, NewSessionError> {
        // Where is the WebDriver server?
        let mut wdb = webdriver.parse::<Url>()?;
        // joins below treat the last path segment as a directory
        if !wdb.path().ends_with('/') {
            let path = format!("{}/", wdb.path());
            wdb.set_path(&path);
        }

        let mut client = Client {
            http: http::client()?,
            wdb,
            session: None,
        };

        //  - we want the browser to wait for the page to load
        let mut cap = cap.clone();
        cap.insert("pageLoadStrategy".to_string(), Json::from("normal"));
        // make chrome comply with w3c
        if let Some(Json::Object(opts)) = cap.get_mut("goog:chromeOptions") {
            opts.insert("w3c".to_string(), Json::from(true));
        }

        let rsp = client.issue(Command::NewSession(&cap)).await;
        let session_id = map_handshake_response(rsp)?;
        tracing::debug!(session = %session_id, webdriver = %client.wdb, "webdriver session started");
        client.session = Some(session_id);
        Ok(client)
    }
}

fn build_request(
    method: Method,
    url: &Url,
    body: Option<String>,
) -> Result<hyper::Request<Full<Bytes>>, CmdError> {
    let mut req = hyper::Request::builder().method(method).uri(url.as_str());
    // because https://github.com/hyperium/hyper/pull/727
    if !url.username().is_empty() || url.password().is_some() {
        req = req.header(
            hyper::header::AUTHORIZATION,
            format!(
                "Basic {}",
                base64::engine::general_purpose::STANDARD.encode(format!(
                    "{}:{}",
                    url.username(),
                    url.password().unwrap_or("")
                ))
            ),
        );
    }

    let req = if let Some(body) = body {
        req.header(hyper::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .header(hyper::header::CONTENT_LENGTH, body.len())
            .body(Full::new(Bytes::from(body)))
    } else {
        req.body(Full::new(Bytes::new()))
    };
    req.map_err(|e| CmdError::Failed(e.into()))
}

/// Read a reply per <https://www.w3.org/TR/webdriver/#dfn-send-a-response>.
///
/// Even errors are wrapped in `"value"`.
fn parse_reply(reply: Reply) -> Result<Json, CmdError> {
    if !reply.is_json() {
        // WebDriver host sent us something weird...
        return Err(CmdError::NotJson(reply.text()));
    }

    let body = match serde_json::from_slice(&reply.body)? {
        Json::Object(mut v) => v
            .remove("value")
            .ok_or_else(|| CmdError::NotW3C(Json::Object(v)))?,
        v => return Err(CmdError::NotW3C(v)),
    };

    if reply.status.is_success() {
        return Ok(body);
    }

    // https://www.w3.org/TR/webdriver/#handling-errors
    let body = match body {
        Json::Object(o) => o,
        j => return Err(CmdError::NotW3C(j)),
    };
    let status = body.get("error").and_then(Json::as_str).map(error_status);
    let message = body
        .get("message")
        .and_then(Json::as_str)
        .map(str::to_string);
    match (status, message) {
        (Some(status), Some(message)) => Err(CmdError::from_webdriver_error(
            error::WebDriver::new(status, message),
        )),
        _ => Err(CmdError::NotW3C(Json::Object(body))),
    }
}

/// Map an [error code](https://www.w3.org/TR/webdriver/#dfn-error-code) onto its status.
fn error_status(code: &str) -> ErrorStatus {
    match code {
        "element click intercepted" => ErrorStatus::ElementClickIntercepted,
        "element not interactable" => ErrorStatus::ElementNotInteractable,
        "invalid argument" => ErrorStatus::InvalidArgument,
        "invalid element state" => ErrorStatus::InvalidElementState,
        "invalid selector" => ErrorStatus::InvalidSelector,
        "invalid session id" => ErrorStatus::InvalidSessionId,
        "javascript error" => ErrorStatus::JavascriptError,
        "no such alert" => ErrorStatus::NoSuchAlert,
        "no such element" => ErrorStatus::NoSuchElement,
        "no such frame" => ErrorStatus::NoSuchFrame,
        "no such window" => ErrorStatus::NoSuchWindow,
        "script timeout" => ErrorStatus::ScriptTimeout,
        "session not created" => ErrorStatus::SessionNotCreated,
        "stale element reference" => ErrorStatus::StaleElementReference,
        "timeout" => ErrorStatus::Timeout,
        "unexpected alert open" => ErrorStatus::UnexpectedAlertOpen,
        "unknown command" => ErrorStatus::UnknownCommand,
        "unknown method" => ErrorStatus::UnknownMethod,
        "unsupported operation" => ErrorStatus::UnsupportedOperation,
        _ => ErrorStatus::UnknownError,
    }
}

fn map_handshake_response(response: Result<Json, CmdError>) -> Result<String, NewSessionError> {
    match response {
        Ok(Json::Object(mut v)) => match v.remove("sessionId") {
            Some(Json::String(session_id)) => Ok(session_id),
            Some(other) => {
                // NOTE: re-insert so the caller sees what was wrong
                v.insert("sessionId".to_string(), other);
                Err(NewSessionError::NotW3C(Json::Object(v)))
            }
            None => Err(NewSessionError::NotW3C(Json::Object(v))),
        },
        Ok(v) | Err(CmdError::NotW3C(v)) => Err(NewSessionError::NotW3C(v)),
        Err(CmdError::Failed(e)) => Err(NewSessionError::Failed(e)),
        Err(CmdError::NotJson(v)) => Err(NewSessionError::NotW3C(Json::String(v))),
        Err(CmdError::Standard(e)) if matches!(e.error, ErrorStatus::SessionNotCreated) => {
            Err(NewSessionError::SessionNotCreated(e))
        }
        Err(e) => Err(NewSessionError::NotW3C(Json::String(e.to_string()))),
    }
}
