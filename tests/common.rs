#![allow(dead_code)]

use fareprobe::Config;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value as Json};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use webdriver::common::ELEMENT_KEY;

/// Serve `handler` on an ephemeral local port until the test runtime shuts down.
pub async fn serve<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(Request<Incoming>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response<Full<Bytes>>> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("test server address");
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let handler = handler.clone();
            tokio::spawn(async move {
                let svc = service_fn(move |req| {
                    let handler = handler.clone();
                    async move { Ok::<_, Infallible>(handler(req).await) }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });
    addr
}

pub fn json_response(status: StatusCode, body: Json) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("valid response")
}

pub async fn read_json(req: Request<Incoming>) -> Json {
    let body = req
        .into_body()
        .collect()
        .await
        .expect("read request body")
        .to_bytes();
    if body.is_empty() {
        Json::Null
    } else {
        serde_json::from_slice(&body).expect("request body is json")
    }
}

pub const SESSION: &str = "fake-session";

/// One element on the fake WebDriver's page.
#[derive(Clone, Debug)]
pub struct FakeElement {
    pub using: &'static str,
    pub value: &'static str,
    pub displayed: bool,
    pub enabled: bool,
    pub text: &'static str,
    pub parent: Option<usize>,
    pub navigates_to: Option<&'static str>,
    pub typed: String,
}

impl FakeElement {
    fn new(using: &'static str, value: &'static str) -> Self {
        Self {
            using,
            value,
            displayed: true,
            enabled: true,
            text: "",
            parent: None,
            navigates_to: None,
            typed: String::new(),
        }
    }

    pub fn css(value: &'static str) -> Self {
        Self::new("css selector", value)
    }

    pub fn tag(value: &'static str) -> Self {
        Self::new("tag name", value)
    }

    pub fn text(self, text: &'static str) -> Self {
        Self { text, ..self }
    }

    pub fn inside(self, parent: usize) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    pub fn navigates_to(self, url: &'static str) -> Self {
        Self {
            navigates_to: Some(url),
            ..self
        }
    }
}

/// What the fake WebDriver has seen and holds.
#[derive(Debug, Default)]
pub struct DriverState {
    pub url: String,
    pub elements: Vec<FakeElement>,
    pub new_session: Option<Json>,
    pub window: Option<(u64, u64)>,
    pub deleted: Vec<String>,
    pub refuse_sessions: bool,
}

pub type Driver = Arc<Mutex<DriverState>>;

/// Start a fake W3C WebDriver serving a page made of `elements`.
pub async fn fake_webdriver(elements: Vec<FakeElement>) -> (SocketAddr, Driver) {
    let state = Arc::new(Mutex::new(DriverState {
        url: "about:blank".to_string(),
        elements,
        ..Default::default()
    }));
    let driver = state.clone();
    let addr = serve(move |req| webdriver(driver.clone(), req)).await;
    (addr, state)
}

/// A config pointing at the fake WebDriver at `addr`.
pub fn config_for(addr: SocketAddr) -> Config {
    Config {
        webdriver_url: Some(format!("http://{}", addr)),
        timeout: std::time::Duration::from_secs(2),
        ..Default::default()
    }
}

fn ok(value: Json) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, json!({ "value": value }))
}

fn fail(status: StatusCode, error: &str, message: &str) -> Response<Full<Bytes>> {
    json_response(
        status,
        json!({ "value": { "error": error, "message": message, "stacktrace": "" } }),
    )
}

fn element_ref(id: usize) -> Json {
    json!({ ELEMENT_KEY: format!("el-{}", id) })
}

async fn webdriver(state: Driver, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let body = read_json(req).await;
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let mut s = state.lock().expect("driver state");
    let element = |id: &str| -> Option<usize> {
        id.strip_prefix("el-")?.parse().ok()
    };

    match (method, segments.as_slice()) {
        (Method::POST, ["session"]) => {
            if s.refuse_sessions {
                return fail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "session not created",
                    "no browser binary",
                );
            }
            s.new_session = Some(body);
            ok(json!({ "sessionId": SESSION, "capabilities": { "browserName": "chrome" } }))
        }
        (Method::DELETE, ["session", id]) => {
            s.deleted.push(id.to_string());
            ok(Json::Null)
        }
        (_, ["session", id, ..]) if *id != SESSION => {
            fail(StatusCode::NOT_FOUND, "invalid session id", id)
        }
        (Method::POST, [_, _, "url"]) => {
            s.url = body["url"].as_str().unwrap_or_default().to_string();
            ok(Json::Null)
        }
        (Method::GET, [_, _, "url"]) => ok(json!(s.url)),
        (Method::GET, [_, _, "title"]) => ok(json!("Aviasales")),
        (Method::POST, [_, _, "window", "rect"]) => {
            s.window = Some((
                body["width"].as_u64().unwrap_or(0),
                body["height"].as_u64().unwrap_or(0),
            ));
            ok(json!({ "x": 0, "y": 0, "width": body["width"], "height": body["height"] }))
        }
        (Method::POST, [_, _, "element"]) => {
            let (using, value) = (body["using"].as_str(), body["value"].as_str());
            let hit = s.elements.iter().position(|e| {
                e.parent.is_none() && Some(e.using) == using && Some(e.value) == value
            });
            match hit {
                Some(id) => ok(element_ref(id)),
                None => fail(StatusCode::NOT_FOUND, "no such element", "nothing matched"),
            }
        }
        (Method::POST, [_, _, "element", parent, "elements"]) => {
            let parent = element(parent);
            let (using, value) = (body["using"].as_str(), body["value"].as_str());
            let hits: Vec<Json> = s
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| {
                    e.parent.is_some()
                        && e.parent == parent
                        && Some(e.using) == using
                        && Some(e.value) == value
                })
                .map(|(id, _)| element_ref(id))
                .collect();
            ok(Json::Array(hits))
        }
        (method, [_, _, "element", id, rest @ ..]) => {
            let Some(id) = element(id).filter(|id| *id < s.elements.len()) else {
                return fail(StatusCode::NOT_FOUND, "stale element reference", "gone");
            };
            match (method, rest) {
                (Method::GET, ["displayed"]) => ok(json!(s.elements[id].displayed)),
                (Method::GET, ["enabled"]) => ok(json!(s.elements[id].enabled)),
                (Method::GET, ["text"]) => ok(json!(s.elements[id].text)),
                (Method::GET, ["property", "value"]) => ok(json!(s.elements[id].typed)),
                (Method::GET, ["property", _]) => ok(Json::Null),
                (Method::POST, ["clear"]) => {
                    s.elements[id].typed.clear();
                    ok(Json::Null)
                }
                (Method::POST, ["value"]) => {
                    let text = body["text"].as_str().unwrap_or_default().to_string();
                    s.elements[id].typed.push_str(&text);
                    ok(Json::Null)
                }
                (Method::POST, ["click"]) => {
                    if let Some(url) = s.elements[id].navigates_to {
                        s.url = url.to_string();
                    }
                    // geckodriver answers clicks with {}
                    ok(json!({}))
                }
                _ => fail(StatusCode::NOT_FOUND, "unknown command", &path),
            }
        }
        _ => fail(StatusCode::NOT_FOUND, "unknown command", &path),
    }
}

/// A config for a real browser, as chosen by the environment, overridden to `browser`.
pub fn live_config(browser: &str) -> Config {
    let mut config = Config::from_env().expect("valid environment");
    config.browser.kind = browser.parse().expect("known browser");
    config
}

pub fn handle_test_error(
    res: Result<Result<(), fareprobe::Error>, Box<dyn std::any::Any + Send>>,
) -> bool {
    match res {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            eprintln!("test future failed to resolve: {:?}", e);
            false
        }
        Err(e) => {
            if let Some(e) = e.downcast_ref::<fareprobe::Error>() {
                eprintln!("test future panicked: {:?}", e);
            } else {
                eprintln!("test future panicked; an assertion probably failed");
            }
            false
        }
    }
}

/// Run a UI scenario against a real browser, in its own thread so panics are caught.
///
/// The session is closed when the page drops, even if the scenario panicked.
#[macro_export]
macro_rules! tester {
    ($scenario:expr, $browser:expr) => {{
        let config = common::live_config($browser);
        let res = std::thread::spawn(move || {
            let page = fareprobe::blocking::SearchPage::connect(&config)?;
            let fixtures = fareprobe::Fixtures::from_env();
            page.block_on(|p| $scenario.run(p, &fixtures))
        })
        .join();
        let success = common::handle_test_error(res);
        assert!(success);
    }};
}
