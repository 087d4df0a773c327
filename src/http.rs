//! The HTTP client shared by the WebDriver session and the price API.

use crate::error::TransportError;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::StatusCode;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::io;

#[cfg(feature = "native-tls")]
type Connector = hyper_tls::HttpsConnector<HttpConnector>;

#[cfg(all(feature = "rustls-tls", not(feature = "native-tls")))]
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

#[cfg(not(any(feature = "native-tls", feature = "rustls-tls")))]
type Connector = HttpConnector;

pub(crate) type HttpClient = hyper_util::client::legacy::Client<Connector, Full<Bytes>>;

#[cfg(feature = "native-tls")]
fn connector() -> io::Result<Connector> {
    Ok(hyper_tls::HttpsConnector::new())
}

#[cfg(all(feature = "rustls-tls", not(feature = "native-tls")))]
fn connector() -> io::Result<Connector> {
    Ok(hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build())
}

#[cfg(not(any(feature = "native-tls", feature = "rustls-tls")))]
fn connector() -> io::Result<Connector> {
    Ok(HttpConnector::new())
}

/// Build a client that speaks plain HTTP, and HTTPS when a TLS feature is on.
pub(crate) fn client() -> io::Result<HttpClient> {
    Ok(hyper_util::client::legacy::Client::builder(TokioExecutor::new()).build(connector()?))
}

/// A fully-read response.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) status: StatusCode,
    pub(crate) content_type: Option<mime::Mime>,
    pub(crate) body: Bytes,
}

impl Reply {
    /// True if the server said it sent JSON, whatever the charset.
    pub(crate) fn is_json(&self) -> bool {
        self.content_type.as_ref().map_or(false, |ctype| {
            ctype.type_() == mime::APPLICATION_JSON.type_()
                && ctype.subtype() == mime::APPLICATION_JSON.subtype()
        })
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Send `req` and read the whole body.
pub(crate) async fn send(
    client: &HttpClient,
    req: hyper::Request<Full<Bytes>>,
) -> Result<Reply, TransportError> {
    let res = client.request(req).await?;

    // keep track of result status (into_body() consumes the response)
    let status = res.status();
    let content_type = res
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|ctype| ctype.to_str().ok()?.parse::<mime::Mime>().ok());

    let body = res.into_body().collect().await?.to_bytes();
    Ok(Reply {
        status,
        content_type,
        body,
    })
}
