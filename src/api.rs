//! A client for the flight price API's `prices_for_dates` route.
//!
//! See <https://support.travelpayouts.com/hc/en-us/articles/203956163>.

use crate::config::{ApiToken, Config};
use crate::error::{ApiError, TransportError};
use crate::http::{self, HttpClient};
use http_body_util::Full;
use hyper::body::Bytes;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

const ROUTE: &str = "prices_for_dates";

/// One search against `prices_for_dates`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceQuery {
    /// IATA code of the city or airport to fly from.
    pub origin: String,
    /// IATA code of the city or airport to fly to.
    pub destination: String,
    /// `YYYY-MM-DD` for a day, or `YYYY-MM` for any day that month.
    pub departure_at: String,
    /// Return date, for round trips.
    pub return_at: Option<String>,
    /// Most results to return.
    pub limit: Option<u32>,
}

impl PriceQuery {
    /// A one-way search.
    pub fn one_way(
        origin: impl Into<String>,
        destination: impl Into<String>,
        departure_at: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_at: departure_at.into(),
            return_at: None,
            limit: None,
        }
    }

    /// Come back on `date`.
    pub fn returning(mut self, date: impl Into<String>) -> Self {
        self.return_at = Some(date.into());
        self
    }

    /// Ask for at most `limit` results.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One offer in a reply.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Ticket {
    /// Price in the reply's currency.
    pub price: f64,
    /// Outbound departure time.
    pub departure_at: String,
    /// Return departure time, for round trips.
    #[serde(default)]
    pub return_at: Option<String>,
    /// Origin code.
    #[serde(default)]
    pub origin: Option<String>,
    /// Destination code.
    #[serde(default)]
    pub destination: Option<String>,
    /// Airline code.
    #[serde(default)]
    pub airline: Option<String>,
    /// Number of stops on the way out.
    #[serde(default)]
    pub transfers: Option<u32>,
    /// Path of the offer on the site.
    #[serde(default)]
    pub link: Option<String>,
    /// Whatever else the API sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A successful reply.
#[derive(Clone, Debug, PartialEq)]
pub struct Prices {
    /// Currency every price is in.
    pub currency: String,
    /// The offers. May be empty.
    pub data: Vec<Ticket>,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Vec<Ticket>>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the price API.
#[derive(Clone)]
pub struct PriceApi {
    http: HttpClient,
    base: Url,
    token: Option<ApiToken>,
    timeout: Duration,
}

impl fmt::Debug for PriceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceApi")
            .field("base", &self.base.as_str())
            .field("token", &self.token)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PriceApi {
    /// A client for the API at `config.api_base_url`, using `config.api_token`.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            http: http::client()?,
            base: config.api_base_url.clone(),
            token: config.api_token.clone(),
            timeout: config.timeout,
        })
    }

    /// Search one way.
    pub async fn search_one_way(
        &self,
        origin: &str,
        destination: &str,
        departure_at: &str,
    ) -> Result<Prices, ApiError> {
        self.prices_for_dates(&PriceQuery::one_way(origin, destination, departure_at))
            .await
    }

    /// Search there and back.
    pub async fn search_round_trip(
        &self,
        origin: &str,
        destination: &str,
        departure_at: &str,
        return_at: &str,
    ) -> Result<Prices, ApiError> {
        let query = PriceQuery::one_way(origin, destination, departure_at).returning(return_at);
        self.prices_for_dates(&query).await
    }

    /// Run `query`.
    ///
    /// Fails on a non-2xx status, on `success: false`, on a reply without `data` or
    /// `currency`, and on more results than the query's limit.
    #[tracing::instrument(skip(self))]
    pub async fn prices_for_dates(&self, query: &PriceQuery) -> Result<Prices, ApiError> {
        let url = self.url(query)?;
        let req = hyper::Request::get(url.as_str())
            .header(hyper::header::ACCEPT, mime::APPLICATION_JSON.as_ref())
            .body(Full::new(Bytes::new()))
            .map_err(TransportError::from)?;

        tracing::debug!(route = ROUTE, "querying price api");
        let reply = tokio::time::timeout(self.timeout, http::send(&self.http, req))
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        if !reply.status.is_success() {
            return Err(ApiError::Status {
                status: reply.status,
                body: reply.text(),
            });
        }
        let prices = parse(&reply.body, query.limit)?;
        tracing::debug!(results = prices.data.len(), currency = %prices.currency, "prices");
        Ok(prices)
    }

    /// The request URL. Carries the token, so it is never logged.
    fn url(&self, query: &PriceQuery) -> Result<Url, ApiError> {
        let mut url = self.base.join(ROUTE)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("origin", &query.origin)
                .append_pair("destination", &query.destination)
                .append_pair("departure_at", &query.departure_at);
            if let Some(ref return_at) = query.return_at {
                pairs.append_pair("return_at", return_at);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(ref token) = self.token {
                pairs.append_pair("token", token.expose());
            }
        }
        Ok(url)
    }
}

fn parse(body: &[u8], limit: Option<u32>) -> Result<Prices, ApiError> {
    let reply: Reply = serde_json::from_slice(body)?;
    if !reply.success {
        return Err(ApiError::Unsuccessful {
            message: reply.error,
        });
    }
    let data = reply.data.ok_or(ApiError::MissingField("data"))?;
    let currency = reply.currency.ok_or(ApiError::MissingField("currency"))?;
    if let Some(limit) = limit {
        if data.len() > limit as usize {
            return Err(ApiError::LimitExceeded {
                limit,
                returned: data.len(),
            });
        }
    }
    Ok(Prices { currency, data })
}
