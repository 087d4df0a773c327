//! Run configuration.
//!
//! Everything has a working default. Environment variables override the defaults, and the
//! command line overrides both.

use crate::capabilities::BrowserOptions;
use crate::error::ConfigError;
use crate::wait::DEFAULT_TIMEOUT;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Site under test.
pub const DEFAULT_BASE_URL: &str = "https://www.aviasales.ru";

/// Travelpayouts flight data API, v3.
pub const DEFAULT_API_BASE_URL: &str = "https://api.travelpayouts.com/aviasales/v3/";

/// A price API token.
///
/// Its `Debug` output is redacted, so a token never ends up in logs or panic messages.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token itself, for putting on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Configuration shared by the page layer and the price API client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Where the search page lives.
    pub base_url: String,
    /// Base of the price API. Always ends with `/`.
    pub api_base_url: Url,
    /// Price API token. Requests go out without one if unset.
    pub api_token: Option<ApiToken>,
    /// Upper bound for every single wait: element lookups, URL changes, API replies.
    pub timeout: Duration,
    /// WebDriver server. Defaults to the usual port of the chosen browser's driver.
    pub webdriver_url: Option<String>,
    /// How to launch the browser.
    pub browser: BrowserOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_base_url: api_base(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default api url parses")),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            webdriver_url: None,
            browser: BrowserOptions::default(),
        }
    }
}

impl Config {
    /// Defaults, overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for each known variable.
    ///
    /// | variable | field |
    /// |---|---|
    /// | `FAREPROBE_BASE_URL` | `base_url` |
    /// | `FAREPROBE_API_BASE_URL` | `api_base_url` |
    /// | `API_TOKEN` | `api_token` |
    /// | `FAREPROBE_TIMEOUT_SECS` | `timeout` |
    /// | `WEBDRIVER_URL` | `webdriver_url` |
    /// | `FAREPROBE_BROWSER` | `browser.kind` |
    /// | `FAREPROBE_HEADLESS` | `browser.headless` |
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(v) = get("FAREPROBE_BASE_URL") {
            config.base_url = v;
        }
        if let Some(v) = get("FAREPROBE_API_BASE_URL") {
            config.api_base_url = api_base(&v).map_err(|e| ConfigError {
                key: "FAREPROBE_API_BASE_URL",
                value: v.clone(),
                reason: e.to_string(),
            })?;
        }
        config.api_token = get("API_TOKEN").map(ApiToken::new);
        if let Some(v) = get("FAREPROBE_TIMEOUT_SECS") {
            let secs = v.trim().parse::<u64>().map_err(|e| ConfigError {
                key: "FAREPROBE_TIMEOUT_SECS",
                value: v.clone(),
                reason: e.to_string(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.webdriver_url = get("WEBDRIVER_URL");
        if let Some(v) = get("FAREPROBE_BROWSER") {
            config.browser.kind = v.parse().map_err(|e: ConfigError| ConfigError {
                key: "FAREPROBE_BROWSER",
                ..e
            })?;
        }
        if let Some(v) = get("FAREPROBE_HEADLESS") {
            config.browser.headless = parse_flag("FAREPROBE_HEADLESS", &v)?;
        }
        Ok(config)
    }

    /// The WebDriver server to connect to.
    pub fn webdriver_url(&self) -> &str {
        self.webdriver_url
            .as_deref()
            .unwrap_or_else(|| self.browser.kind.default_webdriver_url())
    }
}

/// Parse an API base URL, making sure that joining a route onto it keeps its last segment.
fn api_base(s: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(s)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_flag(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            key,
            value: v.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// The routes, airports, and dates the scenarios search for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixtures {
    /// City code to fly from.
    pub origin_city: String,
    /// City code to fly to.
    pub destination_city: String,
    /// Airport code to fly from.
    pub origin_airport: String,
    /// Airport code to fly to.
    pub destination_airport: String,
    /// Outbound date, `YYYY-MM-DD`.
    pub departure_date: String,
    /// Return date, `YYYY-MM-DD`.
    pub return_date: String,
    /// Outbound month, `YYYY-MM`.
    pub departure_month: String,
    /// City typed into the origin field of the search page.
    pub origin_name: String,
    /// City typed into the destination field of the search page.
    pub destination_name: String,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            origin_city: "MOW".to_string(),
            destination_city: "LED".to_string(),
            origin_airport: "DME".to_string(),
            destination_airport: "UTP".to_string(),
            departure_date: "2025-09-01".to_string(),
            return_date: "2025-09-03".to_string(),
            departure_month: "2025-09".to_string(),
            origin_name: "Москва".to_string(),
            destination_name: "Санкт-Петербург".to_string(),
        }
    }
}

impl Fixtures {
    /// Defaults, overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by `FAREPROBE_ORIGIN`, `FAREPROBE_DESTINATION`,
    /// `FAREPROBE_ORIGIN_AIRPORT`, `FAREPROBE_DESTINATION_AIRPORT`, `FAREPROBE_DEPARTURE_DATE`,
    /// `FAREPROBE_RETURN_DATE`, `FAREPROBE_DEPARTURE_MONTH`, `FAREPROBE_ORIGIN_NAME`, and
    /// `FAREPROBE_DESTINATION_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut fixtures = Fixtures::default();
        let fields = [
            ("FAREPROBE_ORIGIN", &mut fixtures.origin_city),
            ("FAREPROBE_DESTINATION", &mut fixtures.destination_city),
            ("FAREPROBE_ORIGIN_AIRPORT", &mut fixtures.origin_airport),
            ("FAREPROBE_DESTINATION_AIRPORT", &mut fixtures.destination_airport),
            ("FAREPROBE_DEPARTURE_DATE", &mut fixtures.departure_date),
            ("FAREPROBE_RETURN_DATE", &mut fixtures.return_date),
            ("FAREPROBE_DEPARTURE_MONTH", &mut fixtures.departure_month),
            ("FAREPROBE_ORIGIN_NAME", &mut fixtures.origin_name),
            ("FAREPROBE_DESTINATION_NAME", &mut fixtures.destination_name),
        ];
        for (key, field) in fields {
            if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = v;
            }
        }
        fixtures
    }
}
