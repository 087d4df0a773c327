//! Turning browser choices into WebDriver capabilities.

use crate::error::ConfigError;
use crate::wd::Capabilities;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Which browser to drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    /// Chrome or Chromium, through chromedriver.
    #[default]
    Chrome,
    /// Firefox, through geckodriver.
    Firefox,
}

impl BrowserKind {
    /// Where the usual driver for this browser listens by default.
    pub fn default_webdriver_url(self) -> &'static str {
        match self {
            BrowserKind::Chrome => "http://localhost:9515",
            BrowserKind::Firefox => "http://localhost:4444",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            _ => Err(ConfigError {
                key: "browser",
                value: s.to_string(),
                reason: "expected `chrome` or `firefox`".to_string(),
            }),
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        })
    }
}

/// How to launch the browser for a new session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Which browser.
    pub kind: BrowserKind,
    /// Run without a visible window.
    pub headless: bool,
    /// Initial window size, in pixels.
    pub window: (u32, u32),
    /// Keep the browser's sandbox on. Containers usually need it off.
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chrome,
            headless: true,
            window: (1920, 1080),
            sandbox: false,
        }
    }
}

impl BrowserOptions {
    /// The capabilities to ask the WebDriver for.
    pub fn capabilities(&self) -> Capabilities {
        let (width, height) = self.window;
        let mut caps = Capabilities::new();
        match self.kind {
            BrowserKind::Chrome => {
                let mut args = Vec::new();
                if self.headless {
                    args.push("--headless=new".to_string());
                }
                if !self.sandbox {
                    args.push("--no-sandbox".to_string());
                }
                args.push("--disable-dev-shm-usage".to_string());
                args.push(format!("--window-size={},{}", width, height));
                args.push("--disable-blink-features=AutomationControlled".to_string());
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                let mut args = Vec::new();
                if self.headless {
                    args.push("-headless".to_string());
                }
                args.push(format!("--width={}", width));
                args.push(format!("--height={}", height));
                caps.insert("browserName".to_string(), json!("firefox"));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}
