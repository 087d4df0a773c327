//! Run the smoke scenarios and report which passed.

use clap::{Parser, Subcommand};
use fareprobe::capabilities::BrowserKind;
use fareprobe::scenarios::{api, ui};
use fareprobe::{Config, Error, Fixtures, PriceApi, SearchPage};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Smoke checks for the flight search site and its price API.
///
/// Configuration comes from the environment (see `Config::from_env`); the flags below take
/// precedence over it.
#[derive(Debug, Parser)]
#[command(name = "fareprobe", version, about)]
struct Cli {
    #[command(subcommand)]
    suite: Suite,

    /// Browser to drive
    #[arg(long, global = true)]
    browser: Option<BrowserKind>,

    /// WebDriver server URL [default: the browser driver's usual port]
    #[arg(long, global = true, value_name = "URL")]
    webdriver: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    headed: bool,

    /// Upper bound for each wait, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
enum Suite {
    /// Search page scenarios, one browser session each
    Ui,
    /// Price API scenarios
    Api,
    /// Both
    All,
}

impl Cli {
    fn config(&self) -> Result<Config, Error> {
        let mut config = Config::from_env()?;
        if let Some(kind) = self.browser {
            config.browser.kind = kind;
        }
        if let Some(ref url) = self.webdriver {
            config.webdriver_url = Some(url.clone());
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    failed: usize,
}

impl Tally {
    fn record(&mut self, name: &str, result: Result<(), Error>) {
        match result {
            Ok(()) => {
                self.passed += 1;
                println!("{} ... ok", name);
            }
            Err(e) => {
                self.failed += 1;
                println!("{} ... FAILED: {}", name, e);
            }
        }
    }
}

/// Each UI scenario gets a fresh session, which is closed whatever the outcome.
async fn run_ui(
    scenario: ui::Scenario,
    config: &Config,
    fixtures: &Fixtures,
) -> Result<(), Error> {
    let page = SearchPage::connect(config).await?;
    let result = scenario.run(&page, fixtures).await;
    if let Err(e) = page.close().await {
        tracing::warn!(error = %e, scenario = scenario.name(), "could not close session");
    }
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fareprobe: {}", e);
            return ExitCode::from(2);
        }
    };
    let fixtures = Fixtures::from_env();
    tracing::debug!(?config, ?fixtures, "configured");

    let mut tally = Tally::default();

    if matches!(cli.suite, Suite::Ui | Suite::All) {
        for scenario in ui::Scenario::ALL {
            let result = run_ui(scenario, &config, &fixtures).await;
            tally.record(scenario.name(), result);
        }
    }

    if matches!(cli.suite, Suite::Api | Suite::All) {
        match PriceApi::new(&config) {
            Ok(client) => {
                if config.api_token.is_none() {
                    tracing::warn!("API_TOKEN is not set; the price api will likely refuse");
                }
                for scenario in api::Scenario::ALL {
                    let result = scenario.run(&client, &fixtures).await;
                    tally.record(scenario.name(), result);
                }
            }
            Err(e) => tally.record("price api client", Err(e.into())),
        }
    }

    println!("\n{} passed; {} failed", tally.passed, tally.failed);
    if tally.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
