//! End-to-end checks against the live site and API.
//!
//! Each scenario is one user-visible behavior. The integration tests and the `fareprobe`
//! binary run the same code.

use crate::error::Error;
use std::fmt;

fn check(ok: bool, what: impl Into<String>) -> Result<(), Error> {
    if ok {
        Ok(())
    } else {
        Err(Error::Assertion(what.into()))
    }
}

/// Scenarios that drive the search page.
pub mod ui {
    use super::check;
    use crate::browser::Browser;
    use crate::config::Fixtures;
    use crate::error::Error;
    use crate::page::SearchPage;

    /// A search page scenario.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Scenario {
        /// The page loads and has a title.
        OpenMainPage,
        /// Both city fields are shown.
        SearchFormDisplayed,
        /// Filling both cities and pressing search leads to results.
        SimpleSearch,
        /// The footer is shown, has text, and links somewhere.
        FooterExists,
        /// The logo, if there is one, is shown.
        LogoExists,
    }

    impl Scenario {
        /// Every scenario, in the order they are usually run.
        pub const ALL: [Scenario; 5] = [
            Scenario::OpenMainPage,
            Scenario::SearchFormDisplayed,
            Scenario::SimpleSearch,
            Scenario::FooterExists,
            Scenario::LogoExists,
        ];

        /// Short name.
        pub fn name(self) -> &'static str {
            match self {
                Scenario::OpenMainPage => "open_main_page",
                Scenario::SearchFormDisplayed => "search_form_displayed",
                Scenario::SimpleSearch => "simple_search",
                Scenario::FooterExists => "footer_exists",
                Scenario::LogoExists => "logo_exists",
            }
        }

        /// Run against `page`, which should be freshly connected.
        #[tracing::instrument(skip_all, fields(scenario = self.name()))]
        pub async fn run<B: Browser>(
            self,
            page: &SearchPage<B>,
            fixtures: &Fixtures,
        ) -> Result<(), Error> {
            match self {
                Scenario::OpenMainPage => open_main_page(page).await,
                Scenario::SearchFormDisplayed => search_form_displayed(page).await,
                Scenario::SimpleSearch => simple_search(page, fixtures).await,
                Scenario::FooterExists => footer_exists(page).await,
                Scenario::LogoExists => logo_exists(page).await,
            }
        }
    }

    /// The page loads and has a title.
    pub async fn open_main_page<B: Browser>(page: &SearchPage<B>) -> Result<(), Error> {
        page.open().await?;
        let title = page.title().await;
        tracing::info!(%title, "page title");
        check(!title.is_empty(), "page title is empty")
    }

    /// Both city fields are shown.
    pub async fn search_form_displayed<B: Browser>(page: &SearchPage<B>) -> Result<(), Error> {
        page.open().await?;
        let origin = page.origin_field().await?;
        check(
            page.browser().is_displayed(&origin).await?,
            "origin input is not displayed",
        )?;
        let destination = page.destination_field().await?;
        check(
            page.browser().is_displayed(&destination).await?,
            "destination input is not displayed",
        )
    }

    /// Filling both cities and pressing search leads to results.
    pub async fn simple_search<B: Browser>(
        page: &SearchPage<B>,
        fixtures: &Fixtures,
    ) -> Result<(), Error> {
        page.open().await?;
        page.fill_origin(&fixtures.origin_name).await?;
        page.fill_destination(&fixtures.destination_name).await?;
        let typed = page.origin_value().await?;
        check(
            typed == fixtures.origin_name,
            format!("origin input holds {:?}, not {:?}", typed, fixtures.origin_name),
        )?;
        page.submit_search().await?;
        page.wait_for_results().await?;
        let url = page.current_url().await;
        tracing::info!(%url, "after search");
        check(url.contains("search"), format!("not on a results page: {}", url))
    }

    /// The footer is shown, has text, and has at least one link.
    pub async fn footer_exists<B: Browser>(page: &SearchPage<B>) -> Result<(), Error> {
        page.open().await?;
        let footer = page.footer().await?;
        check(
            page.browser().is_displayed(&footer).await?,
            "footer is not displayed",
        )?;
        let text = page.browser().text(&footer).await?;
        check(!text.trim().is_empty(), "footer is empty")?;
        let links = page.footer_links().await?;
        tracing::info!(links = links.len(), "footer");
        check(!links.is_empty(), "footer has no links")
    }

    /// The logo, if there is one, is shown.
    ///
    /// A page without a logo passes with a warning.
    pub async fn logo_exists<B: Browser>(page: &SearchPage<B>) -> Result<(), Error> {
        page.open().await?;
        match page.logo().await {
            Some(logo) => check(
                page.browser().is_displayed(&logo).await?,
                "logo is not displayed",
            ),
            None => {
                tracing::warn!("logo not found; passing anyway");
                Ok(())
            }
        }
    }
}

/// Scenarios that query the price API.
pub mod api {
    use super::check;
    use crate::api::{PriceApi, PriceQuery, Prices};
    use crate::config::Fixtures;
    use crate::error::Error;

    /// The limit [`search_with_limit`] asks for.
    pub const LIMIT: u32 = 5;

    /// A price API scenario.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Scenario {
        /// City to city, one way, on a given day.
        SearchOneWay,
        /// City to city and back.
        SearchRoundTrip,
        /// City to city, any day of a month.
        SearchByMonth,
        /// Airport to airport.
        SearchWithAirportCodes,
        /// At most [`LIMIT`] results.
        SearchWithLimit,
    }

    impl Scenario {
        /// Every scenario, in the order they are usually run.
        pub const ALL: [Scenario; 5] = [
            Scenario::SearchOneWay,
            Scenario::SearchRoundTrip,
            Scenario::SearchByMonth,
            Scenario::SearchWithAirportCodes,
            Scenario::SearchWithLimit,
        ];

        /// Short name.
        pub fn name(self) -> &'static str {
            match self {
                Scenario::SearchOneWay => "search_one_way",
                Scenario::SearchRoundTrip => "search_round_trip",
                Scenario::SearchByMonth => "search_by_month",
                Scenario::SearchWithAirportCodes => "search_with_airport_codes",
                Scenario::SearchWithLimit => "search_with_limit",
            }
        }

        /// Run against `api`.
        #[tracing::instrument(skip_all, fields(scenario = self.name()))]
        pub async fn run(self, api: &PriceApi, fixtures: &Fixtures) -> Result<(), Error> {
            match self {
                Scenario::SearchOneWay => search_one_way(api, fixtures).await,
                Scenario::SearchRoundTrip => search_round_trip(api, fixtures).await,
                Scenario::SearchByMonth => search_by_month(api, fixtures).await,
                Scenario::SearchWithAirportCodes => search_with_airport_codes(api, fixtures).await,
                Scenario::SearchWithLimit => search_with_limit(api, fixtures).await,
            }
        }
    }

    fn report(prices: &Prices) {
        tracing::info!(
            results = prices.data.len(),
            currency = %prices.currency,
            cheapest = prices.data.iter().map(|t| t.price).reduce(f64::min),
            "prices"
        );
    }

    /// City to city, one way, on a given day.
    pub async fn search_one_way(api: &PriceApi, fixtures: &Fixtures) -> Result<(), Error> {
        let prices = api
            .search_one_way(
                &fixtures.origin_city,
                &fixtures.destination_city,
                &fixtures.departure_date,
            )
            .await?;
        report(&prices);
        check(!prices.currency.is_empty(), "reply has an empty currency")
    }

    /// City to city and back. Every ticket has a price and a departure time.
    pub async fn search_round_trip(api: &PriceApi, fixtures: &Fixtures) -> Result<(), Error> {
        let prices = api
            .search_round_trip(
                &fixtures.origin_city,
                &fixtures.destination_city,
                &fixtures.departure_date,
                &fixtures.return_date,
            )
            .await?;
        report(&prices);
        for ticket in &prices.data {
            check(
                ticket.price >= 0.0,
                format!("ticket has a negative price: {}", ticket.price),
            )?;
            check(
                !ticket.departure_at.is_empty(),
                "ticket has no departure time",
            )?;
        }
        Ok(())
    }

    /// City to city, any day of a month.
    pub async fn search_by_month(api: &PriceApi, fixtures: &Fixtures) -> Result<(), Error> {
        let prices = api
            .search_one_way(
                &fixtures.origin_city,
                &fixtures.destination_city,
                &fixtures.departure_month,
            )
            .await?;
        report(&prices);
        Ok(())
    }

    /// Airport to airport. The reply may be empty, but must be a success.
    pub async fn search_with_airport_codes(
        api: &PriceApi,
        fixtures: &Fixtures,
    ) -> Result<(), Error> {
        let prices = api
            .search_one_way(
                &fixtures.origin_airport,
                &fixtures.destination_airport,
                &fixtures.departure_date,
            )
            .await?;
        report(&prices);
        Ok(())
    }

    /// At most [`LIMIT`] results come back.
    pub async fn search_with_limit(api: &PriceApi, fixtures: &Fixtures) -> Result<(), Error> {
        let query = PriceQuery::one_way(
            fixtures.origin_city.as_str(),
            fixtures.destination_city.as_str(),
            fixtures.departure_date.as_str(),
        )
        .limit(LIMIT);
        let prices = api.prices_for_dates(&query).await?;
        report(&prices);
        check(
            prices.data.len() <= LIMIT as usize,
            format!("{} results for limit {}", prices.data.len(), LIMIT),
        )
    }
}

impl fmt::Display for ui::Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for api::Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
