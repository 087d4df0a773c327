//! The page layer over a real WebDriver HTTP exchange, against a fake driver.

use fareprobe::error::{NewSessionError, PageError};
use fareprobe::{ClientBuilder, SearchPage};
use std::time::Duration;

mod common;
use common::{config_for, fake_webdriver, FakeElement, SESSION};

const RESULTS: &str = "https://www.aviasales.ru/search/MOW0109LED1";

fn search_form() -> Vec<FakeElement> {
    vec![
        FakeElement::tag("body"),
        FakeElement::css("[data-test-id='origin-autocomplete-field']"),
        FakeElement::css("[data-test-id='destination-autocomplete-field']"),
        FakeElement::css("[data-test-id='form-submit']").navigates_to(RESULTS),
        FakeElement::tag("footer").text("Aviasales © 2007–2025"),
        FakeElement::tag("a").inside(4),
        FakeElement::tag("a").inside(4),
        FakeElement::tag("a").inside(4),
    ]
}

#[tokio::test]
async fn search_flow_over_the_wire() {
    let (addr, driver) = fake_webdriver(search_form()).await;
    let page = SearchPage::connect(&config_for(addr)).await.unwrap();

    page.open().await.unwrap();
    // navigation goes through Url, which normalizes the empty path
    assert_eq!(driver.lock().unwrap().url, "https://www.aviasales.ru/");
    assert_eq!(page.title().await, "Aviasales");

    page.fill_origin("Москва").await.unwrap();
    page.fill_destination("Санкт-Петербург").await.unwrap();
    assert_eq!(page.origin_value().await.unwrap(), "Москва");
    assert_eq!(page.destination_value().await.unwrap(), "Санкт-Петербург");

    page.submit_search().await.unwrap();
    page.wait_for_results().await.unwrap();
    assert!(page.current_url().await.contains("search"));

    assert_eq!(page.footer_links().await.unwrap().len(), 3);

    page.close().await.unwrap();
    assert_eq!(driver.lock().unwrap().deleted, vec![SESSION.to_string()]);
}

#[tokio::test]
async fn session_asks_for_the_configured_browser() {
    let (addr, driver) = fake_webdriver(vec![]).await;
    let page = SearchPage::connect(&config_for(addr)).await.unwrap();

    {
        let driver = driver.lock().unwrap();
        let caps = &driver.new_session.as_ref().unwrap()["capabilities"]["alwaysMatch"];
        assert_eq!(caps["pageLoadStrategy"], "normal");
        assert_eq!(caps["goog:chromeOptions"]["w3c"], true);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert_eq!(driver.window, Some((1920, 1080)));
    }

    page.close().await.unwrap();
}

#[tokio::test]
async fn missing_elements_are_reported_by_role() {
    let (addr, _driver) = fake_webdriver(vec![FakeElement::tag("body")]).await;
    let mut config = config_for(addr);
    config.timeout = Duration::from_millis(600);
    let page = SearchPage::connect(&config).await.unwrap();

    page.open().await.unwrap();
    let err = page.fill_origin("Москва").await.unwrap_err();
    assert!(matches!(
        err,
        PageError::ElementNotFound {
            element: "origin input",
            candidates: 6
        }
    ));
    assert!(page.logo().await.is_none());

    page.close().await.unwrap();
}

#[tokio::test]
async fn refused_sessions_surface_the_driver_error() {
    let (addr, driver) = fake_webdriver(vec![]).await;
    driver.lock().unwrap().refuse_sessions = true;

    let err = SearchPage::connect(&config_for(addr)).await.unwrap_err();
    match err {
        NewSessionError::SessionNotCreated(e) => {
            assert_eq!(e.error(), "session not created");
            assert_eq!(e.message, "no browser binary");
        }
        e => panic!("unexpected error: {:?}", e),
    }
}

#[tokio::test]
async fn dropped_clients_close_their_session() {
    let (addr, driver) = fake_webdriver(vec![]).await;
    let client = ClientBuilder::new()
        .connect(&format!("http://{}", addr))
        .await
        .unwrap();
    assert_eq!(client.session_id(), Some(SESSION));
    drop(client);

    for _ in 0..200 {
        if !driver.lock().unwrap().deleted.is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session was never deleted");
}

#[tokio::test]
async fn navigation_round_trips() {
    let (addr, driver) = fake_webdriver(vec![]).await;
    let client = ClientBuilder::new()
        .connect(&format!("http://{}", addr))
        .await
        .unwrap();
    client.goto("https://www.aviasales.ru/").await.unwrap();
    assert_eq!(
        client.current_url().await.unwrap().as_str(),
        "https://www.aviasales.ru/"
    );
    client.close().await.unwrap();
    assert_eq!(driver.lock().unwrap().deleted.len(), 1);
}

// Nothing may touch the runtime after this test returns: the close request spawned by the
// drop is still pending when the runtime shuts down and must be discarded quietly.
#[tokio::test]
async fn unclosed_client_dropped_at_shutdown() {
    let (addr, _driver) = fake_webdriver(vec![]).await;
    let client = ClientBuilder::new()
        .connect(&format!("http://{}", addr))
        .await
        .unwrap();
    drop(client);
}

#[tokio::test]
async fn unclosed_page_dropped_at_shutdown() {
    let (addr, _driver) = fake_webdriver(vec![FakeElement::tag("body")]).await;
    let page = SearchPage::connect(&config_for(addr)).await.unwrap();
    page.open().await.unwrap();
}
