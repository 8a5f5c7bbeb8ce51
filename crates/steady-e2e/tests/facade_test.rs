// Integration tests for the element facade
//
// Tests cover:
// - Click through a fallback candidate (login button only reachable by text)
// - Transient click failures absorbed by retry
// - Failures propagated after retries, with the root cause preserved
// - Fill and read back text
// - is_visible returning a boolean for any input

mod common;

use std::time::Duration;
use steady_e2e::testing::{FakeElement, FakePage};
use steady_e2e::wait::DEFAULT_POLL_INTERVAL;
use steady_e2e::{ElementFacade, Error, LogicalElement, RetryPolicy};
use tokio::time::Instant;

fn login_button() -> LogicalElement {
    LogicalElement::new("loginButton", "[data-testid=login]").or("text=Login")
}

// ============================================================================
// Mutating actions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_click_uses_fallback_candidate() {
    common::init_tracing();
    let (page, driver) = common::shared(FakePage::new().with("text=Login", FakeElement::visible()));
    let facade = ElementFacade::new(driver);

    facade
        .click(&login_button(), Duration::from_secs(10))
        .await
        .expect("click through the text fallback");

    assert_eq!(page.clicks(), vec!["text=Login >> nth=0".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_click_waits_for_enabled() {
    let page = FakePage::new().with("#place-bet", FakeElement::visible().disabled());
    let (page, driver) = common::shared(page);
    let facade = ElementFacade::new(driver).with_retry(RetryPolicy::once());
    let button = LogicalElement::new("placeBet", "#place-bet");

    let start = Instant::now();
    let err = facade
        .click(&button, Duration::from_millis(800))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(start.elapsed() <= Duration::from_millis(800) + DEFAULT_POLL_INTERVAL);
    assert!(page.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transient_click_failure_is_retried() {
    let page = FakePage::new().with("#odds-1", FakeElement::visible());
    page.fail_clicks("#odds-1", 2);
    let (page, driver) = common::shared(page);
    let facade = ElementFacade::new(driver);

    facade
        .click(&LogicalElement::new("firstOdds", "#odds-1"), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(page.clicks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_element_fails_after_retries() {
    common::init_tracing();
    let (_page, driver) = common::shared(FakePage::new());
    let facade = ElementFacade::new(driver)
        .with_retry(RetryPolicy::fixed(3, Duration::from_millis(100)));

    let start = Instant::now();
    let err = facade
        .click(&login_button(), Duration::from_millis(500))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RetryExhausted { attempts: 3, .. }));
    assert!(err.is_not_found());
    assert!(err.to_string().contains("text=Login"));
    // 3 attempts of 500ms plus 2 delays of 100ms
    assert!(start.elapsed() <= Duration::from_millis(1700) + DEFAULT_POLL_INTERVAL * 3);
}

#[tokio::test(start_paused = true)]
async fn test_fill_then_read_text() {
    let page = FakePage::new().with("input[name=\"search\"]", FakeElement::visible());
    let (page, driver) = common::shared(page);
    let facade = ElementFacade::new(driver);
    let search = LogicalElement::new("searchInput", "input[name=\"search\"]");

    facade
        .fill(&search, "Steaua", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(
        page.fills(),
        vec![("input[name=\"search\"] >> nth=0".to_string(), "Steaua".to_string())]
    );
    assert_eq!(
        facade.get_text(&search, Duration::from_secs(1)).await.unwrap(),
        "Steaua"
    );
}

#[tokio::test(start_paused = true)]
async fn test_fill_rejects_hidden_element() {
    let (_page, driver) =
        common::shared(FakePage::new().with("#hidden-input", FakeElement::hidden()));
    let facade = ElementFacade::new(driver).with_retry(RetryPolicy::once());

    let err = facade
        .fill(
            &LogicalElement::new("hiddenInput", "#hidden-input"),
            "x",
            Duration::from_millis(300),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Boolean visibility
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_is_visible_never_raises() {
    common::init_tracing();
    let (_page, driver) = common::shared(FakePage::new().with("#banner", FakeElement::visible()));
    let facade = ElementFacade::new(driver);
    let timeout = Duration::from_millis(400);

    let inputs = [
        LogicalElement::new("malformed", "div[[oops"),
        LogicalElement::new("missing", "#does-not-exist"),
        LogicalElement::new("xpath", "//*[text()=\"nowhere\"]"),
        LogicalElement::new("emptyText", "text="),
    ];
    for element in &inputs {
        let start = Instant::now();
        assert!(!facade.is_visible(element, timeout).await, "{}", element.name());
        assert!(start.elapsed() <= timeout + DEFAULT_POLL_INTERVAL);
    }

    assert!(
        facade
            .is_visible(&LogicalElement::new("banner", "#banner"), timeout)
            .await
    );
}

#[tokio::test(start_paused = true)]
async fn test_is_visible_returns_when_engine_stalls() {
    let page = FakePage::new().with("#frozen", FakeElement::visible());
    page.stall("#frozen");
    let (_page, driver) = common::shared(page);
    let facade = ElementFacade::new(driver);
    let timeout = Duration::from_millis(500);

    let start = Instant::now();
    assert!(
        !facade
            .is_visible(&LogicalElement::new("frozen", "#frozen"), timeout)
            .await
    );
    assert!(start.elapsed() <= timeout + DEFAULT_POLL_INTERVAL);
}
