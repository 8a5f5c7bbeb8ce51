// Integration tests for the per-test fixture
//
// Tests cover:
// - Setup: navigation, overlay dismissal, console subscription
// - Forced consent cookies scoped to the configured site
// - Failure artifacts (screenshot and console log)
// - Navigation failures failing setup

mod common;

use steady_e2e::testing::{FakeElement, FakePage};
use steady_e2e::{ConsoleKind, DismissOutcome, Error, LoadState, Settings, TestContext};

const OVERLAY: &str = "#onetrust-consent-sdk";
const ACCEPT: &str = "#onetrust-accept-btn-handler";

fn site() -> FakePage {
    let page = FakePage::new()
        .with("body", FakeElement::visible())
        .with(OVERLAY, FakeElement::visible())
        .with(ACCEPT, FakeElement::visible());
    page.on_click_hide(ACCEPT, &[OVERLAY, ACCEPT]);
    page
}

#[tokio::test(start_paused = true)]
async fn test_setup_navigates_and_dismisses_overlay() {
    common::init_tracing();
    let (page, driver) = common::shared(site());

    let context = TestContext::setup(driver, Settings::default(), Some("/"))
        .await
        .expect("setup");

    assert_eq!(
        page.navigations(),
        vec![("https://superbet.ro/".to_string(), LoadState::DomContentLoaded)]
    );
    assert_eq!(context.overlay_outcome(), DismissOutcome::Dismissed);
    assert!(page.was_clicked(ACCEPT));
    assert!(page.cookies().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_setup_without_start_path_skips_navigation() {
    let (page, driver) = common::shared(FakePage::new());

    let context = TestContext::setup(driver, Settings::default(), None)
        .await
        .unwrap();

    assert!(page.navigations().is_empty());
    assert_eq!(context.overlay_outcome(), DismissOutcome::Absent);
}

#[tokio::test(start_paused = true)]
async fn test_console_messages_are_captured_per_test() {
    let (page, driver) = common::shared(site());
    let context = TestContext::setup(driver, Settings::default(), None)
        .await
        .unwrap();
    assert!(context.console().is_empty());

    page.emit_console(ConsoleKind::Log, "odds refreshed");
    page.emit_console(ConsoleKind::Error, "Failed to load resource: 404");

    assert_eq!(context.console().len(), 2);
    assert!(context.console().has_errors());
    assert_eq!(
        context.console().errors()[0].message,
        "Failed to load resource: 404"
    );

    // A second context gets its own sink
    let (_other_page, other_driver) = common::shared(FakePage::new());
    let other = TestContext::setup(other_driver, Settings::default(), None)
        .await
        .unwrap();
    assert!(other.console().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stuck_overlay_cookies_use_site_domain() {
    let (page, driver) = common::shared(FakePage::new().with(OVERLAY, FakeElement::visible()));
    let settings = Settings {
        base_url: "https://www.example.test".to_string(),
        ..Settings::default()
    };

    let mut context = TestContext::setup(driver, settings, None).await.unwrap();

    assert_eq!(context.overlay_outcome(), DismissOutcome::Forced);
    let cookies = page.cookies();
    assert_eq!(cookies.len(), 3);
    assert!(cookies.iter().all(|c| c.domain == ".example.test"));

    // Once the overlay goes away the next dismissal is a no-op
    page.set_visible(OVERLAY, false);
    assert_eq!(context.dismiss_overlay().await, DismissOutcome::Absent);
    assert_eq!(page.cookies().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_failure_fails_setup() {
    let page = site();
    page.fail_navigation(true);
    let (page, driver) = common::shared(page);

    let err = TestContext::setup(driver, Settings::default(), Some("/pariuri-sportive"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Navigation { ref url, .. } if url.ends_with("/pariuri-sportive")));
    assert!(page.clicks().is_empty(), "no dismissal after a failed navigation");
}

#[tokio::test(start_paused = true)]
async fn test_capture_failure_writes_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        screenshot_dir: dir.path().to_path_buf(),
        ..Settings::default()
    };
    let (page, driver) = common::shared(site());
    let context = TestContext::setup(driver, settings, Some("/")).await.unwrap();

    // Nothing logged: screenshot only
    let quiet = context.capture_failure("quiet test").await.unwrap();
    assert!(quiet.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    page.emit_console(ConsoleKind::Error, "Uncaught TypeError");

    let shot = context.capture_failure("header: Sport link").await.unwrap();
    assert!(shot.extension().is_some_and(|ext| ext == "png"));

    let log = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.to_string_lossy().ends_with(".console.json"))
        .expect("console log written");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(log).unwrap()).unwrap();
    assert_eq!(json[0]["message"], "Uncaught TypeError");
    assert_eq!(json[0]["kind"], "error");
}
