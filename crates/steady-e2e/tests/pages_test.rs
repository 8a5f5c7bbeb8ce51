// Integration tests for page objects
//
// Tests cover:
// - BasePage navigation (DOM-ready only), URL checks, screenshots
// - HeaderComponent: scoped link presence and navigation
// - SportPage: sub-page links, required buttons, clickability
// - LivePage: sidebar, Toate navigation

mod common;

use steady_e2e::catalog::header;
use steady_e2e::driver::LoadState;
use steady_e2e::pages::{BasePage, HeaderComponent, LivePage, SportPage, SubPageLink};
use steady_e2e::testing::{FAKE_PNG, FakeElement, FakePage};
use steady_e2e::{ElementFacade, Error, LocatorExpression, Settings, UrlPattern};

fn header_link(name: &str) -> String {
    let catalog = header::catalog();
    let selector = catalog.get(name).unwrap().selectors()[0].clone();
    format!("header >> {}", selector)
}

fn settings() -> Settings {
    Settings {
        retry_count: 0,
        ..Settings::default()
    }
}

// ============================================================================
// BasePage
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_navigate_waits_for_dom_ready_only() {
    common::init_tracing();
    let page = FakePage::new().with("body", FakeElement::visible());
    page.title_for("/pariuri-sportive", "Pariuri sportive | Superbet");
    let (page, driver) = common::shared(page);
    let base = BasePage::new(driver, &settings());

    base.navigate("/pariuri-sportive").await.unwrap();

    assert_eq!(
        page.navigations(),
        vec![(
            "https://superbet.ro/pariuri-sportive".to_string(),
            LoadState::DomContentLoaded
        )]
    );
    assert_eq!(base.title().await.unwrap(), "Pariuri sportive | Superbet");
    assert!(base.verify_url(&UrlPattern::from("/pariuri-sportive")));
    assert!(!base.verify_url(&UrlPattern::regex(r"/live$").unwrap()));
}

#[tokio::test(start_paused = true)]
async fn test_navigate_propagates_navigation_errors() {
    let page = FakePage::new();
    page.fail_navigation(true);
    let (_page, driver) = common::shared(page);

    let err = BasePage::new(driver, &settings())
        .navigate("/")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Navigation { .. }));
}

#[tokio::test]
async fn test_take_screenshot_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let (_page, driver) = common::shared(FakePage::new());
    let settings = Settings {
        screenshot_dir: dir.path().join("shots"),
        ..Settings::default()
    };

    let path = BasePage::new(driver, &settings)
        .take_screenshot("sport page: buttons")
        .await
        .unwrap();

    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("sport_page__buttons_"));
    assert!(file_name.ends_with(".png"));
    assert_eq!(std::fs::read(&path).unwrap(), FAKE_PNG);
}

// ============================================================================
// HeaderComponent
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_header_reports_link_presence() {
    common::init_tracing();
    let casino = header::catalog().get(header::CASINO_LINK).unwrap().selectors()[0].clone();
    let page = FakePage::new()
        .with("header", FakeElement::visible())
        .with(&header_link(header::SPORT_LINK), FakeElement::visible())
        .with(&header_link(header::LIVE_LINK), FakeElement::visible())
        .with("header >> .search-icon", FakeElement::visible())
        // Outside the header: must not count
        .with(&casino, FakeElement::visible());
    let (_page, driver) = common::shared(page);

    let header_component = HeaderComponent::new(ElementFacade::new(driver));
    let results = header_component.verify_all_links_present().await;

    assert_eq!(results.len(), 10);
    assert!(results[header::SPORT_LINK]);
    assert!(results[header::LIVE_LINK]);
    assert!(results[header::SEARCH_ICON], "found through its second fallback");
    assert!(!results[header::CASINO_LINK]);
    assert!(!results[header::LOGIN_BUTTON]);
}

#[tokio::test(start_paused = true)]
async fn test_header_link_navigation() {
    // No <header>: the root resolves through its last fallback
    let live_link = header_link(header::LIVE_LINK).replace("header", "nav");
    let page = FakePage::new()
        .with("nav", FakeElement::visible())
        .with(&live_link, FakeElement::visible());
    page.on_click_navigate(&live_link, "https://superbet.ro/pariuri-sportive/live");
    let (page, driver) = common::shared(page);
    let header_component = HeaderComponent::new(ElementFacade::new(driver));

    assert!(
        header_component
            .verify_link_navigation(header::LIVE_LINK, &UrlPattern::from("/pariuri-sportive/live"))
            .await
    );
    assert_eq!(page.clicks().len(), 1);
    assert!(
        !header_component
            .verify_link_navigation("unknownLink", &UrlPattern::from("/"))
            .await
    );
}

// ============================================================================
// SportPage
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_sport_sub_page_links() {
    let page = FakePage::new()
        .with(
            ".sidebar a",
            FakeElement::visible()
                .with_text("  Fotbal ")
                .with_attribute("href", "/pariuri-sportive/fotbal"),
        )
        .with(".sidebar a", FakeElement::visible().with_text("Tenis"))
        .with(
            ".sidebar a",
            FakeElement::visible()
                .with_text("Baschet")
                .with_attribute("href", "/pariuri-sportive/baschet"),
        );
    page.on_click_navigate(".sidebar a", "https://superbet.ro/pariuri-sportive/fotbal");
    let (page, driver) = common::shared(page);
    let sport = SportPage::new(BasePage::new(driver, &settings()));

    let links = sport.sub_page_links().await.unwrap();
    assert_eq!(
        links,
        vec![
            SubPageLink {
                text: "Fotbal".to_string(),
                href: "/pariuri-sportive/fotbal".to_string()
            },
            SubPageLink {
                text: "Baschet".to_string(),
                href: "/pariuri-sportive/baschet".to_string()
            },
        ]
    );

    sport.click_sub_page_link(0).await.unwrap();
    assert!(sport.verify_url(&UrlPattern::from("/fotbal")));
    assert_eq!(page.clicks().len(), 1);
    assert!(page.clicks()[0].starts_with(".sidebar a >> nth=0"));

    let err = sport.click_sub_page_link(7).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test(start_paused = true)]
async fn test_sub_page_link_click_is_retried() {
    let page = FakePage::new()
        .with(".sidebar a", FakeElement::visible().with_text("Fotbal"))
        .with(".sidebar a", FakeElement::visible().with_text("Tenis"));
    page.fail_clicks(".sidebar a", 1);
    page.on_click_navigate(".sidebar a", "https://superbet.ro/pariuri-sportive/tenis");
    let (page, driver) = common::shared(page);
    // RETRY_COUNT=2: three attempts
    let sport = SportPage::new(BasePage::new(driver, &Settings::default()));

    sport.click_sub_page_link(1).await.unwrap();

    assert_eq!(page.clicks().len(), 1);
    assert!(page.clicks()[0].starts_with(".sidebar a >> nth=1"));
    assert!(sport.verify_url(&UrlPattern::from("/tenis")));
}

#[tokio::test(start_paused = true)]
async fn test_sport_required_buttons() {
    let calendar = LocatorExpression::test_id("calendar").to_selector();
    let page = FakePage::new()
        .with(".left-sidebar", FakeElement::visible())
        .with("button:has-text(\"Social Nou\")", FakeElement::visible())
        .with(&calendar, FakeElement::visible())
        .with("button:has-text(\"Competiții\")", FakeElement::visible().disabled());
    let (_page, driver) = common::shared(page);
    let sport = SportPage::new(BasePage::new(driver, &settings()));

    assert!(sport.verify_sidebar_exists().await);
    let buttons = sport.verify_required_buttons().await;
    assert!(buttons.social_nou && buttons.calendar && buttons.competitii);
    assert!(buttons.all_present());

    // Visible but disabled is not clickable
    assert!(!sport.verify_buttons_are_clickable().await);
}

#[tokio::test(start_paused = true)]
async fn test_sport_empty_sidebar() {
    let (_page, driver) = common::shared(FakePage::new());
    let sport = SportPage::new(BasePage::new(driver, &settings()));

    assert!(sport.sub_page_links().await.unwrap().is_empty());
    assert!(!sport.verify_sidebar_exists().await);
    assert!(!sport.verify_required_buttons().await.all_present());
}

// ============================================================================
// LivePage
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_live_page_toate_navigation() {
    let toate = "a[href*=\"/pariuri-sportive/astazi\"]";
    let page = FakePage::new()
        .with("body", FakeElement::visible())
        .with(".left-sidebar", FakeElement::visible())
        .with(toate, FakeElement::visible().with_text("Toate"))
        .with("a:has-text(\"Fotbal\")", FakeElement::visible());
    page.on_click_navigate(toate, "https://superbet.ro/pariuri-sportive/astazi");
    let (page, driver) = common::shared(page);
    let live = LivePage::new(BasePage::new(driver, &settings()));

    live.navigate().await.unwrap();
    assert_eq!(
        page.navigations()[0].0,
        "https://superbet.ro/pariuri-sportive/live"
    );
    assert!(live.verify_sidebar_exists().await);
    assert!(live.verify_toate_link_present().await);
    assert!(live.verify_fotbal_link_present().await);
    assert!(live.verify_toate_link_navigation().await);
    assert!(live.verify_url(&UrlPattern::from("/astazi")));
}

#[tokio::test(start_paused = true)]
async fn test_live_page_missing_link() {
    let (_page, driver) = common::shared(FakePage::new());
    let live = LivePage::new(BasePage::new(driver, &settings()));

    assert!(!live.verify_toate_link_present().await);
    assert!(!live.verify_toate_link_navigation().await);
    assert!(live.click_fotbal_link().await.unwrap_err().is_not_found());
}
