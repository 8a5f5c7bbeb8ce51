// Fixture - Per-test setup: console capture, navigation, overlay dismissal
//
// One TestContext per test, each with its own driver handle and console sink.
// Nothing here is process-wide, so tests can run in parallel.

use crate::config::Settings;
use crate::console::ConsoleCapture;
use crate::diagnostics;
use crate::driver::SharedDriver;
use crate::error::Result;
use crate::overlay::{ConsentConfig, DEFAULT_MAX_RETRIES, DismissOutcome, OverlayController};
use crate::pages::{BasePage, HeaderComponent, LivePage, SportPage};
use std::path::PathBuf;

/// Everything a test body needs, ready after setup.
pub struct TestContext {
    driver: SharedDriver,
    settings: Settings,
    console: ConsoleCapture,
    overlay: DismissOutcome,
}

impl TestContext {
    /// Before-each hook.
    ///
    /// Subscribes a fresh console sink, navigates to `start_path` under the
    /// base URL when given, then dismisses the consent overlay once.
    ///
    /// # Errors
    ///
    /// Only navigation failures propagate. Console subscription and overlay
    /// dismissal never fail setup.
    pub async fn setup(
        driver: SharedDriver,
        settings: Settings,
        start_path: Option<&str>,
    ) -> Result<Self> {
        let console = ConsoleCapture::new();
        match driver.subscribe_console(console.clone()).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("driver does not report console messages"),
            Err(e) => tracing::warn!(error = %e, "console capture unavailable"),
        }

        let mut context = Self {
            driver,
            settings,
            console,
            overlay: DismissOutcome::Absent,
        };

        if let Some(path) = start_path {
            context.base_page().navigate(path).await?;
        }
        context.dismiss_overlay().await;
        Ok(context)
    }

    /// Runs the consent controller; call again after every navigation.
    pub async fn dismiss_overlay(&mut self) -> DismissOutcome {
        let config = self
            .settings
            .cookie_domain()
            .map(|domain| ConsentConfig::for_domain(&domain))
            .unwrap_or_default();
        self.overlay = OverlayController::with_config(self.driver.clone(), config)
            .dismiss(DEFAULT_MAX_RETRIES)
            .await;
        self.overlay
    }

    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn console(&self) -> &ConsoleCapture {
        &self.console
    }

    /// Outcome of the most recent overlay dismissal.
    pub fn overlay_outcome(&self) -> DismissOutcome {
        self.overlay
    }

    pub fn base_page(&self) -> BasePage {
        BasePage::new(self.driver.clone(), &self.settings)
    }

    pub fn header(&self) -> HeaderComponent {
        HeaderComponent::new(self.base_page().facade().clone())
    }

    pub fn sport_page(&self) -> SportPage {
        SportPage::new(self.base_page())
    }

    pub fn live_page(&self) -> LivePage {
        LivePage::new(self.base_page())
    }

    /// Clicks the header Sport link and waits for the page.
    pub async fn sport_via_header(&self) -> Result<SportPage> {
        self.header().click_sport_link().await?;
        let sport = self.sport_page();
        sport.page().wait_for_page_load().await?;
        Ok(sport)
    }

    /// Clicks the header Live link and waits for the page.
    pub async fn live_via_header(&self) -> Result<LivePage> {
        self.header().click_live_link().await?;
        let live = self.live_page();
        live.page().wait_for_page_load().await?;
        Ok(live)
    }

    /// Saves a screenshot, plus the console log when anything was captured.
    ///
    /// Returns the screenshot path.
    pub async fn capture_failure(&self, test_name: &str) -> Result<PathBuf> {
        let dir = &self.settings.screenshot_dir;
        let screenshot = diagnostics::capture_screenshot(&self.driver, dir, test_name).await?;
        if !self.console.is_empty() {
            diagnostics::write_console_log(&self.console, dir, test_name).await?;
        }
        Ok(screenshot)
    }
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("url", &self.driver.url())
            .field("settings", &self.settings)
            .field("overlay", &self.overlay)
            .finish()
    }
}
