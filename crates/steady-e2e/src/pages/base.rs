// BasePage - Navigation and page-level actions shared by page objects

use crate::catalog::LogicalElement;
use crate::config::Settings;
use crate::diagnostics;
use crate::driver::{LoadState, SharedDriver};
use crate::error::Result;
use crate::facade::ElementFacade;
use crate::locator::Locator;
use crate::wait::{
    DEFAULT_EXISTENCE_TIMEOUT, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_VISIBLE_TIMEOUT,
    UrlPattern, WaitCondition,
};
use std::path::PathBuf;
use std::time::Duration;

/// Best-effort wait for `body` after navigation.
const BODY_VISIBLE_TIMEOUT: Duration = Duration::from_secs(5);

/// A page of the site under test.
#[derive(Debug, Clone)]
pub struct BasePage {
    facade: ElementFacade,
    settings: Settings,
}

impl BasePage {
    /// Creates a page using `settings` for the base URL, retry and artifacts.
    pub fn new(driver: SharedDriver, settings: &Settings) -> Self {
        Self {
            facade: ElementFacade::new(driver).with_retry(settings.action_retry_policy()),
            settings: settings.clone(),
        }
    }

    pub fn facade(&self) -> &ElementFacade {
        &self.facade
    }

    pub fn driver(&self) -> &SharedDriver {
        self.facade.driver()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Navigates to `path` under the base URL and waits for DOM readiness.
    ///
    /// Never waits for network idle. A `body` that stays invisible is logged
    /// and ignored.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` if the engine rejects the navigation.
    pub async fn navigate(&self, path: &str) -> Result<()> {
        let url = self.settings.url_for(path);
        tracing::info!(%url, "navigate");

        self.driver()
            .goto(&url, LoadState::DomContentLoaded, DEFAULT_NAVIGATION_TIMEOUT)
            .await?;
        self.wait_for_page_load().await?;

        let body = Locator::new("body").first();
        if let Err(e) = self
            .facade
            .waiter()
            .wait_for(&body, WaitCondition::Visible, BODY_VISIBLE_TIMEOUT)
            .await
        {
            tracing::debug!(error = %e, "body not visible after navigation");
        }
        Ok(())
    }

    /// Waits for DOM content to be loaded.
    pub async fn wait_for_page_load(&self) -> Result<()> {
        self.facade
            .waiter()
            .wait_for_page_ready(DEFAULT_NAVIGATION_TIMEOUT)
            .await
    }

    pub async fn title(&self) -> Result<String> {
        self.driver().title().await
    }

    pub fn current_url(&self) -> String {
        self.driver().url()
    }

    /// Whether the current URL matches `pattern`, without waiting.
    pub fn verify_url(&self, pattern: &UrlPattern) -> bool {
        pattern.matches(&self.current_url())
    }

    pub async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> Result<()> {
        self.facade.waiter().wait_for_url(pattern, timeout).await
    }

    /// Saves a full-page screenshot under the configured screenshot directory.
    pub async fn take_screenshot(&self, name: &str) -> Result<PathBuf> {
        diagnostics::capture_screenshot(self.driver(), &self.settings.screenshot_dir, name).await
    }

    pub async fn click(&self, element: &LogicalElement) -> Result<()> {
        self.facade.click(element, DEFAULT_VISIBLE_TIMEOUT).await
    }

    pub async fn fill(&self, element: &LogicalElement, value: &str) -> Result<()> {
        self.facade.fill(element, value, DEFAULT_VISIBLE_TIMEOUT).await
    }

    pub async fn get_text(&self, element: &LogicalElement) -> Result<String> {
        self.facade.get_text(element, DEFAULT_VISIBLE_TIMEOUT).await
    }

    pub async fn is_visible(&self, element: &LogicalElement) -> bool {
        self.facade
            .is_visible(element, DEFAULT_EXISTENCE_TIMEOUT)
            .await
    }

    /// Whether `element` resolves and becomes clickable within the visibility timeout.
    pub async fn is_clickable(&self, element: &LogicalElement) -> bool {
        match self.facade.resolve(element, DEFAULT_VISIBLE_TIMEOUT).await {
            Ok(resolved) => self
                .facade
                .waiter()
                .wait_for_clickable(&resolved.locator, DEFAULT_VISIBLE_TIMEOUT)
                .await
                .is_ok(),
            Err(_) => false,
        }
    }
}
