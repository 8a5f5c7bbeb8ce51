// PlaywrightPage - PageDriver over a playwright-rs Page
//
// Selectors are passed straight to `Page::locator`; chaining and `nth=` are
// already in Playwright syntax. Query methods map to the locator's
// non-waiting state checks.

use super::{Cookie, LoadState, PageDriver};
use crate::error::{Error, Result};
use async_trait::async_trait;
use playwright_rs::{
    ClickOptions, FillOptions, GotoOptions, Page, ScreenshotOptions, WaitUntil,
};
use std::time::Duration;
use tokio::time::Instant;

/// Poll interval of `wait_for_load_state`.
const READY_STATE_POLL: Duration = Duration::from_millis(100);

/// Playwright treats a zero timeout as "no timeout".
fn timeout_ms(timeout: Duration) -> f64 {
    (timeout.as_millis() as f64).max(1.0)
}

/// A browsing context driven by Playwright.
#[derive(Clone)]
pub struct PlaywrightPage {
    page: Page,
}

impl PlaywrightPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// The underlying Playwright page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn ready_state(&self) -> Result<String> {
        let value = self.page.evaluate_value("document.readyState").await?;
        Ok(value.trim_matches('"').to_string())
    }
}

impl std::fmt::Debug for PlaywrightPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaywrightPage")
            .field("url", &self.page.url())
            .finish()
    }
}

#[async_trait]
impl PageDriver for PlaywrightPage {
    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.locator(selector).await.count().await?)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        Ok(self.page.locator(selector).await.is_visible().await?)
    }

    async fn is_enabled(&self, selector: &str) -> Result<bool> {
        Ok(self.page.locator(selector).await.is_enabled().await?)
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<()> {
        let options = ClickOptions::builder().timeout(timeout_ms(timeout)).build();
        Ok(self
            .page
            .locator(selector)
            .await
            .click(Some(options))
            .await?)
    }

    async fn fill(&self, selector: &str, value: &str, timeout: Duration) -> Result<()> {
        let options = FillOptions::builder().timeout(timeout_ms(timeout)).build();
        Ok(self
            .page
            .locator(selector)
            .await
            .fill(value, Some(options))
            .await?)
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.page.locator(selector).await.text_content().await?)
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .page
            .locator(selector)
            .await
            .get_attribute(name)
            .await?)
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        Ok(self.page.keyboard().press(key, None).await?)
    }

    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()> {
        let wait_until = match wait_until {
            LoadState::Load => WaitUntil::Load,
            LoadState::DomContentLoaded => WaitUntil::DomContentLoaded,
        };
        let options = GotoOptions::new().timeout(timeout).wait_until(wait_until);
        self.page
            .goto(url, Some(options))
            .await
            .map_err(|e| Error::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            let ready = self.ready_state().await?;
            let reached = match state {
                LoadState::Load => ready == "complete",
                LoadState::DomContentLoaded => ready == "interactive" || ready == "complete",
            };
            if reached {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(Error::Navigation {
                    url: self.page.url(),
                    reason: format!("'{}' not reached within {:?} (readyState {})", state, timeout, ready),
                });
            }
            tokio::time::sleep(READY_STATE_POLL).await;
        }
    }

    fn url(&self) -> String {
        self.page.url()
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>> {
        let options = ScreenshotOptions::builder().full_page(full_page).build();
        Ok(self.page.screenshot(Some(options)).await?)
    }

    async fn add_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        let cookies: Vec<playwright_rs::Cookie> = cookies
            .iter()
            .map(|c| playwright_rs::Cookie {
                name: c.name.clone(),
                value: c.value.clone(),
                domain: c.domain.clone(),
                path: c.path.clone(),
                expires: c.expires,
                http_only: c.http_only,
                secure: c.secure,
                same_site: None,
            })
            .collect();
        Ok(self.page.context()?.add_cookies(&cookies).await?)
    }
}
