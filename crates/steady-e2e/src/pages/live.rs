// LivePage - Live betting page

use super::BasePage;
use crate::catalog::live;
use crate::error::Result;
use crate::wait::UrlPattern;

pub const LIVE_PATH: &str = "/pariuri-sportive/live";

/// Where the "Toate" link leads.
const TOATE_PATH: &str = "/pariuri-sportive/astazi";

#[derive(Debug, Clone)]
pub struct LivePage {
    page: BasePage,
}

impl LivePage {
    pub fn new(page: BasePage) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &BasePage {
        &self.page
    }

    pub async fn navigate(&self) -> Result<()> {
        self.page.navigate(LIVE_PATH).await
    }

    pub async fn verify_sidebar_exists(&self) -> bool {
        self.page.is_visible(&live::left_sidebar()).await
    }

    pub async fn verify_toate_link_present(&self) -> bool {
        self.page.is_visible(&live::toate_link()).await
    }

    pub async fn verify_fotbal_link_present(&self) -> bool {
        self.page.is_visible(&live::fotbal_link()).await
    }

    pub async fn click_toate_link(&self) -> Result<()> {
        self.page.click(&live::toate_link()).await?;
        self.page.wait_for_page_load().await
    }

    pub async fn click_fotbal_link(&self) -> Result<()> {
        self.page.click(&live::fotbal_link()).await?;
        self.page.wait_for_page_load().await
    }

    /// Clicks "Toate" and checks that the URL moved to today's events.
    pub async fn verify_toate_link_navigation(&self) -> bool {
        match self.click_toate_link().await {
            Ok(()) => self.verify_url(&UrlPattern::from(TOATE_PATH)),
            Err(e) => {
                tracing::debug!(error = %e, "Toate link navigation failed");
                false
            }
        }
    }

    pub fn verify_url(&self, pattern: &UrlPattern) -> bool {
        self.page.verify_url(pattern)
    }
}
