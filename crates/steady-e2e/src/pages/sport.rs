// SportPage - Sport betting landing page

use super::BasePage;
use crate::catalog::{LogicalElement, sport};
use crate::error::{Error, Result};
use crate::locator::{Locator, LocatorExpression};
use crate::wait::UrlPattern;
use serde::Serialize;

pub const SPORT_PATH: &str = "/pariuri-sportive";

/// A sidebar link with both text and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubPageLink {
    pub text: String,
    pub href: String,
}

/// Presence of the buttons every sport page must show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredButtons {
    pub social_nou: bool,
    pub calendar: bool,
    pub competitii: bool,
}

impl RequiredButtons {
    pub fn all_present(&self) -> bool {
        self.social_nou && self.calendar && self.competitii
    }
}

#[derive(Debug, Clone)]
pub struct SportPage {
    page: BasePage,
}

impl SportPage {
    pub fn new(page: BasePage) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &BasePage {
        &self.page
    }

    pub async fn navigate(&self) -> Result<()> {
        self.page.navigate(SPORT_PATH).await
    }

    pub async fn verify_sidebar_exists(&self) -> bool {
        self.page.is_visible(&sport::left_sidebar()).await
    }

    /// Sidebar links that carry both text and href, in page order.
    ///
    /// Uses the first candidate selector with any match; an empty sidebar
    /// yields an empty list.
    pub async fn sub_page_links(&self) -> Result<Vec<SubPageLink>> {
        let Some((links, count)) = self.link_list().await? else {
            return Ok(Vec::new());
        };

        let driver = self.page.driver();
        let mut result = Vec::with_capacity(count);
        for i in 0..count {
            let link = links.nth(i);
            let text = driver
                .text_content(link.selector())
                .await?
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            let href = driver
                .get_attribute(link.selector(), "href")
                .await?
                .unwrap_or_default();
            if !text.is_empty() && !href.is_empty() {
                result.push(SubPageLink { text, href });
            }
        }
        Ok(result)
    }

    /// Clicks the `index`-th sidebar link and waits for the new document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when there is no link at `index`.
    pub async fn click_sub_page_link(&self, index: usize) -> Result<()> {
        let links = match self.link_list().await? {
            Some((links, count)) if index < count => links,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "no sub-page link at index {}",
                    index
                )));
            }
        };

        let link = LogicalElement::new(
            format!("subPageLink[{}]", index),
            LocatorExpression::css(links.nth(index).selector()),
        );
        self.page.click(&link).await?;
        self.page.wait_for_page_load().await
    }

    pub async fn verify_required_buttons(&self) -> RequiredButtons {
        RequiredButtons {
            social_nou: self.page.is_visible(&sport::social_nou_button()).await,
            calendar: self.page.is_visible(&sport::calendar_button()).await,
            competitii: self.page.is_visible(&sport::competitii_button()).await,
        }
    }

    /// Whether all required buttons become clickable.
    pub async fn verify_buttons_are_clickable(&self) -> bool {
        for button in [
            sport::social_nou_button(),
            sport::calendar_button(),
            sport::competitii_button(),
        ] {
            if !self.page.is_clickable(&button).await {
                tracing::debug!(button = button.name(), "button not clickable");
                return false;
            }
        }
        true
    }

    pub fn verify_url(&self, pattern: &UrlPattern) -> bool {
        self.page.verify_url(pattern)
    }

    async fn link_list(&self) -> Result<Option<(Locator, usize)>> {
        let driver = self.page.driver();
        for expression in sport::sub_page_links().candidates() {
            let links = Locator::from_expression(expression);
            let count = driver.count(links.selector()).await?;
            if count > 0 {
                return Ok(Some((links, count)));
            }
        }
        Ok(None)
    }
}
