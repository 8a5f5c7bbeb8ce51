// HeaderComponent - Site header navigation

use super::BaseComponent;
use crate::catalog::{Catalog, header};
use crate::error::Result;
use crate::facade::ElementFacade;
use crate::wait::{DEFAULT_EXISTENCE_TIMEOUT, DEFAULT_VISIBLE_TIMEOUT, UrlPattern};
use std::collections::BTreeMap;
use std::time::Duration;

/// How long a header link may take to change the URL.
const LINK_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HeaderComponent {
    component: BaseComponent,
    catalog: Catalog,
}

impl HeaderComponent {
    pub fn new(facade: ElementFacade) -> Self {
        Self {
            component: BaseComponent::new(facade, header::root()),
            catalog: header::catalog(),
        }
    }

    pub fn component(&self) -> &BaseComponent {
        &self.component
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Clicks the header element named `name` (see [`crate::catalog::header`]).
    pub async fn click_link(&self, name: &str) -> Result<()> {
        let element = self.catalog.get(name)?;
        self.component.click(element, DEFAULT_VISIBLE_TIMEOUT).await
    }

    pub async fn click_sport_link(&self) -> Result<()> {
        self.click_link(header::SPORT_LINK).await
    }

    pub async fn click_live_link(&self) -> Result<()> {
        self.click_link(header::LIVE_LINK).await
    }

    pub async fn click_supersocial_link(&self) -> Result<()> {
        self.click_link(header::SUPERSOCIAL_LINK).await
    }

    pub async fn click_bilete_mele_link(&self) -> Result<()> {
        self.click_link(header::BILETELE_MELE_LINK).await
    }

    pub async fn click_casino_link(&self) -> Result<()> {
        self.click_link(header::CASINO_LINK).await
    }

    pub async fn click_casino_live_link(&self) -> Result<()> {
        self.click_link(header::CASINO_LIVE_LINK).await
    }

    pub async fn click_search_icon(&self) -> Result<()> {
        self.click_link(header::SEARCH_ICON).await
    }

    pub async fn click_user_profile_icon(&self) -> Result<()> {
        self.click_link(header::USER_PROFILE_ICON).await
    }

    pub async fn click_register_button(&self) -> Result<()> {
        self.click_link(header::REGISTER_BUTTON).await
    }

    pub async fn click_login_button(&self) -> Result<()> {
        self.click_link(header::LOGIN_BUTTON).await
    }

    /// Visibility of every header element, keyed by element name.
    pub async fn verify_all_links_present(&self) -> BTreeMap<String, bool> {
        let mut results = BTreeMap::new();
        for element in self.catalog.iter() {
            let visible = self
                .component
                .is_element_visible(element, DEFAULT_EXISTENCE_TIMEOUT)
                .await;
            results.insert(element.name().to_string(), visible);
        }
        results
    }

    /// Clicks `name` and reports whether the URL then matches `expected`.
    pub async fn verify_link_navigation(&self, name: &str, expected: &UrlPattern) -> bool {
        if let Err(e) = self.click_link(name).await {
            tracing::debug!(link = name, error = %e, "header link click failed");
            return false;
        }
        self.component
            .facade()
            .waiter()
            .wait_for_url(expected, LINK_NAVIGATION_TIMEOUT)
            .await
            .is_ok()
    }
}
