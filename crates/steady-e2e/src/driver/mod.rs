// Driver - The automation-engine seam
//
// Everything the resilience layer needs from a browser engine, addressed by
// engine selector strings. Implementations own one browsing context; nothing
// here assumes a singleton page, so parallel tests each hold their own
// `Arc<dyn PageDriver>`.
//
// Implementations:
// - `PlaywrightPage` (feature `playwright`): playwright-rs Page adapter
// - `testing::FakePage`: scripted in-memory page for tests

use crate::console::ConsoleCapture;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "playwright")]
pub mod playwright;

#[cfg(feature = "playwright")]
pub use playwright::PlaywrightPage;

/// Shared handle to a browsing context.
pub type SharedDriver = Arc<dyn PageDriver>;

/// Load state a navigation waits for.
///
/// There is intentionally no network-idle variant: pages with continuous
/// background polling never go idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The `load` event fired
    Load,
    /// The `DOMContentLoaded` event fired
    #[default]
    DomContentLoaded,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cookie to inject into the browsing context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Leading dot matches subdomains, e.g. ".example.com"
    pub domain: String,
    pub path: String,
    /// Unix timestamp in seconds; -1 for session cookies
    pub expires: f64,
    pub http_only: bool,
    pub secure: bool,
}

impl Cookie {
    /// Creates a session cookie scoped to `domain` and path `/`.
    pub fn session(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".to_string(),
            expires: -1.0,
            http_only: false,
            secure: false,
        }
    }
}

/// Operations consumed from the browser automation engine.
///
/// Every selector argument is a fully composed engine selector (see
/// [`crate::Locator::selector`]). Query methods must not wait: they report the
/// state of the DOM at call time and leave polling to [`crate::Waiter`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Whether the first match is visible. No match is `false`.
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Whether the first match is enabled.
    async fn is_enabled(&self, selector: &str) -> Result<bool>;

    /// Clicks the first match, giving up after `timeout`.
    async fn click(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Replaces the value of the first match, giving up after `timeout`.
    async fn fill(&self, selector: &str, value: &str, timeout: Duration) -> Result<()>;

    /// Text content of the first match.
    async fn text_content(&self, selector: &str) -> Result<Option<String>>;

    /// Attribute value of the first match.
    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Presses a key on the page (e.g. "Escape").
    async fn press_key(&self, key: &str) -> Result<()>;

    /// Navigates and waits for `wait_until`.
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> Result<()>;

    /// Waits until the current document reached `state`.
    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> Result<()>;

    /// Last committed URL.
    fn url(&self) -> String;

    async fn title(&self) -> Result<String>;

    /// PNG bytes of the viewport, or the whole page when `full_page` is set.
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>>;

    /// Injects cookies into the browsing context.
    async fn add_cookies(&self, cookies: &[Cookie]) -> Result<()>;

    /// Forwards browser console messages to `sink`.
    ///
    /// Returns false when the engine does not expose console events.
    async fn subscribe_console(&self, sink: ConsoleCapture) -> Result<bool> {
        let _ = sink;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_defaults() {
        let cookie = Cookie::session("consent", "accepted", ".example.com");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.expires, -1.0);

        let json = serde_json::to_value(&cookie).unwrap();
        assert_eq!(json["httpOnly"], false);
        assert_eq!(json["domain"], ".example.com");
    }

    #[test]
    fn test_load_state_names() {
        assert_eq!(LoadState::default(), LoadState::DomContentLoaded);
        assert_eq!(LoadState::Load.to_string(), "load");
    }
}
