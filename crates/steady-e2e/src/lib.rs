//! steady-e2e: Resilient element interaction for browser end-to-end tests
//!
//! This crate sits between test bodies and a browser automation engine. It
//! finds elements through ordered fallback selectors, waits for actionability
//! against hard deadlines, retries transient failures with bounded backoff,
//! and clears cookie-consent overlays without ever failing a test on its own.
//!
//! # Overview
//!
//! - [`LogicalElement`]: a stable name plus candidate selectors in preference order
//! - [`Waiter`]: polls one locator until visible, hidden, attached or enabled
//! - [`retry()`]: re-runs a fallible async operation under a [`RetryPolicy`]
//! - [`FallbackResolver`]: picks the first candidate that is present and visible
//! - [`OverlayController`]: consent overlay dismissal as an explicit state machine
//! - [`ElementFacade`]: click, fill, read text, check visibility
//!
//! The engine is reached through the [`PageDriver`] trait. Enable the
//! `playwright` feature for an adapter over `playwright-rs`.
//!
//! # Examples
//!
//! ## Clicking through fallbacks
//!
//! ```ignore
//! use steady_e2e::{ElementFacade, LogicalElement};
//! use std::time::Duration;
//!
//! async fn login(facade: &ElementFacade) -> steady_e2e::Result<()> {
//!     let login = LogicalElement::new("loginButton", "[data-testid=login]").or("text=Login");
//!     facade.click(&login, Duration::from_secs(10)).await
//! }
//! ```
//!
//! ## Per-test setup
//!
//! ```ignore
//! use steady_e2e::{PlaywrightPage, Settings, TestContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let playwright = playwright_rs::Playwright::launch().await?;
//!     let browser = playwright.chromium().launch().await?;
//!     let page = browser.new_page().await?;
//!
//!     let settings = Settings::load()?;
//!     let ctx = TestContext::setup(Arc::new(PlaywrightPage::new(page)), settings, Some("/")).await?;
//!
//!     let links = ctx.header().verify_all_links_present().await;
//!     assert!(links.values().all(|present| *present));
//!
//!     browser.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Retrying an arbitrary operation
//!
//! ```ignore
//! use steady_e2e::{RetryPolicy, retry};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::exponential(3, Duration::from_millis(100));
//! let title = retry(&policy, || driver.title()).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod facade;
pub mod fixture;
pub mod locator;
pub mod overlay;
pub mod pages;
pub mod resolver;
pub mod retry;
pub mod wait;

// Scripted page for tests (exposed for integration tests)
#[doc(hidden)]
pub mod testing;

pub use error::{Error, Result};

pub use catalog::{Catalog, LogicalElement};
pub use config::Settings;
pub use console::{ConsoleCapture, ConsoleEntry, ConsoleKind};
pub use driver::{Cookie, LoadState, PageDriver, SharedDriver};
pub use facade::ElementFacade;
pub use fixture::TestContext;
pub use locator::{Locator, LocatorExpression, Scope};
pub use overlay::{ConsentConfig, DismissOutcome, OverlayController, OverlayState, dismiss};
pub use pages::{BaseComponent, BasePage, HeaderComponent, LivePage, SportPage};
pub use resolver::{FallbackResolver, Resolved};
pub use retry::{Backoff, RetryPolicy, retry, retry_exhausted};
pub use wait::{Deadline, UrlPattern, WaitCondition, Waiter};

#[cfg(feature = "playwright")]
pub use driver::PlaywrightPage;
