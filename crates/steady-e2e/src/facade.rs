// Facade - High-level element actions over logical elements
//
// Every action resolves its logical element afresh in the facade's scope,
// waits for actionability and then acts, all under one deadline per attempt.
// Mutating actions (click, fill) run under the retry policy and propagate
// failures; `is_visible` degrades every failure to `false`.

use crate::catalog::LogicalElement;
use crate::driver::SharedDriver;
use crate::error::Result;
use crate::locator::{Locator, Scope};
use crate::resolver::{FallbackResolver, Resolved};
use crate::retry::{RetryPolicy, retry_exhausted};
use crate::wait::{Deadline, WaitCondition, Waiter};
use std::time::Duration;

/// Default retry for clicks and fills: three attempts, 500ms apart.
pub const DEFAULT_ACTION_ATTEMPTS: u32 = 3;
pub const DEFAULT_ACTION_DELAY: Duration = Duration::from_millis(500);

/// Stateless composer of resolve, wait and act.
///
/// Cheap to clone; holds only the driver handle, the scope and the policies.
#[derive(Debug, Clone)]
pub struct ElementFacade {
    scope: Scope,
    waiter: Waiter,
    resolver: FallbackResolver,
    retry: RetryPolicy,
}

impl ElementFacade {
    /// A page-scoped facade with default timeouts and retry.
    pub fn new(driver: SharedDriver) -> Self {
        let waiter = Waiter::new(driver);
        Self {
            scope: Scope::Page,
            resolver: FallbackResolver::new(waiter.clone()),
            waiter,
            retry: RetryPolicy::fixed(DEFAULT_ACTION_ATTEMPTS, DEFAULT_ACTION_DELAY),
        }
    }

    /// Same facade, scoped to the subtree of `root`.
    pub fn within(&self, root: Locator) -> Self {
        Self {
            scope: Scope::Within(root),
            ..self.clone()
        }
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Sets the per-candidate probe of the resolver.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.resolver = self.resolver.with_probe_timeout(timeout);
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn driver(&self) -> &SharedDriver {
        self.waiter.driver()
    }

    pub fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// Resolves `element` to its first visible candidate within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` listing every selector tried.
    pub async fn resolve(&self, element: &LogicalElement, timeout: Duration) -> Result<Resolved> {
        self.resolver.require(&self.scope, element, timeout).await
    }

    /// Clicks `element` once it is visible and enabled.
    ///
    /// Each attempt gets the full `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `RetryExhausted` wrapping the last `ElementNotFound`, `Timeout`
    /// or driver error when every attempt failed.
    pub async fn click(&self, element: &LogicalElement, timeout: Duration) -> Result<()> {
        retry_exhausted(&self.retry, || self.click_once(element, timeout)).await
    }

    /// Replaces the value of `element` once it is visible.
    pub async fn fill(&self, element: &LogicalElement, value: &str, timeout: Duration) -> Result<()> {
        retry_exhausted(&self.retry, || self.fill_once(element, value, timeout)).await
    }

    /// Text content of `element`; empty when the element has none.
    pub async fn get_text(&self, element: &LogicalElement, timeout: Duration) -> Result<String> {
        let resolved = self.resolve(element, timeout).await?;
        let text = self
            .driver()
            .text_content(resolved.locator.selector())
            .await?;
        Ok(text.unwrap_or_default())
    }

    pub async fn get_attribute(
        &self,
        element: &LogicalElement,
        name: &str,
        timeout: Duration,
    ) -> Result<Option<String>> {
        let resolved = self.resolve(element, timeout).await?;
        self.driver()
            .get_attribute(resolved.locator.selector(), name)
            .await
    }

    /// Whether any candidate of `element` becomes visible within `timeout`.
    ///
    /// Never fails: a missing element, a timeout or a malformed selector all
    /// read as `false`.
    pub async fn is_visible(&self, element: &LogicalElement, timeout: Duration) -> bool {
        self.resolver
            .find_within(&self.scope, element, &Deadline::after(timeout))
            .await
            .is_some()
    }

    async fn click_once(&self, element: &LogicalElement, timeout: Duration) -> Result<()> {
        let deadline = Deadline::after(timeout);
        let resolved = self
            .resolver
            .require_until(&self.scope, element, &deadline)
            .await?;
        self.waiter
            .wait_until_clickable(&resolved.locator, &deadline)
            .await?;

        tracing::debug!(element = element.name(), selector = resolved.locator.selector(), "click");
        self.driver()
            .click(resolved.locator.selector(), deadline.remaining())
            .await
            .map_err(|e| e.context(format!("Failed to click '{}'", element.name())))
    }

    async fn fill_once(&self, element: &LogicalElement, value: &str, timeout: Duration) -> Result<()> {
        let deadline = Deadline::after(timeout);
        let resolved = self
            .resolver
            .require_until(&self.scope, element, &deadline)
            .await?;
        self.waiter
            .wait_until(&resolved.locator, WaitCondition::Visible, &deadline)
            .await?;

        tracing::debug!(element = element.name(), selector = resolved.locator.selector(), "fill");
        self.driver()
            .fill(resolved.locator.selector(), value, deadline.remaining())
            .await
            .map_err(|e| e.context(format!("Failed to fill '{}'", element.name())))
    }
}
