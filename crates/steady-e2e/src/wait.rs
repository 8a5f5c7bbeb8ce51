// Wait - Deadline-bound condition polling
//
// Every wait is tied to an observable DOM condition and an absolute deadline.
// There is no fixed-sleep wait in this crate: the only sleeps are the poll
// interval between two probes, clipped to the time left.
//
// Composed waits (visible then enabled) share one Deadline, so their total
// never exceeds the caller's timeout.

use crate::driver::{LoadState, SharedDriver};
use crate::error::{Error, Result};
use crate::locator::Locator;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Default timeout for visibility and actionability waits.
pub const DEFAULT_VISIBLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for existence checks such as `is_visible`.
pub const DEFAULT_EXISTENCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between two probes (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default timeout for page readiness and URL waits.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Target state of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitCondition {
    /// Attached and rendered with a non-empty box
    Visible,
    /// Detached or not rendered
    Hidden,
    /// Present in the DOM, visible or not
    Attached,
    /// Present and not disabled
    Enabled,
}

impl WaitCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitCondition::Visible => "visible",
            WaitCondition::Hidden => "hidden",
            WaitCondition::Attached => "attached",
            WaitCondition::Enabled => "enabled",
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute point in time after which a wait fails.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    timeout: Duration,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
        }
    }

    /// A sub-deadline from now that ends no later than this one.
    pub fn narrowed(&self, budget: Duration) -> Deadline {
        Deadline::after(budget.min(self.remaining()))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left; zero once expired.
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.timeout
    }
}

/// URL matcher for navigation waits and checks.
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// URL contains the substring
    Contains(String),
    /// URL matches the regular expression
    Regex(regex::Regex),
}

impl UrlPattern {
    /// Compiles a regex pattern.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self> {
        regex::Regex::new(pattern)
            .map(UrlPattern::Regex)
            .map_err(|e| Error::InvalidArgument(format!("Invalid URL regex: {}", e)))
    }

    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlPattern::Contains(fragment) => url.contains(fragment.as_str()),
            UrlPattern::Regex(re) => re.is_match(url),
        }
    }
}

impl From<&str> for UrlPattern {
    fn from(fragment: &str) -> Self {
        UrlPattern::Contains(fragment.to_string())
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlPattern::Contains(fragment) => write!(f, "*{}*", fragment),
            UrlPattern::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Polls a single locator until a condition holds or a deadline passes.
#[derive(Clone)]
pub struct Waiter {
    driver: SharedDriver,
    poll_interval: Duration,
}

impl Waiter {
    pub fn new(driver: SharedDriver) -> Self {
        Self {
            driver,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets a custom poll interval.
    ///
    /// Default is 100ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Checks `condition` once, without waiting.
    pub async fn probe(&self, locator: &Locator, condition: WaitCondition) -> Result<bool> {
        let selector = locator.selector();
        match condition {
            WaitCondition::Visible => self.driver.is_visible(selector).await,
            WaitCondition::Hidden => Ok(!self.driver.is_visible(selector).await?),
            WaitCondition::Attached => Ok(self.driver.count(selector).await? > 0),
            WaitCondition::Enabled => {
                Ok(self.driver.count(selector).await? > 0
                    && self.driver.is_enabled(selector).await?)
            }
        }
    }

    /// Waits up to `timeout` for `condition`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` carrying the locator, condition and elapsed time.
    pub async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<()> {
        self.wait_until(locator, condition, &Deadline::after(timeout))
            .await
    }

    /// Waits for `condition` until `deadline`.
    ///
    /// The condition is probed at least once, even on an expired deadline. A
    /// probe that has not answered one poll interval past the deadline is
    /// abandoned.
    pub async fn wait_until(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        deadline: &Deadline,
    ) -> Result<()> {
        let mut last_error: Option<Error> = None;

        loop {
            let budget = deadline.remaining() + self.poll_interval;
            match tokio::time::timeout(budget, self.probe(locator, condition)).await {
                Ok(Ok(true)) => {
                    tracing::debug!(
                        selector = locator.selector(),
                        %condition,
                        elapsed = ?deadline.elapsed(),
                        "wait satisfied"
                    );
                    return Ok(());
                }
                Ok(Ok(false)) => {}
                Ok(Err(e)) => {
                    tracing::debug!(selector = locator.selector(), error = %e, "probe failed");
                    last_error = Some(e);
                }
                Err(_) => {
                    last_error = Some(Error::Driver(format!(
                        "probe for '{}' did not answer within {:?}",
                        locator.selector(),
                        budget
                    )));
                }
            }

            if deadline.is_expired() {
                return Err(Error::Timeout {
                    locator: locator.selector().to_string(),
                    condition,
                    elapsed: deadline.elapsed(),
                    detail: last_error
                        .map(|e| format!(" (last error: {})", e))
                        .unwrap_or_default(),
                });
            }

            tokio::time::sleep(self.poll_interval.min(deadline.remaining())).await;
        }
    }

    /// Waits up to `timeout` for the element to be visible and then enabled.
    pub async fn wait_for_clickable(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        self.wait_until_clickable(locator, &Deadline::after(timeout))
            .await
    }

    /// Visible, then enabled, under one shared deadline.
    pub async fn wait_until_clickable(&self, locator: &Locator, deadline: &Deadline) -> Result<()> {
        self.wait_until(locator, WaitCondition::Visible, deadline)
            .await?;
        self.wait_until(locator, WaitCondition::Enabled, deadline)
            .await
    }

    /// Waits until the page URL matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` with the last seen URL on timeout.
    pub async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> Result<()> {
        let deadline = Deadline::after(timeout);
        loop {
            let current = self.driver.url();
            if pattern.matches(&current) {
                return Ok(());
            }
            if deadline.is_expired() {
                return Err(Error::Navigation {
                    url: current,
                    reason: format!("URL did not match {} within {:?}", pattern, timeout),
                });
            }
            tokio::time::sleep(self.poll_interval.min(deadline.remaining())).await;
        }
    }

    /// Waits for DOM content to be loaded. Never waits for network idle.
    pub async fn wait_for_page_ready(&self, timeout: Duration) -> Result<()> {
        self.driver
            .wait_for_load_state(LoadState::DomContentLoaded, timeout)
            .await
    }
}

impl fmt::Debug for Waiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
