// Overlay - Consent overlay dismissal as an explicit state machine
//
// One attempt walks Probe -> Dismiss -> Verify (-> Escape -> Verify) -> Done.
// Every transition lives in `step`, so the flow reads as a table rather than
// nested fallbacks. Attempts repeat because overlays reappear while the page
// hydrates; each one restarts from `OverlayState::Unknown`.
//
// Dismissal never fails the caller. Engine errors end the attempt as
// unconfirmed, and an overlay that was seen but never confirmed gone gets the
// consent cookies injected directly.

use crate::catalog::{LogicalElement, consent};
use crate::driver::{Cookie, SharedDriver};
use crate::error::Result;
use crate::locator::{Locator, Scope};
use crate::resolver::FallbackResolver;
use crate::wait::{Deadline, WaitCondition, Waiter};
use std::time::Duration;

/// Cookie domain used when no base URL is configured.
pub const DEFAULT_CONSENT_DOMAIN: &str = ".superbet.ro";

/// Default number of dismissal attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Observed state of the consent overlay.
///
/// Only [`OverlayController`] moves between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Unknown,
    Visible,
    Dismissed,
    Absent,
}

/// How a dismissal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// The overlay was seen and confirmed hidden
    Dismissed,
    /// No overlay appeared on any attempt; nothing was clicked
    Absent,
    /// UI dismissal failed; consent cookies were injected instead
    Forced,
    /// The overlay was seen, never confirmed hidden, and no cookies were configured
    Unconfirmed,
}

impl DismissOutcome {
    /// True only when the overlay was confirmed hidden.
    pub fn is_dismissed(&self) -> bool {
        matches!(self, DismissOutcome::Dismissed)
    }
}

/// Selectors, timeouts and fallback cookies for consent dismissal.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    /// Overlay containers, most specific first
    pub overlay: LogicalElement,
    /// Accept affordances, most specific first
    pub accept: LogicalElement,
    /// Budget for finding the overlay on entry (3s)
    pub probe_timeout: Duration,
    /// Per-click timeout (5s)
    pub click_timeout: Duration,
    /// Wait for the container to hide after a click (10s)
    pub hide_timeout: Duration,
    /// Wait for the container to hide after Escape (2s)
    pub escape_hide_timeout: Duration,
    /// Wait for the overlay to come back between attempts (1s)
    pub reappear_timeout: Duration,
    /// Injected when UI dismissal is exhausted
    pub cookies: Vec<Cookie>,
}

impl ConsentConfig {
    /// Default selectors and timeouts with consent cookies for `domain`.
    pub fn for_domain(domain: &str) -> Self {
        Self {
            overlay: consent::overlay(),
            accept: consent::accept_button(),
            probe_timeout: Duration::from_secs(3),
            click_timeout: Duration::from_secs(5),
            hide_timeout: Duration::from_secs(10),
            escape_hide_timeout: Duration::from_secs(2),
            reappear_timeout: Duration::from_secs(1),
            cookies: consent_cookies(domain),
        }
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self::for_domain(DEFAULT_CONSENT_DOMAIN)
    }
}

/// Cookies a consent manager sets once the user accepted everything.
pub fn consent_cookies(domain: &str) -> Vec<Cookie> {
    [
        ("cookie_consent", "accepted"),
        ("cookieConsent", "true"),
        ("consent", "accepted"),
    ]
    .into_iter()
    .map(|(name, value)| Cookie::session(name, value, domain))
    .collect()
}

/// How the last dismissal was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Via {
    Click,
    Escape,
}

/// Result of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Dismissed,
    Absent,
    Unconfirmed,
}

#[derive(Debug, Clone)]
enum Phase {
    Probe,
    /// Try accept candidates ranked at or after `next`
    Dismiss { container: Locator, next: usize },
    Verify { container: Locator, via: Via },
    Escape { container: Locator },
    Done(Attempt),
}

/// Detects and dismisses a blocking consent overlay.
///
/// Holds no page state between runs beyond the last observed
/// [`OverlayState`]; run it after every navigation.
#[derive(Debug)]
pub struct OverlayController {
    waiter: Waiter,
    resolver: FallbackResolver,
    config: ConsentConfig,
    state: OverlayState,
}

impl OverlayController {
    pub fn new(driver: SharedDriver) -> Self {
        Self::with_config(driver, ConsentConfig::default())
    }

    pub fn with_config(driver: SharedDriver, config: ConsentConfig) -> Self {
        let waiter = Waiter::new(driver);
        Self {
            resolver: FallbackResolver::new(waiter.clone()),
            waiter,
            config,
            state: OverlayState::Unknown,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    /// Runs up to `max_retries` attempts (at least one).
    ///
    /// Falls back to cookie injection only when the overlay was visible on the
    /// last attempt and could not be confirmed hidden.
    pub async fn dismiss(&mut self, max_retries: u32) -> DismissOutcome {
        let attempts = max_retries.max(1);
        let mut last = Attempt::Absent;

        for attempt in 0..attempts {
            last = self.run_attempt().await;
            tracing::debug!(attempt, result = ?last, "consent attempt finished");

            if last == Attempt::Dismissed {
                tracing::info!(attempt, "consent overlay dismissed");
                return DismissOutcome::Dismissed;
            }

            if attempt + 1 < attempts {
                self.wait_for_reappearance().await;
            }
        }

        match last {
            Attempt::Absent => {
                tracing::debug!("no consent overlay present");
                DismissOutcome::Absent
            }
            _ if self.config.cookies.is_empty() => DismissOutcome::Unconfirmed,
            _ => {
                self.force_accept().await;
                DismissOutcome::Forced
            }
        }
    }

    async fn run_attempt(&mut self) -> Attempt {
        self.state = OverlayState::Unknown;
        let mut phase = Phase::Probe;

        loop {
            phase = match self.step(phase).await {
                Ok(Phase::Done(attempt)) => return attempt,
                Ok(next) => next,
                Err(e) => {
                    tracing::debug!(error = %e, "consent attempt aborted");
                    return Attempt::Unconfirmed;
                }
            };
        }
    }

    /// Transition function of the dismissal state machine.
    async fn step(&mut self, phase: Phase) -> Result<Phase> {
        match phase {
            Phase::Probe => {
                let deadline = Deadline::after(self.config.probe_timeout);
                match self
                    .resolver
                    .find_within(&Scope::Page, &self.config.overlay, &deadline)
                    .await
                {
                    Some(found) => {
                        self.state = OverlayState::Visible;
                        tracing::info!(selector = found.locator.selector(), "consent overlay visible");
                        Ok(Phase::Dismiss {
                            container: found.locator,
                            next: 0,
                        })
                    }
                    None => {
                        self.state = OverlayState::Absent;
                        Ok(Phase::Done(Attempt::Absent))
                    }
                }
            }

            Phase::Dismiss { container, next } => {
                let Some(button) = self
                    .resolver
                    .find_after(&Scope::Page, &self.config.accept, next)
                    .await
                else {
                    tracing::debug!("no accept button clicked, trying Escape");
                    return Ok(Phase::Escape { container });
                };

                match self
                    .waiter
                    .driver()
                    .click(button.locator.selector(), self.config.click_timeout)
                    .await
                {
                    Ok(()) => {
                        tracing::debug!(selector = button.locator.selector(), "accept button clicked");
                        Ok(Phase::Verify {
                            container,
                            via: Via::Click,
                        })
                    }
                    Err(e) => {
                        tracing::debug!(selector = button.locator.selector(), error = %e, "accept click failed");
                        Ok(Phase::Dismiss {
                            container,
                            next: button.index + 1,
                        })
                    }
                }
            }

            Phase::Verify { container, via } => {
                let timeout = match via {
                    Via::Click => self.config.hide_timeout,
                    Via::Escape => self.config.escape_hide_timeout,
                };
                match self
                    .waiter
                    .wait_for(&container, WaitCondition::Hidden, timeout)
                    .await
                {
                    Ok(()) => {
                        self.state = OverlayState::Dismissed;
                        Ok(Phase::Done(Attempt::Dismissed))
                    }
                    Err(e) if via == Via::Click => {
                        tracing::debug!(error = %e, "overlay still visible after click");
                        Ok(Phase::Escape { container })
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "overlay still visible after Escape");
                        Ok(Phase::Done(Attempt::Unconfirmed))
                    }
                }
            }

            Phase::Escape { container } => {
                self.waiter.driver().press_key("Escape").await?;
                Ok(Phase::Verify {
                    container,
                    via: Via::Escape,
                })
            }

            Phase::Done(attempt) => Ok(Phase::Done(attempt)),
        }
    }

    async fn wait_for_reappearance(&self) {
        let deadline = Deadline::after(self.config.reappear_timeout);
        let found = self
            .resolver
            .find_within(&Scope::Page, &self.config.overlay, &deadline)
            .await;
        tracing::debug!(reappeared = found.is_some(), "waited for overlay before re-probing");
    }

    /// Injects the configured consent cookies one by one, ignoring rejects.
    async fn force_accept(&self) {
        tracing::warn!(
            overlay = self.config.overlay.name(),
            selectors = ?self.config.accept.selectors(),
            "consent overlay could not be dismissed through the UI, injecting consent cookies"
        );

        for cookie in &self.config.cookies {
            if let Err(e) = self
                .waiter
                .driver()
                .add_cookies(std::slice::from_ref(cookie))
                .await
            {
                tracing::debug!(cookie = %cookie.name, domain = %cookie.domain, error = %e, "cookie rejected");
            }
        }
    }
}

/// Dismisses the default consent overlay on `driver`.
///
/// Returns true only when the overlay was seen and confirmed hidden. Never
/// fails.
pub async fn dismiss(driver: SharedDriver, max_retries: u32) -> bool {
    OverlayController::new(driver)
        .dismiss(max_retries)
        .await
        .is_dismissed()
}
