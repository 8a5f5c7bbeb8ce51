// Resolver - First-match resolution over ordered fallback selectors
//
// Candidates are evaluated strictly in declared order and the first one that
// is present and visible wins, so the choice is deterministic even when a
// specific test-id selector and a generic text fallback both match.
//
// Each candidate gets a short visibility probe (2s by default) so a long
// fallback list still resolves in bounded time. Engine queries are cut off
// one poll interval past that probe, so a stalled page never hangs a pass.

use crate::catalog::LogicalElement;
use crate::error::{Error, Result};
use crate::locator::{Locator, LocatorExpression, Scope};
use crate::wait::{Deadline, WaitCondition, Waiter};
use std::time::Duration;

/// Default visibility probe per candidate.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// The candidate that won resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Position of the winning candidate in preference order
    pub index: usize,
    pub expression: LocatorExpression,
    /// Scoped, first-match locator for the winning candidate
    pub locator: Locator,
}

/// Finds the first actionable candidate of a logical element.
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    waiter: Waiter,
    probe_timeout: Duration,
}

impl FallbackResolver {
    pub fn new(waiter: Waiter) -> Self {
        Self {
            waiter,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Sets the per-candidate visibility probe.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn waiter(&self) -> &Waiter {
        &self.waiter
    }

    /// One pass over all candidates. Never fails: no match is `None`.
    pub async fn find(&self, scope: &Scope, element: &LogicalElement) -> Option<Resolved> {
        self.pass(scope, element, 0, None).await
    }

    /// One pass over the candidates ranked at or after `skip`.
    ///
    /// Used to move on when acting on an earlier winner failed.
    pub async fn find_after(
        &self,
        scope: &Scope,
        element: &LogicalElement,
        skip: usize,
    ) -> Option<Resolved> {
        self.pass(scope, element, skip, None).await
    }

    /// Repeats passes until a candidate matches or `deadline` expires.
    pub async fn find_within(
        &self,
        scope: &Scope,
        element: &LogicalElement,
        deadline: &Deadline,
    ) -> Option<Resolved> {
        loop {
            if let Some(resolved) = self.pass(scope, element, 0, Some(deadline)).await {
                return Some(resolved);
            }
            if deadline.is_expired() {
                return None;
            }
            tokio::time::sleep(self.waiter.poll_interval().min(deadline.remaining())).await;
        }
    }

    /// Resolves `element` within `timeout` or fails.
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` with every attempted selector and the scope.
    pub async fn require(
        &self,
        scope: &Scope,
        element: &LogicalElement,
        timeout: Duration,
    ) -> Result<Resolved> {
        self.require_until(scope, element, &Deadline::after(timeout))
            .await
    }

    /// Resolves `element` before `deadline` or fails with `ElementNotFound`.
    pub async fn require_until(
        &self,
        scope: &Scope,
        element: &LogicalElement,
        deadline: &Deadline,
    ) -> Result<Resolved> {
        match self.find_within(scope, element, deadline).await {
            Some(resolved) => Ok(resolved),
            None => Err(Error::ElementNotFound {
                element: element.name().to_string(),
                selectors: element
                    .candidates()
                    .map(|expression| scope.locate(expression).selector().to_string())
                    .collect(),
                scope: scope.describe(),
            }),
        }
    }

    async fn pass(
        &self,
        scope: &Scope,
        element: &LogicalElement,
        skip: usize,
        deadline: Option<&Deadline>,
    ) -> Option<Resolved> {
        for (index, expression) in element.candidates().enumerate().skip(skip) {
            let budget = match deadline {
                Some(deadline) => self.probe_timeout.min(deadline.remaining()),
                None => self.probe_timeout,
            };
            let locator = scope.locate(expression);

            if self.is_candidate_actionable(&locator, budget).await {
                tracing::debug!(
                    element = element.name(),
                    index,
                    selector = locator.selector(),
                    "resolved candidate"
                );
                return Some(Resolved {
                    index,
                    expression: expression.clone(),
                    locator,
                });
            }
        }
        None
    }

    /// Present and visible within `budget`. A query that has not answered
    /// one poll interval past the budget counts as absent.
    async fn is_candidate_actionable(&self, locator: &Locator, budget: Duration) -> bool {
        let limit = budget + self.waiter.poll_interval();
        let count = tokio::time::timeout(limit, self.waiter.driver().count(locator.selector()));
        match count.await {
            Ok(Ok(0)) => false,
            Ok(Ok(_)) => self
                .waiter
                .wait_for(locator, WaitCondition::Visible, budget)
                .await
                .is_ok(),
            Ok(Err(e)) => {
                tracing::debug!(selector = locator.selector(), error = %e, "candidate query failed");
                false
            }
            Err(_) => {
                tracing::debug!(selector = locator.selector(), ?limit, "candidate query did not answer");
                false
            }
        }
    }
}
