// BaseComponent - A page region scoped to a lazily resolved root element

use crate::catalog::LogicalElement;
use crate::error::Result;
use crate::facade::ElementFacade;
use crate::locator::Locator;
use crate::wait::Deadline;
use std::time::Duration;

/// A reusable region of the page, such as the header.
///
/// The root is resolved again for every action, so a component survives
/// navigations and re-renders.
#[derive(Debug, Clone)]
pub struct BaseComponent {
    root: LogicalElement,
    facade: ElementFacade,
}

impl BaseComponent {
    /// `facade` must be page-scoped; the component narrows it to `root`.
    pub fn new(facade: ElementFacade, root: LogicalElement) -> Self {
        Self { root, facade }
    }

    pub fn root(&self) -> &LogicalElement {
        &self.root
    }

    pub fn facade(&self) -> &ElementFacade {
        &self.facade
    }

    /// Waits for the root to be visible and returns its locator.
    pub async fn wait_for_visible(&self, timeout: Duration) -> Result<Locator> {
        Ok(self.facade.resolve(&self.root, timeout).await?.locator)
    }

    pub async fn is_visible(&self, timeout: Duration) -> bool {
        self.facade.is_visible(&self.root, timeout).await
    }

    /// Whether `element` is visible inside the root. Never fails.
    pub async fn is_element_visible(&self, element: &LogicalElement, timeout: Duration) -> bool {
        let deadline = Deadline::after(timeout);
        match self.scoped(&deadline).await {
            Ok(scoped) => scoped.is_visible(element, deadline.remaining()).await,
            Err(e) => {
                tracing::debug!(root = self.root.name(), error = %e, "component root not visible");
                false
            }
        }
    }

    pub async fn click(&self, element: &LogicalElement, timeout: Duration) -> Result<()> {
        let deadline = Deadline::after(timeout);
        self.scoped(&deadline)
            .await?
            .click(element, deadline.remaining())
            .await
    }

    pub async fn fill(&self, element: &LogicalElement, value: &str, timeout: Duration) -> Result<()> {
        let deadline = Deadline::after(timeout);
        self.scoped(&deadline)
            .await?
            .fill(element, value, deadline.remaining())
            .await
    }

    pub async fn get_text(&self, element: &LogicalElement, timeout: Duration) -> Result<String> {
        let deadline = Deadline::after(timeout);
        self.scoped(&deadline)
            .await?
            .get_text(element, deadline.remaining())
            .await
    }

    async fn scoped(&self, deadline: &Deadline) -> Result<ElementFacade> {
        let root = self.facade.resolve(&self.root, deadline.remaining()).await?;
        Ok(self.facade.within(root.locator))
    }
}
