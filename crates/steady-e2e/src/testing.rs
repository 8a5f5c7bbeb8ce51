// Testing - Scripted in-memory page for unit and integration tests
//
// FakePage implements PageDriver over a table of elements keyed by selector.
// Timing uses the tokio clock, so tests under `start_paused = true` can script
// elements that appear or hide after a delay without real sleeps.
//
// Selector handling mirrors how this crate composes selectors:
// - " >> " chains are matched literally after dropping `nth=` parts, so an
//   element scoped under a root is registered as "root >> child"
// - the first `nth=i` picks the i-th registered element under that key
// - a selector containing "[[" is rejected as malformed

use crate::console::{ConsoleCapture, ConsoleKind};
use crate::driver::{Cookie, LoadState, PageDriver};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::time::Instant;

/// Bytes returned by [`FakePage::screenshot`].
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// A scripted element.
#[derive(Debug, Clone)]
pub struct FakeElement {
    visible: bool,
    enabled: bool,
    text: Option<String>,
    attributes: HashMap<String, String>,
    appear_after: Option<Duration>,
    hide_after: Option<Duration>,
    // Set on registration
    registered_at: Option<Instant>,
}

impl FakeElement {
    /// An attached, visible, enabled element.
    pub fn visible() -> Self {
        Self {
            visible: true,
            enabled: true,
            text: None,
            attributes: HashMap::new(),
            appear_after: None,
            hide_after: None,
            registered_at: None,
        }
    }

    /// An attached element that is not rendered.
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::visible()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Not attached until `delay` after registration.
    pub fn appears_after(mut self, delay: Duration) -> Self {
        self.appear_after = Some(delay);
        self
    }

    /// Stops being visible `delay` after registration.
    pub fn hides_after(mut self, delay: Duration) -> Self {
        self.hide_after = Some(delay);
        self
    }

    fn is_attached(&self, now: Instant) -> bool {
        match (self.appear_after, self.registered_at) {
            (Some(delay), Some(at)) => now >= at + delay,
            _ => true,
        }
    }

    fn is_visible(&self, now: Instant) -> bool {
        let hidden_by_timer = match (self.hide_after, self.registered_at) {
            (Some(delay), Some(at)) => now >= at + delay,
            _ => false,
        };
        self.is_attached(now) && self.visible && !hidden_by_timer
    }
}

#[derive(Debug, Default)]
struct PageState {
    elements: HashMap<String, Vec<FakeElement>>,
    click_hides: HashMap<String, Vec<String>>,
    click_navigates: HashMap<String, String>,
    escape_hides: Vec<String>,
    failing_clicks: HashMap<String, u32>,
    stalled: HashSet<String>,
    rejected_cookies: HashSet<String>,
    titles: HashMap<String, String>,
    failing_navigation: bool,

    url: String,
    title: String,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    keys: Vec<String>,
    cookies: Vec<Cookie>,
    navigations: Vec<(String, LoadState)>,
    queries: Vec<String>,
    console: Option<ConsoleCapture>,
}

/// Parsed form of a composed selector.
struct Target {
    key: String,
    index: Option<usize>,
}

fn parse_selector(selector: &str) -> Result<Target> {
    if selector.contains("[[") || selector.trim().is_empty() {
        return Err(Error::Driver(format!(
            "Unexpected token in selector '{}'",
            selector
        )));
    }

    let mut parts = Vec::new();
    let mut index = None;
    for part in selector.split(" >> ") {
        match part.strip_prefix("nth=") {
            Some(n) => {
                let n: usize = n.parse().map_err(|_| {
                    Error::Driver(format!("Invalid nth in selector '{}'", selector))
                })?;
                match index {
                    None => index = Some(n),
                    // A later nth indexes into an already single match
                    Some(_) if n == 0 => {}
                    Some(_) => index = Some(usize::MAX),
                }
            }
            None => parts.push(part),
        }
    }

    Ok(Target {
        key: parts.join(" >> "),
        index,
    })
}

/// In-memory [`PageDriver`] with scripted elements and recorded effects.
///
/// Share it as `Arc<FakePage>`; the same Arc coerces to
/// [`crate::SharedDriver`].
#[derive(Debug)]
pub struct FakePage {
    state: Mutex<PageState>,
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                url: "about:blank".to_string(),
                ..PageState::default()
            }),
        }
    }

    /// Registers an element under `selector`. Repeated calls build a list.
    pub fn with(self, selector: &str, element: FakeElement) -> Self {
        self.add(selector, element);
        self
    }

    pub fn add(&self, selector: &str, mut element: FakeElement) {
        element.registered_at = Some(Instant::now());
        self.state
            .lock()
            .elements
            .entry(selector.to_string())
            .or_default()
            .push(element);
    }

    /// Detaches every element under `selector`.
    pub fn remove(&self, selector: &str) {
        self.state.lock().elements.remove(selector);
    }

    pub fn set_visible(&self, selector: &str, visible: bool) {
        if let Some(elements) = self.state.lock().elements.get_mut(selector) {
            for element in elements {
                element.visible = visible;
            }
        }
    }

    /// Clicking `selector` hides every element under `targets`.
    pub fn on_click_hide(&self, selector: &str, targets: &[&str]) {
        self.state
            .lock()
            .click_hides
            .entry(selector.to_string())
            .or_default()
            .extend(targets.iter().map(|t| t.to_string()));
    }

    /// Clicking `selector` changes the URL to `url`.
    pub fn on_click_navigate(&self, selector: &str, url: &str) {
        self.state
            .lock()
            .click_navigates
            .insert(selector.to_string(), url.to_string());
    }

    /// Pressing Escape hides every element under `targets`.
    pub fn on_escape_hide(&self, targets: &[&str]) {
        self.state
            .lock()
            .escape_hides
            .extend(targets.iter().map(|t| t.to_string()));
    }

    /// The next `times` clicks on `selector` fail.
    pub fn fail_clicks(&self, selector: &str, times: u32) {
        self.state
            .lock()
            .failing_clicks
            .insert(selector.to_string(), times);
    }

    /// Queries against `selector` never answer.
    pub fn stall(&self, selector: &str) {
        self.state.lock().stalled.insert(selector.to_string());
    }

    pub fn reject_cookie(&self, name: &str) {
        self.state.lock().rejected_cookies.insert(name.to_string());
    }

    pub fn fail_navigation(&self, fail: bool) {
        self.state.lock().failing_navigation = fail;
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().url = url.to_string();
    }

    pub fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
    }

    /// Title the page reports after navigating to a URL containing `fragment`.
    pub fn title_for(&self, fragment: &str, title: &str) {
        self.state
            .lock()
            .titles
            .insert(fragment.to_string(), title.to_string());
    }

    /// Emits a console message to the subscribed sink, if any.
    pub fn emit_console(&self, kind: ConsoleKind, message: &str) {
        let sink = self.state.lock().console.clone();
        if let Some(sink) = sink {
            sink.record(kind, message);
        }
    }

    /// Selectors passed to successful clicks, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    /// Whether any successful click targeted `selector` (ignoring `nth=` parts).
    pub fn was_clicked(&self, selector: &str) -> bool {
        self.state
            .lock()
            .clicks
            .iter()
            .any(|clicked| parse_selector(clicked).is_ok_and(|t| t.key == selector))
    }

    pub fn fills(&self) -> Vec<(String, String)> {
        self.state.lock().fills.clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.lock().keys.clone()
    }

    pub fn cookies(&self) -> Vec<Cookie> {
        self.state.lock().cookies.clone()
    }

    pub fn navigations(&self) -> Vec<(String, LoadState)> {
        self.state.lock().navigations.clone()
    }

    /// Every selector queried through `count`/`is_visible`, in order.
    pub fn queries(&self) -> Vec<String> {
        self.state.lock().queries.clone()
    }

    fn element(&self, selector: &str) -> Result<Option<FakeElement>> {
        let target = parse_selector(selector)?;
        let now = Instant::now();
        let state = self.state.lock();
        let attached: Vec<&FakeElement> = state
            .elements
            .get(&target.key)
            .map(|elements| elements.iter().filter(|e| e.is_attached(now)).collect())
            .unwrap_or_default();
        Ok(attached.get(target.index.unwrap_or(0)).map(|e| (*e).clone()))
    }

    async fn stall_if_needed(&self, selector: &str) {
        let stalled = match parse_selector(selector) {
            Ok(target) => self.state.lock().stalled.contains(&target.key),
            Err(_) => false,
        };
        if stalled {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn count(&self, selector: &str) -> Result<usize> {
        self.state.lock().queries.push(selector.to_string());
        self.stall_if_needed(selector).await;

        let target = parse_selector(selector)?;
        let now = Instant::now();
        let state = self.state.lock();
        let attached = state
            .elements
            .get(&target.key)
            .map(|elements| elements.iter().filter(|e| e.is_attached(now)).count())
            .unwrap_or(0);
        Ok(match target.index {
            Some(i) if i < attached => 1,
            Some(_) => 0,
            None => attached,
        })
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.state.lock().queries.push(selector.to_string());
        self.stall_if_needed(selector).await;
        Ok(self
            .element(selector)?
            .is_some_and(|e| e.is_visible(Instant::now())))
    }

    async fn is_enabled(&self, selector: &str) -> Result<bool> {
        match self.element(selector)? {
            Some(element) => Ok(element.enabled),
            None => Err(Error::Driver(format!("No element matches '{}'", selector))),
        }
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> Result<()> {
        let element = self.element(selector)?;
        let key = parse_selector(selector)?.key;

        let mut state = self.state.lock();
        if let Some(remaining) = state.failing_clicks.get_mut(&key)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(Error::Driver(format!(
                "Element '{}' intercepts pointer events",
                selector
            )));
        }

        match element {
            Some(e) if e.is_visible(Instant::now()) && e.enabled => {}
            Some(_) => {
                return Err(Error::Driver(format!(
                    "Element '{}' is not visible or not enabled",
                    selector
                )));
            }
            None => {
                return Err(Error::Driver(format!("No element matches '{}'", selector)));
            }
        }

        state.clicks.push(selector.to_string());
        for target in state.click_hides.get(&key).cloned().unwrap_or_default() {
            if let Some(elements) = state.elements.get_mut(&target) {
                elements.iter_mut().for_each(|e| e.visible = false);
            }
        }
        if let Some(url) = state.click_navigates.get(&key).cloned() {
            state.url = url;
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str, _timeout: Duration) -> Result<()> {
        match self.element(selector)? {
            Some(e) if e.is_visible(Instant::now()) && e.enabled => {
                let mut state = self.state.lock();
                state.fills.push((selector.to_string(), value.to_string()));
                let key = parse_selector(selector)?.key;
                if let Some(elements) = state.elements.get_mut(&key) {
                    elements.iter_mut().for_each(|e| e.text = Some(value.to_string()));
                }
                Ok(())
            }
            _ => Err(Error::Driver(format!("Cannot fill '{}'", selector))),
        }
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        match self.element(selector)? {
            Some(element) => Ok(element.text),
            None => Err(Error::Driver(format!("No element matches '{}'", selector))),
        }
    }

    async fn get_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        match self.element(selector)? {
            Some(element) => Ok(element.attributes.get(name).cloned()),
            None => Err(Error::Driver(format!("No element matches '{}'", selector))),
        }
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.keys.push(key.to_string());
        if key == "Escape" {
            for target in state.escape_hides.clone() {
                if let Some(elements) = state.elements.get_mut(&target) {
                    elements.iter_mut().for_each(|e| e.visible = false);
                }
            }
        }
        Ok(())
    }

    async fn goto(&self, url: &str, wait_until: LoadState, _timeout: Duration) -> Result<()> {
        let mut state = self.state.lock();
        state.navigations.push((url.to_string(), wait_until));
        if state.failing_navigation {
            return Err(Error::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        state.url = url.to_string();
        let title = state
            .titles
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, title)| title.clone());
        if let Some(title) = title {
            state.title = title;
        }
        Ok(())
    }

    async fn wait_for_load_state(&self, _state: LoadState, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    async fn title(&self) -> Result<String> {
        Ok(self.state.lock().title.clone())
    }

    async fn screenshot(&self, _full_page: bool) -> Result<Vec<u8>> {
        Ok(FAKE_PNG.to_vec())
    }

    async fn add_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        let mut state = self.state.lock();
        let rejected = cookies
            .iter()
            .find(|c| state.rejected_cookies.contains(&c.name));
        if let Some(rejected) = rejected {
            return Err(Error::Driver(format!(
                "Cookie '{}' rejected for domain {}",
                rejected.name, rejected.domain
            )));
        }
        state.cookies.extend_from_slice(cookies);
        Ok(())
    }

    async fn subscribe_console(&self, sink: ConsoleCapture) -> Result<bool> {
        self.state.lock().console = Some(sink);
        Ok(true)
    }
}
