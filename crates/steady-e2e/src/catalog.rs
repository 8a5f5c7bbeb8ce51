// Catalog - Named logical elements with ordered fallback selectors
//
// A LogicalElement decouples a stable name ("acceptButton") from the selectors
// that find it today. Order encodes preference: the resolver tries the
// primary expression first and each fallback after it.

use crate::error::{Error, Result};
use crate::locator::LocatorExpression;

/// A named UI element with one or more candidate expressions.
///
/// Non-empty by construction: there is always a primary expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalElement {
    name: String,
    primary: LocatorExpression,
    fallbacks: Vec<LocatorExpression>,
}

impl LogicalElement {
    /// Creates an element with a single candidate.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let login = LogicalElement::new("loginButton", "[data-testid=login]").or("text=Login");
    /// ```
    pub fn new(name: impl Into<String>, primary: impl Into<LocatorExpression>) -> Self {
        Self {
            name: name.into(),
            primary: primary.into(),
            fallbacks: Vec::new(),
        }
    }

    /// Builds an element from an ordered candidate list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `candidates` is empty.
    pub fn try_new<I, E>(name: impl Into<String>, candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<LocatorExpression>,
    {
        let name = name.into();
        let mut iter = candidates.into_iter().map(Into::into);
        let primary = iter.next().ok_or_else(|| {
            Error::InvalidArgument(format!("logical element '{}' has no candidates", name))
        })?;
        Ok(Self {
            name,
            primary,
            fallbacks: iter.collect(),
        })
    }

    /// Appends a lower-preference fallback.
    pub fn or(mut self, fallback: impl Into<LocatorExpression>) -> Self {
        self.fallbacks.push(fallback.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidates in preference order.
    pub fn candidates(&self) -> impl Iterator<Item = &LocatorExpression> {
        std::iter::once(&self.primary).chain(self.fallbacks.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.fallbacks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Rendered selectors in preference order, for diagnostics.
    pub fn selectors(&self) -> Vec<String> {
        self.candidates().map(LocatorExpression::to_selector).collect()
    }
}

/// A named collection of logical elements.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    elements: Vec<LogicalElement>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an element.
    pub fn with(mut self, element: LogicalElement) -> Self {
        self.elements.retain(|existing| existing.name() != element.name());
        self.elements.push(element);
        self
    }

    /// Looks up an element by name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for names the catalog does not declare.
    pub fn get(&self, name: &str) -> Result<&LogicalElement> {
        self.elements
            .iter()
            .find(|element| element.name() == name)
            .ok_or_else(|| Error::InvalidArgument(format!("no logical element named '{}'", name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogicalElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ============================================================================
// Built-in catalogs
// ============================================================================

/// OneTrust consent overlay.
pub mod consent {
    use super::LogicalElement;

    /// Overlay containers, most specific first.
    pub fn overlay() -> LogicalElement {
        LogicalElement::new("consentOverlay", "#onetrust-consent-sdk")
            .or("#onetrust-banner-sdk")
            .or(".onetrust-pc-sdk")
            .or("[id*=\"onetrust\"]")
            .or("[class*=\"onetrust\"]")
            .or("[data-testid*=\"cookie\"]")
            .or("[id*=\"cookie\"]")
            .or("[class*=\"cookie\"]")
            .or("[class*=\"consent\"]")
    }

    /// "Accept all" affordances, most specific first.
    pub fn accept_button() -> LogicalElement {
        LogicalElement::new("acceptButton", "#onetrust-accept-btn-handler")
            .or("button:has-text(\"Acceptați toate cookie-urile\")")
            .or("button:has-text(\"Acceptă toate\")")
            .or("button:has-text(\"Accept All\")")
            .or("button:has-text(\"Accept\")")
            .or("button:has-text(\"Acceptă\")")
            .or("[id*=\"onetrust-accept\"]")
            .or("[id*=\"accept\"]")
    }

    pub fn reject_all_button() -> LogicalElement {
        LogicalElement::new("rejectAllButton", "#onetrust-reject-all-handler")
    }

    pub fn settings_button() -> LogicalElement {
        LogicalElement::new("cookieSettingsButton", "#onetrust-pc-btn-handler")
    }
}

/// Site header navigation.
pub mod header {
    use super::{Catalog, LogicalElement};
    use crate::locator::LocatorExpression;

    pub const SPORT_LINK: &str = "sportLink";
    pub const LIVE_LINK: &str = "liveLink";
    pub const SUPERSOCIAL_LINK: &str = "supersocialLink";
    pub const BILETELE_MELE_LINK: &str = "bileteleMeleLink";
    pub const CASINO_LINK: &str = "casinoLink";
    pub const CASINO_LIVE_LINK: &str = "casinoLiveLink";
    pub const SEARCH_ICON: &str = "searchIcon";
    pub const USER_PROFILE_ICON: &str = "userProfileIcon";
    pub const REGISTER_BUTTON: &str = "registerButton";
    pub const LOGIN_BUTTON: &str = "loginButton";

    /// Header root container.
    pub fn root() -> LogicalElement {
        LogicalElement::new("header", "header")
            .or(LocatorExpression::test_id("header"))
            .or("nav")
    }

    pub fn catalog() -> Catalog {
        Catalog::new()
            .with(LogicalElement::new(
                SPORT_LINK,
                "a[href*=\"/pariuri-sportive\"]:not([href*=\"/live\"])",
            ))
            .with(LogicalElement::new(
                LIVE_LINK,
                "a[href*=\"/pariuri-sportive/live\"]",
            ))
            .with(LogicalElement::new(
                SUPERSOCIAL_LINK,
                "a[href*=\"/social/noutati\"]",
            ))
            .with(LogicalElement::new(
                BILETELE_MELE_LINK,
                "a[href*=\"/pariurile-mele/deschise\"]",
            ))
            .with(LogicalElement::new(
                CASINO_LINK,
                "a[href*=\"/casino\"]:not([href*=\"/casino-live\"])",
            ))
            .with(LogicalElement::new(
                CASINO_LIVE_LINK,
                "a[href*=\"/casino/casino-live\"]",
            ))
            .with(
                LogicalElement::new(SEARCH_ICON, LocatorExpression::test_id("search-icon"))
                    .or(".search-icon")
                    .or("button[aria-label*=\"search\" i]"),
            )
            .with(LogicalElement::new(
                USER_PROFILE_ICON,
                "button[aria-label*=\"Toggle user dropdown\"]",
            ))
            .with(LogicalElement::new(
                REGISTER_BUTTON,
                "//*[text()=\"înregistrare\"]",
            ))
            .with(LogicalElement::new(
                LOGIN_BUTTON,
                "//*[text()=\"Intră în cont\"]",
            ))
    }
}

/// Sport betting page.
pub mod sport {
    use super::LogicalElement;
    use crate::locator::LocatorExpression;

    pub fn left_sidebar() -> LogicalElement {
        LogicalElement::new("leftSidebar", ".left-sidebar")
    }

    /// Sidebar links; matched as a list rather than a single element.
    pub fn sub_page_links() -> LogicalElement {
        LogicalElement::new("subPageLinks", ".sidebar a")
            .or("[data-testid=\"sidebar\"] a")
            .or("aside a")
    }

    pub fn social_nou_button() -> LogicalElement {
        LogicalElement::new("socialNouButton", "button:has-text(\"Social Nou\")")
            .or(LocatorExpression::test_id("social-nou"))
    }

    pub fn calendar_button() -> LogicalElement {
        LogicalElement::new("calendarButton", "button:has-text(\"Calendar\")")
            .or(LocatorExpression::test_id("calendar"))
    }

    pub fn competitii_button() -> LogicalElement {
        LogicalElement::new("competitiiButton", "button:has-text(\"Competiții\")")
            .or(LocatorExpression::test_id("competitii"))
    }
}

/// Live betting page.
pub mod live {
    use super::LogicalElement;

    pub fn left_sidebar() -> LogicalElement {
        LogicalElement::new("leftSidebar", ".left-sidebar")
    }

    pub fn toate_link() -> LogicalElement {
        LogicalElement::new("toateLink", "a[href*=\"/pariuri-sportive/astazi\"]")
            .or("a:has-text(\"Toate\")")
    }

    pub fn fotbal_link() -> LogicalElement {
        LogicalElement::new("fotbalLink", "a:has-text(\"Fotbal\")").or("a[href*=\"/fotbal\"]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_keep_declared_order() {
        let element = LogicalElement::new("loginButton", "[data-testid=login]").or("text=Login");
        let selectors = element.selectors();
        assert_eq!(selectors, vec!["[data-testid=login]", "text=Login"]);
        assert_eq!(element.len(), 2);
        assert!(!element.is_empty());
    }

    #[test]
    fn test_try_new_rejects_empty() {
        let empty: Vec<&str> = Vec::new();
        let result = LogicalElement::try_new("nothing", empty);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let ok = LogicalElement::try_new("two", ["#a", "#b"]).unwrap();
        assert_eq!(ok.selectors(), vec!["#a", "#b"]);
    }

    #[test]
    fn test_catalog_lookup_and_replace() {
        let catalog = header::catalog();
        assert_eq!(catalog.len(), 10);
        assert_eq!(
            catalog.get(header::SEARCH_ICON).unwrap().len(),
            3,
            "search icon keeps all three fallbacks"
        );
        assert!(catalog.get("missing").is_err());

        let replaced = catalog.with(LogicalElement::new(header::LOGIN_BUTTON, "text=Login"));
        assert_eq!(replaced.len(), 10);
        assert_eq!(
            replaced.get(header::LOGIN_BUTTON).unwrap().selectors(),
            vec!["text=Login"]
        );
    }

    #[test]
    fn test_consent_catalog_prefers_onetrust() {
        let accept = consent::accept_button();
        assert_eq!(
            accept.candidates().next(),
            Some(&LocatorExpression::css("#onetrust-accept-btn-handler"))
        );
        assert_eq!(
            consent::overlay().selectors().first().map(String::as_str),
            Some("#onetrust-consent-sdk")
        );
    }
}
