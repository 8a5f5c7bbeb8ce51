// Locator - Locator expressions, composed selectors and scopes
//
// A LocatorExpression is the declarative query a catalog stores. A Locator is
// that expression rendered into an engine selector inside a scope. Locators
// are rebuilt for every operation so a navigation can never leave a stale
// element behind.

use std::fmt;

/// A concrete query against the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocatorExpression {
    /// CSS selector, passed through unchanged
    Css(String),
    /// XPath expression, with or without the `xpath=` prefix
    XPath(String),
    /// Text match (`text=...`)
    Text(String),
    /// `data-testid` attribute match
    TestId(String),
    /// Exact attribute match
    Attribute { name: String, value: String },
}

impl LocatorExpression {
    pub fn css(selector: impl Into<String>) -> Self {
        LocatorExpression::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        LocatorExpression::XPath(expression.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        LocatorExpression::Text(text.into())
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        LocatorExpression::TestId(id.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        LocatorExpression::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses a selector string, recognising `//`, `(//`, `xpath=` and
    /// `text=` prefixes. Anything else is CSS.
    pub fn parse(selector: &str) -> Self {
        let selector = selector.trim();
        if let Some(rest) = selector.strip_prefix("xpath=") {
            LocatorExpression::XPath(rest.to_string())
        } else if selector.starts_with("//") || selector.starts_with("(//") {
            LocatorExpression::XPath(selector.to_string())
        } else if let Some(rest) = selector.strip_prefix("text=") {
            LocatorExpression::Text(rest.to_string())
        } else {
            LocatorExpression::Css(selector.to_string())
        }
    }

    /// Renders the engine selector for this expression.
    pub fn to_selector(&self) -> String {
        match self {
            LocatorExpression::Css(css) => css.clone(),
            LocatorExpression::XPath(xpath) => format!("xpath={}", xpath),
            LocatorExpression::Text(text) => format!("text={}", text),
            LocatorExpression::TestId(id) => format!("[data-testid=\"{}\"]", escape_quotes(id)),
            LocatorExpression::Attribute { name, value } => {
                format!("[{}=\"{}\"]", name, escape_quotes(value))
            }
        }
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl From<&str> for LocatorExpression {
    fn from(selector: &str) -> Self {
        LocatorExpression::parse(selector)
    }
}

impl From<String> for LocatorExpression {
    fn from(selector: String) -> Self {
        LocatorExpression::parse(&selector)
    }
}

impl fmt::Display for LocatorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_selector())
    }
}

/// An engine selector, possibly chained under a root.
///
/// Chaining follows Playwright's `>>` syntax, so `root.locator("a").first()`
/// renders as `root >> a >> nth=0`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    /// Builds a page-level locator from an expression.
    pub fn from_expression(expression: &LocatorExpression) -> Self {
        Locator::new(expression.to_selector())
    }

    /// Returns the selector string for this locator
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Creates a locator for the first matching element.
    pub fn first(&self) -> Locator {
        self.nth(0)
    }

    /// Creates a locator for the nth matching element (0-indexed).
    pub fn nth(&self, index: usize) -> Locator {
        Locator::new(format!("{} >> nth={}", self.selector, index))
    }

    /// Creates a sub-locator within this locator's subtree.
    pub fn locator(&self, expression: &LocatorExpression) -> Locator {
        Locator::new(format!("{} >> {}", self.selector, expression.to_selector()))
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("selector", &self.selector)
            .finish()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}

/// Where candidate expressions are evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// The whole page
    #[default]
    Page,
    /// The subtree of a previously-resolved root element
    Within(Locator),
}

impl Scope {
    /// Renders `expression` in this scope, narrowed to its first match.
    pub fn locate(&self, expression: &LocatorExpression) -> Locator {
        match self {
            Scope::Page => Locator::from_expression(expression).first(),
            Scope::Within(root) => root.locator(expression).first(),
        }
    }

    /// Human-readable scope name for error messages.
    pub fn describe(&self) -> String {
        match self {
            Scope::Page => "page".to_string(),
            Scope::Within(root) => format!("scope '{}'", root.selector()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixes() {
        assert_eq!(
            LocatorExpression::parse("//*[text()=\"Intră în cont\"]"),
            LocatorExpression::XPath("//*[text()=\"Intră în cont\"]".to_string())
        );
        assert_eq!(
            LocatorExpression::parse("xpath=//button"),
            LocatorExpression::XPath("//button".to_string())
        );
        assert_eq!(
            LocatorExpression::parse("text=Login"),
            LocatorExpression::Text("Login".to_string())
        );
        assert_eq!(
            LocatorExpression::parse("  #onetrust-accept-btn-handler "),
            LocatorExpression::Css("#onetrust-accept-btn-handler".to_string())
        );
    }

    #[test]
    fn test_render_selectors() {
        assert_eq!(LocatorExpression::xpath("//a").to_selector(), "xpath=//a");
        assert_eq!(LocatorExpression::text("Accept").to_selector(), "text=Accept");
        assert_eq!(
            LocatorExpression::test_id("search-icon").to_selector(),
            "[data-testid=\"search-icon\"]"
        );
        assert_eq!(
            LocatorExpression::attribute("aria-label", "say \"hi\"").to_selector(),
            "[aria-label=\"say \\\"hi\\\"\"]"
        );
    }

    #[test]
    fn test_scope_composition() {
        let expr = LocatorExpression::css("a.live");
        assert_eq!(Scope::Page.locate(&expr).selector(), "a.live >> nth=0");

        let root = Locator::new("header").first();
        let scoped = Scope::Within(root).locate(&expr);
        assert_eq!(scoped.selector(), "header >> nth=0 >> a.live >> nth=0");
        assert_eq!(
            Scope::Within(Locator::new("nav")).describe(),
            "scope 'nav'"
        );
    }
}
