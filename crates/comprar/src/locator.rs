//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable (strategy, selector) pair identifying zero
//! or more DOM nodes. Locators are defined statically per page or component;
//! the handles they resolve to are ephemeral and never cached across waits.

use serde::{Deserialize, Serialize};

/// Selection strategy for a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Short name used in error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
        }
    }
}

/// An immutable strategy+selector pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    selector: String,
}

impl Locator {
    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            selector: selector.into(),
        }
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: selector.into(),
        }
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw selector
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Scope to a descendant.
    ///
    /// `Locator::css("tr#product-1").child(".cart_price p")` selects the
    /// price cell of one cart row.
    #[must_use]
    pub fn child(&self, selector: &str) -> Self {
        match self.strategy {
            Strategy::Css => Self::css(format!("{} {selector}", self.selector)),
            Strategy::XPath => Self::xpath(format!(
                "{}//{}",
                self.selector,
                selector.trim_start_matches('/')
            )),
        }
    }

    /// JavaScript expression returning all matching elements as an array.
    ///
    /// Used by the CDP backend; the sim backend matches selectors directly.
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self.strategy {
            Strategy::Css => format!(
                "Array.from(document.querySelectorAll({:?}))",
                self.selector
            ),
            Strategy::XPath => format!(
                "(() => {{ const r = document.evaluate({:?}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                 return out; }})()",
                self.selector
            ),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} `{}`", self.strategy.as_str(), self.selector)
    }
}
