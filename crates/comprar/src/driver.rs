//! Backend-agnostic page driver.
//!
//! Every page object and wait goes through [`PageDriver`]: one capability
//! set (navigate, find, query, act) with interchangeable implementations
//! selected once at startup: [`crate::sim::SimDriver`] for hermetic tests,
//! and the CDP-backed driver behind the `browser` feature for a real
//! browser. Page-object logic is never duplicated per backend.

use crate::locator::Locator;
use crate::result::ComprarResult;
use serde::{Deserialize, Serialize};

/// Ephemeral reference to a DOM node.
///
/// Valid only until the DOM mutates; a detached handle reports
/// `is_attached == false` and any further use is a driver error. Handles are
/// created on each lookup and never persisted across navigations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Backend-assigned identifier
    pub id: u64,
    /// Locator the handle was resolved from, for error context
    pub locator: String,
}

impl ElementHandle {
    /// Create a handle
    #[must_use]
    pub fn new(id: u64, locator: impl Into<String>) -> Self {
        Self {
            id,
            locator: locator.into(),
        }
    }
}

/// Synchronous driver capability set.
///
/// All calls block; one driver serves one sequential test script. Query
/// methods on a detached handle answer `false` where the question still
/// makes sense (`is_visible`, `is_enabled`, `is_selected`) and error
/// otherwise.
pub trait PageDriver: Send {
    /// Navigate to an absolute URL
    fn navigate(&self, url: &str) -> ComprarResult<()>;

    /// Reload the current page
    fn refresh(&self) -> ComprarResult<()>;

    /// Current page URL
    fn current_url(&self) -> ComprarResult<String>;

    /// Current page title
    fn title(&self) -> ComprarResult<String>;

    /// All elements matching the locator, in document order
    fn find_all(&self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>>;

    /// Whether the handle still points at a node in the live DOM
    fn is_attached(&self, el: &ElementHandle) -> ComprarResult<bool>;

    /// Whether the node is rendered (non-zero box, not hidden)
    fn is_visible(&self, el: &ElementHandle) -> ComprarResult<bool>;

    /// Whether the node is enabled
    fn is_enabled(&self, el: &ElementHandle) -> ComprarResult<bool>;

    /// Whether the node is checked/selected
    fn is_selected(&self, el: &ElementHandle) -> ComprarResult<bool>;

    /// Rendered text content
    fn text(&self, el: &ElementHandle) -> ComprarResult<String>;

    /// Current input value
    fn value(&self, el: &ElementHandle) -> ComprarResult<String>;

    /// Attribute value, `None` when absent
    fn attribute(&self, el: &ElementHandle, name: &str) -> ComprarResult<Option<String>>;

    /// Click the node
    fn click(&self, el: &ElementHandle) -> ComprarResult<()>;

    /// Clear an input's value
    fn clear(&self, el: &ElementHandle) -> ComprarResult<()>;

    /// Set an input's value in one shot (fill semantics)
    fn type_text(&self, el: &ElementHandle, text: &str) -> ComprarResult<()>;

    /// Type character by character (keystroke semantics, exercises input
    /// masking and length limits)
    fn press_keys(&self, el: &ElementHandle, text: &str) -> ComprarResult<()>;

    /// Move the pointer onto the node
    fn hover(&self, el: &ElementHandle) -> ComprarResult<()>;

    /// Scroll the node into view
    fn scroll_into_view(&self, el: &ElementHandle) -> ComprarResult<()>;

    /// Capture a PNG screenshot of the page
    fn screenshot(&self) -> ComprarResult<Vec<u8>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_element_handle_carries_locator_context() {
        let handle = ElementHandle::new(3, "css `.cart_quantity button`");
        assert_eq!(handle.id, 3);
        assert!(handle.locator.contains("cart_quantity"));
    }

    #[test]
    fn test_element_handle_is_cloneable() {
        let handle = ElementHandle::new(1, "css `h2`");
        assert_eq!(handle, handle.clone());
    }
}
