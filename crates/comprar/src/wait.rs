//! Explicit waits and wait-then-act interactions.
//!
//! The storefront renders asynchronously (hover overlays, modal
//! transitions, AJAX cart rows), so every interaction here is
//! wait-then-act: a bounded polling loop evaluates a predicate against the
//! live DOM and either returns the satisfying result or fails with a
//! [`ComprarError::Timeout`] carrying the locator and cause. Element handles
//! are re-resolved on every poll iteration, never cached across waits.

use crate::driver::{ElementHandle, PageDriver};
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};
use std::time::{Duration, Instant};

/// Default deadline for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Deadline
    pub timeout: Duration,
    /// Polling interval
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deadline
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Wait-then-act interface over one driver.
///
/// Cheap to construct; [`crate::session::Session`] hands out one per default
/// timeout tier, and `with_timeout` gives the per-call override.
#[derive(Clone, Copy)]
pub struct Waiter<'a> {
    driver: &'a dyn PageDriver,
    timeout: Duration,
    poll_interval: Duration,
}

impl std::fmt::Debug for Waiter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waiter")
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<'a> Waiter<'a> {
    /// Create a waiter over a driver
    #[must_use]
    pub fn new(driver: &'a dyn PageDriver, options: &WaitOptions) -> Self {
        Self {
            driver,
            timeout: options.timeout,
            poll_interval: options.poll_interval,
        }
    }

    /// Per-call deadline override
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-call polling interval override
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// The underlying driver
    #[must_use]
    pub const fn driver(&self) -> &'a dyn PageDriver {
        self.driver
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Bounded polling loop. The predicate is evaluated at least once even
    /// with a zero deadline; driver errors abort the wait immediately.
    fn poll<T>(
        &self,
        condition: &str,
        mut check: impl FnMut() -> ComprarResult<Option<T>>,
    ) -> ComprarResult<T> {
        let start = Instant::now();
        loop {
            if let Some(found) = check()? {
                return Ok(found);
            }
            if start.elapsed() >= self.timeout {
                tracing::debug!(condition, timeout_ms = self.timeout_ms(), "wait timed out");
                return Err(ComprarError::Timeout {
                    condition: condition.to_string(),
                    ms: self.timeout_ms(),
                });
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    // =========================================================================
    // PREDICATES
    // =========================================================================

    /// Wait for at least one matching node to exist in the DOM
    pub fn present(&self, locator: &Locator) -> ComprarResult<ElementHandle> {
        self.poll(&format!("presence of {locator}"), || {
            Ok(self.driver.find_all(locator)?.into_iter().next())
        })
    }

    /// Wait for at least one match and return all of them
    pub fn all_present(&self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>> {
        self.poll(&format!("presence of all {locator}"), || {
            let els = self.driver.find_all(locator)?;
            Ok(if els.is_empty() { None } else { Some(els) })
        })
    }

    /// Wait for the first match to be rendered visible
    pub fn visible(&self, locator: &Locator) -> ComprarResult<ElementHandle> {
        self.poll(&format!("visibility of {locator}"), || {
            match self.driver.find_all(locator)?.into_iter().next() {
                Some(el) if self.driver.is_visible(&el)? => Ok(Some(el)),
                _ => Ok(None),
            }
        })
    }

    /// Wait for the nth match to exist and be visible.
    ///
    /// Unlike [`Waiter::visible`] this indexes into the match list, for
    /// per-card widgets that share one selector (hover overlays).
    pub fn visible_nth(&self, locator: &Locator, index: usize) -> ComprarResult<ElementHandle> {
        self.poll(&format!("visibility of {locator}[{index}]"), || {
            match self.driver.find_all(locator)?.into_iter().nth(index) {
                Some(el) if self.driver.is_visible(&el)? => Ok(Some(el)),
                _ => Ok(None),
            }
        })
    }

    /// Wait for every match to be visible (and at least one to exist)
    pub fn all_visible(&self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>> {
        self.poll(&format!("visibility of all {locator}"), || {
            let els = self.driver.find_all(locator)?;
            if els.is_empty() {
                return Ok(None);
            }
            for el in &els {
                if !self.driver.is_visible(el)? {
                    return Ok(None);
                }
            }
            Ok(Some(els))
        })
    }

    /// Wait for the first match to be visible and enabled
    pub fn clickable(&self, locator: &Locator) -> ComprarResult<ElementHandle> {
        self.poll(&format!("clickability of {locator}"), || {
            match self.driver.find_all(locator)?.into_iter().next() {
                Some(el)
                    if self.driver.is_visible(&el)? && self.driver.is_enabled(&el)? =>
                {
                    Ok(Some(el))
                }
                _ => Ok(None),
            }
        })
    }

    /// Wait for every match to be removed or hidden
    pub fn invisible(&self, locator: &Locator) -> ComprarResult<()> {
        self.poll(&format!("invisibility of {locator}"), || {
            let els = self.driver.find_all(locator)?;
            for el in &els {
                if self.driver.is_visible(el)? {
                    return Ok(None);
                }
            }
            Ok(Some(()))
        })
    }

    /// Wait for a previously-held handle to detach from the live DOM
    pub fn stale(&self, el: &ElementHandle) -> ComprarResult<()> {
        self.poll(&format!("staleness of {}", el.locator), || {
            Ok(if self.driver.is_attached(el)? {
                None
            } else {
                Some(())
            })
        })
    }

    /// Wait for the first match's text to contain a fragment
    pub fn text_in(&self, locator: &Locator, fragment: &str) -> ComprarResult<()> {
        self.poll(&format!("text {fragment:?} in {locator}"), || {
            match self.driver.find_all(locator)?.into_iter().next() {
                Some(el) if self.driver.text(&el)?.contains(fragment) => Ok(Some(())),
                _ => Ok(None),
            }
        })
    }

    /// Wait for the first match's text to equal the expected string exactly
    /// (after whitespace normalization)
    pub fn exact_text(&self, locator: &Locator, expected: &str) -> ComprarResult<()> {
        let want = crate::parse::normalize_ws(expected);
        self.poll(&format!("text == {expected:?} in {locator}"), || {
            match self.driver.find_all(locator)?.into_iter().next() {
                Some(el) if crate::parse::normalize_ws(&self.driver.text(&el)?) == want => {
                    Ok(Some(()))
                }
                _ => Ok(None),
            }
        })
    }

    /// Wait for the first match's input value to contain a fragment
    pub fn value_contains(&self, locator: &Locator, fragment: &str) -> ComprarResult<()> {
        self.poll(&format!("value {fragment:?} in {locator}"), || {
            match self.driver.find_all(locator)?.into_iter().next() {
                Some(el) if self.driver.value(&el)?.contains(fragment) => Ok(Some(())),
                _ => Ok(None),
            }
        })
    }

    /// Wait for the page URL to equal the expected string
    pub fn url_is(&self, expected: &str) -> ComprarResult<()> {
        self.poll(&format!("url == {expected:?}"), || {
            Ok((self.driver.current_url()? == expected).then_some(()))
        })
    }

    /// Wait for the page URL to contain a fragment
    pub fn url_contains(&self, fragment: &str) -> ComprarResult<()> {
        self.poll(&format!("url contains {fragment:?}"), || {
            Ok(self.driver.current_url()?.contains(fragment).then_some(()))
        })
    }

    /// Wait for the page title to equal the expected string
    pub fn title_is(&self, expected: &str) -> ComprarResult<()> {
        self.poll(&format!("title == {expected:?}"), || {
            Ok((self.driver.title()? == expected).then_some(()))
        })
    }

    /// Wait for the page title to contain a fragment
    pub fn title_contains(&self, fragment: &str) -> ComprarResult<()> {
        self.poll(&format!("title contains {fragment:?}"), || {
            Ok(self.driver.title()?.contains(fragment).then_some(()))
        })
    }

    /// Wait for the first match's checked/selected state to equal `selected`
    pub fn selection_state(&self, locator: &Locator, selected: bool) -> ComprarResult<()> {
        self.poll(
            &format!("selection state {selected} of {locator}"),
            || match self.driver.find_all(locator)?.into_iter().next() {
                Some(el) if self.driver.is_selected(&el)? == selected => Ok(Some(())),
                _ => Ok(None),
            },
        )
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Wait for clickability, then click.
    ///
    /// A deadline elapse surfaces as [`ComprarError::NotInteractable`].
    pub fn click(&self, locator: &Locator) -> ComprarResult<()> {
        let el = self.clickable(locator).map_err(|e| match e {
            ComprarError::Timeout { .. } => ComprarError::NotInteractable {
                locator: locator.to_string(),
                ms: self.timeout_ms(),
            },
            other => other,
        })?;
        self.driver.scroll_into_view(&el)?;
        tracing::debug!(%locator, "click");
        self.driver.click(&el)
    }

    /// Wait for presence of all matches, then click the nth.
    ///
    /// Out-of-range indices are fatal, never clamped.
    pub fn click_nth(&self, locator: &Locator, index: usize) -> ComprarResult<()> {
        let els = self.all_present(locator)?;
        let el = Self::nth(locator, &els, index)?;
        self.driver.scroll_into_view(el)?;
        tracing::debug!(%locator, index, "click nth");
        self.driver.click(el)
    }

    /// Wait for visibility, clear, then set the value in one shot
    pub fn fill(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
        let el = self.visible(locator)?;
        self.driver.clear(&el)?;
        tracing::debug!(%locator, "fill");
        self.driver.type_text(&el, text)
    }

    /// Wait for visibility of all matches, clear and fill the nth
    pub fn fill_nth(&self, locator: &Locator, index: usize, text: &str) -> ComprarResult<()> {
        let els = self.all_visible(locator)?;
        let el = Self::nth(locator, &els, index)?;
        self.driver.clear(el)?;
        self.driver.type_text(el, text)
    }

    /// Wait for visibility, clear, then type character by character.
    ///
    /// Exercises client-side input masking and length limits that a
    /// single-shot fill would bypass.
    pub fn fill_chars(&self, locator: &Locator, text: &str) -> ComprarResult<()> {
        let el = self.visible(locator)?;
        self.driver.clear(&el)?;
        tracing::debug!(%locator, "fill per-keystroke");
        self.driver.press_keys(&el, text)
    }

    /// Wait for visibility and clear the first match
    pub fn clear(&self, locator: &Locator) -> ComprarResult<()> {
        let el = self.visible(locator)?;
        self.driver.clear(&el)
    }

    /// Move the pointer onto the nth match
    pub fn hover_nth(&self, locator: &Locator, index: usize) -> ComprarResult<ElementHandle> {
        let els = self.all_visible(locator)?;
        let el = Self::nth(locator, &els, index)?.clone();
        self.driver.scroll_into_view(&el)?;
        tracing::debug!(%locator, index, "hover");
        self.driver.hover(&el)?;
        Ok(el)
    }

    /// Hover the nth match of `primary`, then wait for a dependent element
    /// revealed by the hover (e.g. an overlay). The secondary wait runs on
    /// its own deadline, distinct from the move.
    pub fn hover_until_visible(
        &self,
        primary: &Locator,
        index: usize,
        dependent: &Locator,
        dependent_timeout: Duration,
    ) -> ComprarResult<()> {
        let _ = self.hover_nth(primary, index)?;
        self.with_timeout(dependent_timeout).visible(dependent)?;
        Ok(())
    }

    // =========================================================================
    // WAITING GETTERS
    // =========================================================================

    /// Wait for presence and return the first match's text
    pub fn text_of(&self, locator: &Locator) -> ComprarResult<String> {
        let el = self.present(locator)?;
        self.driver.text(&el)
    }

    /// Wait for presence and return every match's text
    pub fn texts_of_all(&self, locator: &Locator) -> ComprarResult<Vec<String>> {
        let els = self.all_present(locator)?;
        els.iter().map(|el| self.driver.text(el)).collect()
    }

    /// Wait for presence and return the nth match's text
    pub fn text_of_nth(&self, locator: &Locator, index: usize) -> ComprarResult<String> {
        let els = self.all_present(locator)?;
        let el = Self::nth(locator, &els, index)?;
        self.driver.text(el)
    }

    /// Wait for visibility and return the first match's input value
    pub fn value_of(&self, locator: &Locator) -> ComprarResult<String> {
        let el = self.visible(locator)?;
        self.driver.value(&el)
    }

    /// Wait for presence and return an attribute of the first match
    pub fn attribute_of(&self, locator: &Locator, name: &str) -> ComprarResult<Option<String>> {
        let el = self.present(locator)?;
        self.driver.attribute(&el, name)
    }

    /// Wait for presence and return an attribute of the nth match
    pub fn attribute_of_nth(
        &self,
        locator: &Locator,
        index: usize,
        name: &str,
    ) -> ComprarResult<Option<String>> {
        let els = self.all_present(locator)?;
        let el = Self::nth(locator, &els, index)?;
        self.driver.attribute(el, name)
    }

    fn nth<'e>(
        locator: &Locator,
        els: &'e [ElementHandle],
        index: usize,
    ) -> ComprarResult<&'e ElementHandle> {
        els.get(index).ok_or_else(|| ComprarError::IndexOutOfBounds {
            locator: locator.to_string(),
            index,
            count: els.len(),
        })
    }
}
