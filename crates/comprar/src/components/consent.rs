//! Cookie-consent overlay.
//!
//! The overlay appears on a fresh browser profile and blocks every click
//! under it. Accepting is best-effort: absence is not an error, and this is
//! the one place a wait timeout is deliberately swallowed.

use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the consent overlay
pub mod sel {
    /// The consent button
    pub const CONSENT_BTN: &str = "button[class*='fc-primary-button'][aria-label='Consent']";
}

/// The consent overlay shown on first page load
#[derive(Debug, Clone, Copy)]
pub struct ConsentPopup<'a> {
    session: &'a Session,
}

impl<'a> ConsentPopup<'a> {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Click consent if present; ignore if not found.
    pub fn accept(&self) -> ComprarResult<()> {
        match self.session.quick().click(&Locator::css(sel::CONSENT_BTN)) {
            Ok(()) => {
                tracing::debug!("consent overlay dismissed");
                Ok(())
            }
            Err(e) if e.is_wait_failure() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
