//! Add-to-cart confirmation modal.
//!
//! Lifecycle: hidden → visible on an add-to-cart action, visible → hidden
//! on "Continue Shopping" or "View Cart". Clicking outside the popup does
//! NOT close it on the current site build; the live suite tracks that as an
//! expected failure rather than encoding it as correct behavior.

use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the modal
pub mod sel {
    /// Modal container
    pub const MODAL: &str = ".modal-content";
    /// "View Cart" link inside the modal
    pub const VIEW_CART: &str = ".modal-content a[href='/view_cart']";
    /// "Continue Shopping" button
    pub const CONTINUE_SHOPPING: &str =
        ".modal-content button.btn.btn-success.close-modal.btn-block";
}

/// The add-to-cart confirmation modal
#[derive(Debug, Clone, Copy)]
pub struct CartModal<'a> {
    session: &'a Session,
}

impl<'a> CartModal<'a> {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Wait for the modal to become visible
    pub fn wait_until_visible(&self) -> ComprarResult<()> {
        self.session.quick().visible(&Locator::css(sel::MODAL))?;
        Ok(())
    }

    /// Wait for the modal to be removed or hidden
    pub fn wait_until_hidden(&self) -> ComprarResult<()> {
        self.session.quick().invisible(&Locator::css(sel::MODAL))
    }

    /// Click "Continue Shopping" and wait for the modal to hide
    pub fn continue_shopping(&self) -> ComprarResult<()> {
        self.session
            .quick()
            .click(&Locator::css(sel::CONTINUE_SHOPPING))?;
        self.wait_until_hidden()
    }

    /// Click "View Cart" and wait for the cart URL
    pub fn view_cart(&self) -> ComprarResult<()> {
        self.session.quick().click(&Locator::css(sel::VIEW_CART))?;
        self.session.quick().url_contains("/view_cart")
    }
}
