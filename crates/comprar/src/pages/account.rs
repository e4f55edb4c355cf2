//! Account deletion confirmation page.

use crate::components::NavMenu;
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the deletion confirmation
pub mod sel {
    /// "Account Deleted!" header
    pub const DELETED_HEADER: &str = "h2[data-qa='account-deleted']";
    /// Continue button back to the home page
    pub const CONTINUE_BTN: &str = "a[data-qa='continue-button']";
}

/// The page shown after deleting the account from the nav menu
#[derive(Debug, Clone, Copy)]
pub struct DeleteAccountPage<'a> {
    session: &'a Session,
}

impl<'a> DeleteAccountPage<'a> {
    /// Path under the base address
    pub const PATH: &'static str = "/delete_account";

    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Delete the signed-in account through the nav menu, assert the
    /// confirmation, and optionally continue back home.
    pub fn delete_account_and_continue(&self, click_continue: bool) -> ComprarResult<()> {
        NavMenu::new(self.session).click_delete_account()?;
        let quick = self.session.quick();
        quick.url_contains(Self::PATH)?;
        quick.visible(&Locator::css(sel::DELETED_HEADER))?;
        quick.exact_text(&Locator::css(sel::DELETED_HEADER), "Account Deleted!")?;
        if click_continue {
            quick.click(&Locator::css(sel::CONTINUE_BTN))?;
            quick.url_is(&self.session.config().url_for(""))?;
        }
        Ok(())
    }
}
