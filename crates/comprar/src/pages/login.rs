//! Login / signup page.

use crate::components::{ConsentPopup, NavMenu};
use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the login page
pub mod sel {
    /// Login form e-mail input
    pub const EMAIL_INPUT: &str = "input[data-qa='login-email']";
    /// Login form password input
    pub const PASSWORD_INPUT: &str = "input[data-qa='login-password']";
    /// Login submit button
    pub const LOGIN_BUTTON: &str = "button[data-qa='login-button']";
    /// Login form container
    pub const LOGIN_FORM: &str = "form[action='/login']";
    /// Signup form name input
    pub const SIGNUP_NAME: &str = "input[data-qa='signup-name']";
    /// Signup form e-mail input
    pub const SIGNUP_EMAIL: &str = "input[data-qa='signup-email']";
    /// Signup submit button
    pub const SIGNUP_BUTTON: &str = "button[data-qa='signup-button']";
}

/// The login page with its two forms
#[derive(Debug, Clone, Copy)]
pub struct LoginPage<'a> {
    session: &'a Session,
}

impl<'a> LoginPage<'a> {
    /// Path under the base address
    pub const PATH: &'static str = "/login";

    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Navigate to the login page, dismiss the consent overlay, wait for
    /// the e-mail input.
    pub fn load(&self) -> ComprarResult<()> {
        self.session.goto_path(Self::PATH)?;
        ConsentPopup::new(self.session).accept()?;
        self.session
            .waiter()
            .visible(&Locator::css(sel::EMAIL_INPUT))?;
        Ok(())
    }

    /// Fill the login form, submit, and assert the logged-in state.
    pub fn login(&self, email: &str, password: &str) -> ComprarResult<()> {
        let waiter = self.session.waiter();
        waiter.fill(&Locator::css(sel::EMAIL_INPUT), email)?;
        waiter.fill(&Locator::css(sel::PASSWORD_INPUT), password)?;
        waiter.click(&Locator::css(sel::LOGIN_BUTTON))?;
        self.assert_logged_in()
    }

    /// Fill the signup form and submit
    pub fn signup(&self, name: &str, email: &str) -> ComprarResult<()> {
        let waiter = self.session.waiter();
        waiter.fill(&Locator::css(sel::SIGNUP_NAME), name)?;
        waiter.fill(&Locator::css(sel::SIGNUP_EMAIL), email)?;
        waiter.click(&Locator::css(sel::SIGNUP_BUTTON))
    }

    /// Wait for the post-login nav links and the home URL.
    pub fn assert_logged_in(&self) -> ComprarResult<()> {
        let quick = self.session.quick();
        quick.visible(&Locator::css(crate::components::nav::sel::LOGOUT))?;
        quick.visible(&Locator::css(
            crate::components::nav::sel::DELETE_ACCOUNT,
        ))?;
        quick.url_is(&self.session.config().url_for(""))
    }

    /// True when neither Logout nor Delete Account is displayed
    pub fn not_logged_in(&self) -> ComprarResult<bool> {
        let nav = NavMenu::new(self.session);
        Ok(!nav.logout_displayed()? && !nav.delete_account_displayed()?)
    }

    /// Log out through the nav menu and wait to land back on this page
    pub fn logout(&self) -> ComprarResult<()> {
        NavMenu::new(self.session).click_logout()?;
        self.session
            .quick()
            .url_is(&self.session.config().url_for(Self::PATH))
    }
}
